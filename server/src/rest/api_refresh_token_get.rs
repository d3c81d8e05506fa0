// Truthful
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.


//! API to exchange a valid access token for a fresh one.

use crate::driver::Driver;
use crate::rest::api_login_post::TokenResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use truthful_core::rest::{EmptyBody, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let token = driver.refresh_token(token).await?;
    let response = TokenResponse { message: "Token refreshed".to_owned(), token };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/refresh_token".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let (_, token) = context.create_user_with_token("alice").await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<TokenResponse>()
            .await;
        assert_eq!("Token refreshed", response.message);
        assert!(!response.token.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("Missing Authorization header")
            .await;
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth("not.a.token")
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("invalid token")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
