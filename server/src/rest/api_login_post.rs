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


//! API to obtain an access token for an existing user.

use crate::driver::Driver;
use crate::model::AccessToken;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to log in.
#[derive(Deserialize, Serialize)]
pub(crate) struct LoginRequest {
    /// Username of the account.
    pub(crate) username: String,

    /// Password of the account.
    pub(crate) password: String,
}

/// Message returned by the server when handing out a new access token.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct TokenResponse {
    /// Human-readable description of the outcome.
    pub(crate) message: String,

    /// Access token for the user.
    pub(crate) token: AccessToken,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = driver.login(request.username, request.password).await?;
    let response = TokenResponse { message: "User logged in".to_owned(), token };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::TEST_PASSWORD;
    use crate::model::PromoteKind;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/login".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        context.create_user("alice").await;

        let request =
            LoginRequest { username: "alice".to_owned(), password: TEST_PASSWORD.to_owned() };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_json::<TokenResponse>()
            .await;
        assert_eq!("User logged in", response.message);

        OneShotBuilder::new(context.app(), (http::Method::GET, "/get_questions"))
            .with_bearer_auth(response.token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<serde_json::Value>>()
            .await;
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let context = TestContext::setup().await;

        let request =
            LoginRequest { username: "nobody".to_owned(), password: TEST_PASSWORD.to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("username does not exist")
            .await;
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let context = TestContext::setup().await;
        context.create_user("alice").await;

        let request =
            LoginRequest { username: "alice".to_owned(), password: "Password2".to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("invalid login credentials")
            .await;
    }

    #[tokio::test]
    async fn test_banned_user() {
        let context = TestContext::setup().await;
        let alice = context.create_user("alice").await;
        let (moderator, moderator_token) = context.create_user_with_token("moderator").await;
        context.grant(moderator, PromoteKind::Moderator).await;

        let request = serde_json::json!({"user_id": alice, "duration": 0, "reason": "spam"});
        OneShotBuilder::new(context.app(), (http::Method::POST, "/ban_user"))
            .with_bearer_auth(moderator_token.as_str())
            .send_json(request)
            .await
            .expect_json::<serde_json::Value>()
            .await;

        let request =
            LoginRequest { username: "alice".to_owned(), password: TEST_PASSWORD.to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("user is banned")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
