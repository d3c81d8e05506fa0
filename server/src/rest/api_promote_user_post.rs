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


//! API to grant a role to a user.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::MessageResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use log::info;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to promote a user.
#[derive(Deserialize, Serialize)]
pub(crate) struct PromoteUserRequest {
    /// The user to promote.
    pub(crate) user_id: UserId,

    /// The role to grant: either `admin` or `moderator`.
    pub(crate) promote_type: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<PromoteUserRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let requester = driver.whoami(&token)?;

    let kind = request.promote_type;
    let message = format!("User promoted to {}", kind);
    driver.promote_user(requester, request.user_id, kind).await?;
    info!("User {} promoted user {}", requester, request.user_id);

    Ok(Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::PromoteKind;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/promote_user".to_owned())
    }

    #[tokio::test]
    async fn test_promote_twice() {
        let context = TestContext::setup().await;
        let (admin, token) = context.create_user_with_token("admin").await;
        context.grant(admin, PromoteKind::Admin).await;
        let alice = context.create_user("alice").await;

        let request = PromoteUserRequest { user_id: alice, promote_type: "admin".to_owned() };
        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_json::<MessageResponse>()
            .await;
        assert_eq!("User promoted to admin", response.message);
        assert!(db::get_user_roles(&mut context.ex().await, alice).await.unwrap().is_admin);

        let request = PromoteUserRequest { user_id: alice, promote_type: "admin".to_owned() };
        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("user is already an admin")
            .await;
    }

    #[tokio::test]
    async fn test_requester_not_admin() {
        let context = TestContext::setup().await;
        let (moderator, token) = context.create_user_with_token("moderator").await;
        context.grant(moderator, PromoteKind::Moderator).await;
        let alice = context.create_user("alice").await;

        let request = PromoteUserRequest { user_id: alice, promote_type: "moderator".to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("no permission to promote")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_type() {
        let context = TestContext::setup().await;
        let (admin, token) = context.create_user_with_token("admin").await;
        context.grant(admin, PromoteKind::Admin).await;
        let alice = context.create_user("alice").await;

        let request = PromoteUserRequest { user_id: alice, promote_type: "owner".to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("invalid promote type")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
