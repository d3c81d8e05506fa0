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


//! API to ban a user.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::CreatedResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use log::info;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to ban a user.
#[derive(Deserialize, Serialize)]
pub(crate) struct BanUserRequest {
    /// The user to ban.
    pub(crate) user_id: UserId,

    /// Duration of the ban in hours.  Zero or negative values yield permanent bans.
    pub(crate) duration: i64,

    /// Why the user is being banned.
    pub(crate) reason: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<BanUserRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let requester = driver.whoami(&token)?;

    let id = driver.ban_user(requester, request.user_id, request.duration, request.reason).await?;
    info!("User {} banned user {} with ban {}", requester, request.user_id, id);

    Ok(Json(CreatedResponse { message: "User banned".to_owned(), id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::{BanId, PromoteKind};
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use std::time::Duration;
    use truthful_core::clocks::Clock;
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/ban_user".to_owned())
    }

    #[tokio::test]
    async fn test_temporary_ban() {
        let context = TestContext::setup().await;
        let (moderator, token) = context.create_user_with_token("moderator").await;
        context.grant(moderator, PromoteKind::Moderator).await;
        let alice = context.create_user("alice").await;

        let request = BanUserRequest { user_id: alice, duration: 2, reason: "spam".to_owned() };
        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_json::<CreatedResponse<BanId>>()
            .await;
        assert_eq!("User banned", response.message);

        let now = context.clock().now_utc();
        assert!(db::is_user_banned(&mut context.ex().await, alice, now).await.unwrap());

        context.clock().advance(Duration::from_secs(2 * 60 * 60 + 1));
        let now = context.clock().now_utc();
        assert!(!db::is_user_banned(&mut context.ex().await, alice, now).await.unwrap());
    }

    #[tokio::test]
    async fn test_requester_not_moderator() {
        let context = TestContext::setup().await;
        let (_, token) = context.create_user_with_token("bob").await;
        let alice = context.create_user("alice").await;

        let request = BanUserRequest { user_id: alice, duration: 0, reason: "spam".to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("not a moderator or admin")
            .await;
    }

    #[tokio::test]
    async fn test_cannot_ban_admin() {
        let context = TestContext::setup().await;
        let (admin, token) = context.create_user_with_token("admin").await;
        context.grant(admin, PromoteKind::Admin).await;
        let other = context.create_user("other").await;
        context.grant(other, PromoteKind::Admin).await;

        let request = BanUserRequest { user_id: other, duration: 0, reason: "coup".to_owned() };
        OneShotBuilder::new(context.into_app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("cannot ban an admin")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
