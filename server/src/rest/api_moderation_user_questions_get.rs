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


//! API for moderators to inspect the pending questions of any user.

use crate::driver::Driver;
use crate::rest::PageQuery;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use http::HeaderMap;
use truthful_core::rest::{EmptyBody, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(username): Path<String>,
    Query(page): Query<PageQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let requester = driver.whoami(&token)?;

    let questions = driver
        .moderation_get_user_questions(requester, username, page.start, page.count)
        .await?;
    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PromoteKind, Question};
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use truthful_core::rest::testutils::*;

    fn route(username: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/moderation/get_user_questions/{}", username))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let (moderator, token) = context.create_user_with_token("moderator").await;
        context.grant(moderator, PromoteKind::Moderator).await;
        let alice = context.create_user("alice").await;
        let question = context.ask(None, alice, "Pending?").await;

        let questions = OneShotBuilder::new(context.app(), route("alice"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<Question>>()
            .await;
        assert_eq!(1, questions.len());
        assert_eq!(question, questions[0].id);
    }

    #[tokio::test]
    async fn test_requester_not_moderator() {
        let context = TestContext::setup().await;
        let (_, token) = context.create_user_with_token("bob").await;
        context.create_user("alice").await;

        OneShotBuilder::new(context.into_app(), route("alice"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(StatusCode::FORBIDDEN)
            .expect_error("not a moderator or admin")
            .await;
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let context = TestContext::setup().await;
        let (admin, token) = context.create_user_with_token("admin").await;
        context.grant(admin, PromoteKind::Admin).await;

        OneShotBuilder::new(context.into_app(), route("nobody"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("user not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("irrelevant"));
}
