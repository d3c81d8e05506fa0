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


//! API to get the public profile of a user.

use crate::driver::Driver;
use crate::rest::PageQuery;
use crate::rest::httputils::get_optional_bearer_auth;
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
    let requester = match get_optional_bearer_auth(&headers)? {
        Some(token) => Some(driver.whoami(&token)?),
        None => None,
    };

    let profile = driver.get_user_profile(requester, username, page.start, page.count).await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserProfile;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use truthful_core::rest::testutils::*;

    fn route(username: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/get_user_profile/{}", username))
    }

    #[tokio::test]
    async fn test_anonymous_requester() {
        let context = TestContext::setup().await;
        let alice = context.create_user("alice").await;
        let question = context.ask(None, alice, "Anyone there?").await;
        context.answer(alice, question, "Yes").await;

        let profile = OneShotBuilder::new(context.app(), route("alice"))
            .send_empty()
            .await
            .expect_json::<UserProfile>()
            .await;
        assert_eq!(alice, profile.id);
        assert_eq!("alice", profile.username);
        assert_eq!("alice", profile.display_name);
        assert_eq!(1, profile.answer_count);
        assert!(!profile.requesting_user);
        assert!(!profile.followed_by_requester);
        assert_eq!("Anyone there?", profile.answers[0].question_text);
        assert!(profile.answers[0].author.is_none());
    }

    #[tokio::test]
    async fn test_own_profile() {
        let context = TestContext::setup().await;
        let (_, token) = context.create_user_with_token("alice").await;

        let profile = OneShotBuilder::new(context.app(), route("alice"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<UserProfile>()
            .await;
        assert!(profile.requesting_user);
    }

    #[tokio::test]
    async fn test_pagination() {
        let context = TestContext::setup().await;
        let alice = context.create_user("alice").await;
        for i in 0..3 {
            let question = context.ask(None, alice, &format!("Question {}", i)).await;
            context.answer(alice, question, &format!("Answer {}", i)).await;
        }

        let profile = OneShotBuilder::new(context.app(), route("alice"))
            .with_query(PageQuery { count: Some(1), start: Some(1) })
            .send_empty()
            .await
            .expect_json::<UserProfile>()
            .await;
        assert_eq!(3, profile.answer_count);
        assert_eq!(1, profile.answers.len());
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let context = TestContext::setup().await;
        context.create_user("alice").await;

        OneShotBuilder::new(context.into_app(), route("alice"))
            .with_bearer_auth("bad.token.here")
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("invalid token")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route("nobody"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("user not found")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("irrelevant"));
}
