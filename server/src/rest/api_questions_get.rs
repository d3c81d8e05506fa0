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


//! API to list the questions that the caller has not answered yet.

use crate::driver::Driver;
use crate::rest::PageQuery;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use http::HeaderMap;
use truthful_core::rest::{EmptyBody, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(page): Query<PageQuery>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let user = driver.whoami(&token)?;

    let questions = driver.get_questions(user, page.start, page.count).await?;
    Ok(Json(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use crate::rest::testutils::*;
    use axum::http::{self, StatusCode};
    use std::time::Duration;
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/get_questions".to_owned())
    }

    #[tokio::test]
    async fn test_newest_first_and_unanswered_only() {
        let context = TestContext::setup().await;
        let (alice, token) = context.create_user_with_token("alice").await;
        let bob = context.create_user("bob").await;

        let first = context.ask(Some(bob), alice, "First").await;
        context.clock().advance(Duration::from_secs(1));
        let second = context.ask(Some(bob), alice, "Second").await;
        context.clock().advance(Duration::from_secs(1));
        let third = context.ask(None, alice, "Third").await;
        context.answer(alice, second, "Done").await;

        let questions = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<Question>>()
            .await;
        let ids = questions.iter().map(|q| q.id).collect::<Vec<_>>();
        assert_eq!(vec![third, first], ids);
    }

    #[tokio::test]
    async fn test_count_and_start() {
        let context = TestContext::setup().await;
        let (alice, token) = context.create_user_with_token("alice").await;
        let mut ids = vec![];
        for i in 0..5 {
            ids.push(context.ask(None, alice, &format!("Question {}", i)).await);
            context.clock().advance(Duration::from_secs(1));
        }

        let questions = OneShotBuilder::new(context.app(), route())
            .with_query(PageQuery { count: Some(2), start: Some(1) })
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<Question>>()
            .await;
        let got = questions.iter().map(|q| q.id).collect::<Vec<_>>();
        assert_eq!(vec![ids[3], ids[2]], got);
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

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
