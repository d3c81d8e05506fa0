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


//! REST interface for the question and answer service.

use crate::driver::Driver;
use axum::Router;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

mod api_answer_question_post;
mod api_ask_question_post;
mod api_ban_user_post;
mod api_delete_question_post;
mod api_follow_user_post;
mod api_followers_get;
mod api_like_answer_post;
mod api_login_post;
mod api_moderation_user_questions_get;
mod api_pardon_user_post;
mod api_promote_user_post;
mod api_questions_get;
mod api_refresh_token_get;
mod api_register_post;
mod api_update_user_post;
mod api_user_profile_get;
mod httputils;
#[cfg(test)]
mod testutils;

/// Response for APIs that only need to confirm that an operation succeeded.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct MessageResponse {
    /// Human-readable description of the outcome.
    pub(crate) message: String,
}

impl MessageResponse {
    /// Creates a new response with the given `message`.
    fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}

/// Response for APIs that create a new entity.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct CreatedResponse<I> {
    /// Human-readable description of the outcome.
    pub(crate) message: String,

    /// Identifier of the new entity.
    pub(crate) id: I,
}

/// Query parameters accepted by the APIs that return listings.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct PageQuery {
    /// Maximum number of entries to return.
    pub(crate) count: Option<i64>,

    /// Number of entries to skip.
    pub(crate) start: Option<i64>,
}

/// Counts every request against the address of the client that sent it.
///
/// Failures to update the counters are logged but do not prevent the request from being served.
async fn count_requests(
    State(driver): State<Driver>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(ConnectInfo(addr)) = connect_info {
        match driver.record_request(addr.ip().to_string()).await {
            Ok(limit) => debug!(
                "Client {} sent {} requests in the current window",
                limit.ip_address(),
                limit.request_count()
            ),
            Err(e) => warn!("Failed to count request from {}: {}", addr.ip(), e),
        }
    }
    next.run(request).await
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/register", post(api_register_post::handler))
        .route("/login", post(api_login_post::handler))
        .route("/refresh_token", get(api_refresh_token_get::handler))
        .route("/get_user_profile/:user", get(api_user_profile_get::handler))
        .route("/get_followers/:user", get(api_followers_get::handler))
        .route("/follow_user", post(api_follow_user_post::handler))
        .route("/ask_question", post(api_ask_question_post::handler))
        .route("/get_questions", get(api_questions_get::handler))
        .route("/answer_question", post(api_answer_question_post::handler))
        .route("/delete_question", post(api_delete_question_post::handler))
        .route("/like_answer", post(api_like_answer_post::handler))
        .route("/update_user", post(api_update_user_post::handler))
        .route("/promote_user", post(api_promote_user_post::handler))
        .route("/ban_user", post(api_ban_user_post::handler))
        .route("/pardon_user", post(api_pardon_user_post::handler))
        .route(
            "/moderation/get_user_questions/:user",
            get(api_moderation_user_questions_get::handler),
        )
        .layer(middleware::from_fn_with_state(driver.clone(), count_requests))
        .layer(cors)
        .with_state(driver)
}

#[cfg(test)]
mod tests {
    use super::api_ask_question_post::AskQuestionRequest;
    use super::api_login_post::{LoginRequest, TokenResponse};
    use super::api_register_post::RegisterRequest;
    use super::testutils::*;
    use super::*;
    use crate::db;
    use crate::model::{AnswerId, Question, QuestionId, UserId, UserProfile};
    use http::{Method, StatusCode};
    use std::time::Duration;
    use truthful_core::clocks::Clock;
    use truthful_core::rest::testutils::*;

    #[tokio::test]
    async fn test_e2e_register_ask_answer_flow() {
        let context = TestContext::setup().await;

        let request = RegisterRequest {
            username: "alice123".to_owned(),
            password: "Password1".to_owned(),
            email_address: "a@b.com".to_owned(),
            birthdate: "2000-01-01".to_owned(),
        };
        let response = OneShotBuilder::new(context.app(), (Method::POST, "/register"))
            .send_json(request)
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<CreatedResponse<UserId>>()
            .await;
        let alice = response.id;
        assert!(alice.as_i64() > 0);

        let request =
            LoginRequest { username: "alice123".to_owned(), password: "Password2".to_owned() };
        OneShotBuilder::new(context.app(), (Method::POST, "/login"))
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("invalid login credentials")
            .await;

        let request =
            LoginRequest { username: "alice123".to_owned(), password: "Password1".to_owned() };
        let response = OneShotBuilder::new(context.app(), (Method::POST, "/login"))
            .send_json(request)
            .await
            .expect_json::<TokenResponse>()
            .await;
        let alice_token = response.token;
        assert!(!alice_token.as_str().is_empty());

        let (_bob, bob_token) = context.create_user_with_token("bob").await;
        let request = AskQuestionRequest {
            user_id: alice,
            text: "What is your favorite color?".to_owned(),
            is_author_anonymous: true,
        };
        let response = OneShotBuilder::new(context.app(), (Method::POST, "/ask_question"))
            .with_bearer_auth(bob_token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<CreatedResponse<QuestionId>>()
            .await;
        let question = response.id;

        let questions = OneShotBuilder::new(context.app(), (Method::GET, "/get_questions"))
            .with_bearer_auth(alice_token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<Question>>()
            .await;
        assert_eq!(1, questions.len());
        assert_eq!(question, questions[0].id);
        assert!(questions[0].author.is_none());

        let request = serde_json::json!({"question_id": question, "text": "Blue"});
        let response = OneShotBuilder::new(context.app(), (Method::POST, "/answer_question"))
            .with_bearer_auth(alice_token.as_str())
            .send_json(request)
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<CreatedResponse<AnswerId>>()
            .await;
        let answer = response.id;

        let request = serde_json::json!({"answer_id": answer, "like": true});
        OneShotBuilder::new(context.app(), (Method::POST, "/like_answer"))
            .with_bearer_auth(bob_token.as_str())
            .send_json(request)
            .await
            .expect_json::<MessageResponse>()
            .await;

        let profile =
            OneShotBuilder::new(context.app(), (Method::GET, "/get_user_profile/alice123"))
                .with_bearer_auth(bob_token.as_str())
                .send_empty()
                .await
                .expect_json::<UserProfile>()
                .await;
        assert_eq!(alice, profile.id);
        assert_eq!(1, profile.answer_count);
        assert_eq!(1, profile.answers.len());
        assert_eq!("Blue", profile.answers[0].answer_text);
        assert_eq!(1, profile.answers[0].like_count);
        assert!(profile.answers[0].liked_by_requester);
        assert!(!profile.requesting_user);

        let questions = OneShotBuilder::new(context.app(), (Method::GET, "/get_questions"))
            .with_bearer_auth(alice_token.as_str())
            .send_empty()
            .await
            .expect_json::<Vec<Question>>()
            .await;
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_e2e_token_expiration() {
        let context = TestContext::setup().await;

        let (_, token) = context.create_user_with_token("alice").await;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/refresh_token"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<TokenResponse>()
            .await;
        assert_eq!("Token refreshed", response.message);

        context.clock().advance(Duration::from_secs(8 * 24 * 60 * 60));
        OneShotBuilder::new(context.app(), (Method::GET, "/get_questions"))
            .with_bearer_auth(response.token.as_str())
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("token expired")
            .await;
    }

    #[tokio::test]
    async fn test_requests_are_counted_per_client() {
        let context = TestContext::setup().await;

        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        for _ in 0..3 {
            OneShotBuilder::new(context.app(), (Method::GET, "/get_followers/unknown"))
                .with_extension(ConnectInfo(addr))
                .send_empty()
                .await
                .expect_status(StatusCode::NOT_FOUND)
                .expect_error("user not found")
                .await;
        }

        let now = context.clock().now_utc();
        let limit = db::get_rate_limit(&mut context.ex().await, "10.1.2.3", now).await.unwrap();
        assert_eq!(3, *limit.request_count());
    }

    #[tokio::test]
    async fn test_requests_without_client_address_are_not_counted() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (Method::GET, "/get_followers/unknown"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("user not found")
            .await;

        let now = context.clock().now_utc();
        let limit = db::get_rate_limit(&mut context.ex().await, "", now).await.unwrap();
        assert_eq!(0, *limit.request_count());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/get_followers/unknown"))
            .with_header(http::header::ORIGIN, "https://example.com")
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .take_response()
            .await;
        let allow = response.headers().get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap();
        assert_eq!("*", allow.to_str().unwrap());
    }
}
