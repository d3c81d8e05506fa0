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


//! API to create a new user account.

use crate::driver::Driver;
use crate::rest::CreatedResponse;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::StatusCode;
use log::info;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to create an account.
#[derive(Deserialize, Serialize)]
pub(crate) struct RegisterRequest {
    /// Desired username.
    pub(crate) username: String,

    /// Desired password.
    pub(crate) password: String,

    /// Email address for the user.
    pub(crate) email_address: String,

    /// Birthdate of the user in `YYYY-MM-DD` form.
    pub(crate) birthdate: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RestError> {
    let id = driver
        .register(request.username, request.password, request.email_address, request.birthdate)
        .await?;
    info!("Registered new user {}", id);

    let response = CreatedResponse { message: "User created".to_owned(), id };
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::{UserId, UserProfile};
    use crate::rest::testutils::*;
    use axum::http;
    use truthful_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/register".to_owned())
    }

    /// Creates a valid request to register a user named `username`.
    fn valid_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_owned(),
            password: "Password1".to_owned(),
            email_address: format!("{}@example.com", username),
            birthdate: "2000-01-01".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(valid_request("alice123"))
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<CreatedResponse<UserId>>()
            .await;
        assert_eq!("User created", response.message);
        assert!(db::user_exists(&mut context.ex().await, response.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_username_with_space_and_mixed_case() {
        let context = TestContext::setup().await;

        let mut request = valid_request("John Doe");
        request.email_address = "john@example.com".to_owned();
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<CreatedResponse<UserId>>()
            .await;

        let profile_route = (http::Method::GET, "/get_user_profile/John%20Doe".to_owned());
        let profile = OneShotBuilder::new(context.into_app(), profile_route)
            .send_empty()
            .await
            .expect_json::<UserProfile>()
            .await;
        assert_eq!(response.id, profile.id);
        assert_eq!("John Doe", profile.username);
    }

    #[tokio::test]
    async fn test_username_taken() {
        let context = TestContext::setup().await;
        context.create_user("alice123").await;

        let mut request = valid_request("alice123");
        request.email_address = "other@example.com".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("username already exists")
            .await;
    }

    #[tokio::test]
    async fn test_bad_username() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_json(valid_request("al"))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("username must be between 3 and 20 characters")
            .await;
    }

    #[tokio::test]
    async fn test_weak_password() {
        let context = TestContext::setup().await;

        let mut request = valid_request("alice123");
        request.password = "short".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("password must be at least 8 characters")
            .await;
    }

    #[tokio::test]
    async fn test_bad_birthdate() {
        let context = TestContext::setup().await;

        let mut request = valid_request("alice123");
        request.birthdate = "01/01/2000".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("YYYY-MM-DD")
            .await;
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let context = TestContext::setup().await;

        let request = serde_json::json!({"username": "alice123", "password": "Password1"});
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(StatusCode::UNPROCESSABLE_ENTITY)
            .expect_text("missing field")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
