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


//! API to ask a question to a user.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::CreatedResponse;
use crate::rest::httputils::{client_ip, get_optional_bearer_auth};
use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use http::{HeaderMap, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use truthful_core::rest::RestError;

/// Message sent to the server to ask a question.
#[derive(Deserialize, Serialize)]
pub(crate) struct AskQuestionRequest {
    /// The user that receives the question.
    pub(crate) user_id: UserId,

    /// Text of the question.
    pub(crate) text: String,

    /// Whether the author wants to remain anonymous to the receiver.
    pub(crate) is_author_anonymous: bool,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<AskQuestionRequest>,
) -> Result<impl IntoResponse, RestError> {
    let author = match get_optional_bearer_auth(&headers)? {
        Some(token) => Some(driver.whoami(&token)?),
        None => None,
    };

    let id = driver
        .ask_question(
            author,
            client_ip(connect_info),
            request.user_id,
            request.text,
            request.is_author_anonymous,
        )
        .await?;
    debug!("Question {} asked to user {}", id, request.user_id);

    let response = CreatedResponse { message: "Question asked".to_owned(), id };
    Ok((StatusCode::CREATED, Json(response)))
}
