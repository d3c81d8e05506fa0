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


//! API to answer a question.

use crate::driver::Driver;
use crate::model::QuestionId;
use crate::rest::CreatedResponse;
use crate::rest::httputils::{client_ip, get_bearer_auth};
use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use http::{HeaderMap, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use truthful_core::rest::RestError;

/// Message sent to the server to answer a question.
#[derive(Deserialize, Serialize)]
pub(crate) struct AnswerQuestionRequest {
    /// The question to answer.
    pub(crate) question_id: QuestionId,

    /// Text of the answer.
    pub(crate) text: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<AnswerQuestionRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let user = driver.whoami(&token)?;

    let id = driver
        .answer_question(user, request.question_id, request.text, client_ip(connect_info))
        .await?;
    debug!("Question {} answered by user {}", request.question_id, user);

    let response = CreatedResponse { message: "Question answered".to_owned(), id };
    Ok((StatusCode::CREATED, Json(response)))
}
