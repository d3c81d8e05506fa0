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


//! API to like or unlike an answer.

use crate::driver::Driver;
use crate::model::AnswerId;
use crate::rest::MessageResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to change the caller's like on an answer.
#[derive(Deserialize, Serialize)]
pub(crate) struct LikeAnswerRequest {
    /// The answer to like or unlike.
    pub(crate) answer_id: AnswerId,

    /// Whether to like (true) or to unlike (false) the answer.
    pub(crate) like: bool,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<LikeAnswerRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let user = driver.whoami(&token)?;

    let message = if request.like {
        driver.like_answer(user, request.answer_id).await?;
        "Answer liked"
    } else {
        driver.unlike_answer(user, request.answer_id).await?;
        "Answer unliked"
    };
    Ok(Json(MessageResponse::new(message)))
}
