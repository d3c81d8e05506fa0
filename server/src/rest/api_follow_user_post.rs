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


//! API to follow or unfollow another user.

use crate::driver::Driver;
use crate::model::UserId;
use crate::rest::MessageResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to change the relationship with another user.
#[derive(Deserialize, Serialize)]
pub(crate) struct FollowUserRequest {
    /// The user to follow or unfollow.
    pub(crate) user_id: UserId,

    /// Whether to start following (true) or to stop following (false) the user.
    pub(crate) follow: bool,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<FollowUserRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let requester = driver.whoami(&token)?;

    let message = if request.follow {
        driver.follow_user(requester, request.user_id).await?;
        "User followed"
    } else {
        driver.unfollow_user(requester, request.user_id).await?;
        "User unfollowed"
    };
    Ok(Json(MessageResponse::new(message)))
}
