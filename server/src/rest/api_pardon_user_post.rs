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


//! API to pardon an active ban.

use crate::driver::Driver;
use crate::model::BanId;
use crate::rest::CreatedResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use log::info;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to pardon a ban.
#[derive(Deserialize, Serialize)]
pub(crate) struct PardonUserRequest {
    /// The ban to pardon.
    pub(crate) ban_id: BanId,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<PardonUserRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let requester = driver.whoami(&token)?;

    let id = driver.pardon_user(requester, request.ban_id).await?;
    info!("User {} pardoned ban {}", requester, request.ban_id);

    Ok(Json(CreatedResponse { message: "User pardoned".to_owned(), id }))
}
