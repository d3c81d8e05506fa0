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


//! API to update the information of the caller's account.

use crate::driver::Driver;
use crate::rest::MessageResponse;
use crate::rest::httputils::get_bearer_auth;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use truthful_core::rest::RestError;

/// Message sent to the server to update the account details.
#[derive(Deserialize, Serialize)]
pub(crate) struct UpdateUserRequest {
    /// New name to show to other users.
    pub(crate) display_name: String,

    /// New email address.
    pub(crate) email_address: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, RestError> {
    let token = get_bearer_auth(&headers)?;
    let user = driver.whoami(&token)?;

    driver.update_user(user, request.display_name, request.email_address).await?;
    Ok(Json(MessageResponse::new("User updated")))
}
