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


//! Utilities to deal with HTTP authorization and client details.

use crate::model::AccessToken;
use axum::extract::ConnectInfo;
use http::header::HeaderMap;
use std::net::SocketAddr;
use truthful_core::rest::{RestError, RestResult, get_unique_header};

/// Validates that the `Authorization` HTTP header contains a bearer token and returns it in its
/// raw form.
fn get_authorization_payload(headers: &HeaderMap) -> RestResult<&str> {
    let authz = match get_unique_header(headers, "Authorization") {
        Ok(Some(value)) => value,
        Ok(None) => {
            return Err(RestError::Unauthorized("Missing Authorization header".to_owned()));
        }
        Err(e) => return Err(RestError::Unauthorized(e.to_string())),
    };

    let authz = match authz.to_str() {
        Ok(value) => value,
        Err(e) => {
            return Err(RestError::Unauthorized(format!(
                "Bad encoding in Authorization header: {}",
                e
            )));
        }
    };

    let mut fields = authz.splitn(2, ' ');
    let scheme = match fields.next() {
        Some(s) if !s.is_empty() => s,
        _ => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing scheme".to_owned(),
            ));
        }
    };
    let payload = match fields.next() {
        Some(s) => s,
        None => {
            return Err(RestError::Unauthorized(
                "Bad Authorization header: missing payload".to_owned(),
            ));
        }
    };

    if scheme != "Bearer" {
        return Err(RestError::Unauthorized("Unsupported scheme".to_owned()));
    }

    Ok(payload)
}

/// Assumes that the `headers` contain a bearer access token and extracts it.
pub(crate) fn get_bearer_auth(headers: &HeaderMap) -> RestResult<AccessToken> {
    let payload = get_authorization_payload(headers)?;
    AccessToken::new(payload).map_err(|e| RestError::Unauthorized(e.to_string()))
}

/// Extracts the bearer access token from the `headers` if there is one.
///
/// A request without an `Authorization` header comes from an anonymous caller, but a header that
/// is present must be valid.
pub(crate) fn get_optional_bearer_auth(headers: &HeaderMap) -> RestResult<Option<AccessToken>> {
    match get_unique_header(headers, "Authorization") {
        Ok(Some(_)) => get_bearer_auth(headers).map(Some),
        Ok(None) => Ok(None),
        Err(e) => Err(RestError::Unauthorized(e.to_string())),
    }
}

/// Returns the address of the client that sent the request, or an empty string if unknown.
pub(crate) fn client_ip(connect_info: Option<ConnectInfo<SocketAddr>>) -> String {
    match connect_info {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => String::new(),
    }
}
