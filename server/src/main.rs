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


//! Entry point to the Truthful service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use std::net::{Ipv4Addr, SocketAddr};
use truthful::driver::DriverOptions;
use truthful::serve;
use truthful::token::TokenOptions;
use truthful_core::db::mysql::MySqlOptions;
use truthful_core::env::get_optional_var;

/// Port to listen on when `TRUTHFUL_BIND_ADDR` is not set.
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    env_logger::init();

    let bind_addr = get_optional_var::<SocketAddr>("TRUTHFUL", "BIND_ADDR")
        .unwrap()
        .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)));

    let db_opts = MySqlOptions::from_env("MYSQL").unwrap();
    let token_opts = TokenOptions::from_env("TRUTHFUL").unwrap();
    let driver_opts = DriverOptions::from_env("TRUTHFUL").unwrap();

    serve(bind_addr, db_opts, token_opts, driver_opts).await.unwrap()
}
