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


//! Social question and answer service.
//!
//! Users register, follow each other and ask each other questions, optionally anonymously.
//! Receivers answer the questions they get and other users like those answers.  Moderators and
//! administrators can ban and pardon users.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

#[cfg(feature = "mysql")]
use {
    crate::driver::{Driver, DriverOptions},
    crate::token::{TokenOptions, TokenService},
    log::info,
    std::error::Error,
    std::net::SocketAddr,
    std::sync::Arc,
    truthful_core::clocks::SystemClock,
    truthful_core::db::Db,
    truthful_core::db::mysql::{MySqlDb, MySqlOptions},
};

pub(crate) mod db;
pub mod driver;
pub(crate) mod model;
mod rest;
pub mod token;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
#[cfg(feature = "mysql")]
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db_opts: MySqlOptions,
    token_opts: TokenOptions,
    driver_opts: DriverOptions,
) -> Result<(), Box<dyn Error>> {
    let db = Arc::from(MySqlDb::connect(db_opts)?);
    db::init_schema(&mut db.ex().await?).await?;

    let clock = Arc::from(SystemClock::default());
    let driver = Driver::new(db, clock, TokenService::new(token_opts), driver_opts);
    let app = rest::app(driver);

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
