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

//! Business logic for the service.

use crate::db;
use crate::model::{AccessToken, DEFAULT_PAGE_COUNT, HashedPassword, Page, Password, UserId};
use crate::token::TokenService;
use std::sync::Arc;
use std::time::Duration;
use truthful_core::clocks::Clock;
use truthful_core::db::{Db, DbError, Executor};
use truthful_core::driver::{DriverError, DriverResult};
use truthful_core::env::get_optional_var;
use truthful_core::model::Username;

mod follows;
mod likes;
mod login;
mod moderation;
mod profile;
mod questions;
mod rate_limits;
mod register;
#[cfg(test)]
pub(crate) mod testutils;

/// Default value for the `BCRYPT_COST` setting when not specified.
pub const DEFAULT_BCRYPT_COST: u32 = 14;

/// Default value for the `RATE_LIMIT_WINDOW` setting when not specified.
const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Configuration options for the driver.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct DriverOptions {
    /// Cost factor used when hashing new passwords.
    pub bcrypt_cost: u32,

    /// Number of entries returned by listings when the caller does not ask for a count.
    pub default_page_count: i64,

    /// Period after which the request counter of an idle client address starts over.
    pub rate_limit_window: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            default_page_count: DEFAULT_PAGE_COUNT,
            rate_limit_window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

impl DriverOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_BCRYPT_COST`, `<prefix>_QUESTIONS_PAGE` and
    /// `<prefix>_RATE_LIMIT_WINDOW`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            bcrypt_cost: get_optional_var::<u32>(prefix, "BCRYPT_COST")?
                .unwrap_or(DEFAULT_BCRYPT_COST),
            default_page_count: get_optional_var::<i64>(prefix, "QUESTIONS_PAGE")?
                .unwrap_or(DEFAULT_PAGE_COUNT),
            rate_limit_window: get_optional_var::<Duration>(prefix, "RATE_LIMIT_WINDOW")?
                .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW),
        })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Service to issue and verify access tokens.
    tokens: Arc<TokenService>,

    /// Options for the driver.
    opts: DriverOptions,
}

impl Driver {
    /// Creates a new driver backed by the given dependencies.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        tokens: TokenService,
        opts: DriverOptions,
    ) -> Self {
        Self { db, clock, tokens: Arc::from(tokens), opts }
    }

    /// Validates `token` and returns the user it was issued to.
    pub(crate) fn whoami(&self, token: &AccessToken) -> DriverResult<UserId> {
        self.tokens.verify(token, self.clock.now_utc())
    }

    /// Computes the page to return from the optional bounds given by a caller.
    fn page(&self, start: Option<i64>, count: Option<i64>) -> Page {
        Page::new(start.unwrap_or(0), count.unwrap_or(self.opts.default_page_count))
    }
}

/// Fails with a not found error unless the user `id` exists.
async fn require_user(ex: &mut Executor, id: UserId, message: &str) -> DriverResult<()> {
    if !db::user_exists(ex, id).await? {
        return Err(DriverError::NotFound(message.to_owned()));
    }
    Ok(())
}

/// Resolves a `username` as provided by a caller into the identifier of its user.
async fn resolve_username(ex: &mut Executor, username: String) -> DriverResult<UserId> {
    let not_found = || DriverError::NotFound("user not found".to_owned());
    let username = Username::new(username).map_err(|_| not_found())?;
    match db::get_user_id(ex, &username).await {
        Ok(id) => Ok(id),
        Err(DbError::NotFound) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

/// Hashes `password` with bcrypt at `cost` outside of the async workers.
async fn hash_password(password: Password, cost: u32) -> DriverResult<HashedPassword> {
    tokio::task::spawn_blocking(move || password.hash(cost))
        .await
        .map_err(|e| DriverError::BackendError(format!("Password hashing failed: {}", e)))?
        .map_err(|e| DriverError::BackendError(e.to_string()))
}

/// Checks `password` against `hash` outside of the async workers.
async fn verify_password(password: Password, hash: HashedPassword) -> DriverResult<bool> {
    tokio::task::spawn_blocking(move || password.verify(&hash))
        .await
        .map_err(|e| DriverError::BackendError(format!("Password check failed: {}", e)))?
        .map_err(|e| DriverError::BackendError(e.to_string()))
}
