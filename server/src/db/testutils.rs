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

//! Test utilities for the database layer.

use crate::db::{create_user, init_schema};
use crate::model::{Birthdate, HashedPassword, UserId};
use time::macros::date;
use time::OffsetDateTime;
use truthful_core::db::{Db, Executor};
use truthful_core::model::{EmailAddress, Username};

/// Password hash stored for all users created by `create_test_user`.
pub(crate) const TEST_PASSWORD_HASH: &str = "not-a-real-hash";

/// Initializes an in-memory database with the schema and returns an executor against it.
pub(crate) async fn setup() -> Executor {
    let db = truthful_core::db::sqlite::testutils::setup().await;
    let mut ex = db.ex().await.unwrap();
    init_schema(&mut ex).await.unwrap();
    ex
}

/// Returns a birthdate that is valid for registration.
pub(crate) fn test_birthdate() -> Birthdate {
    Birthdate::new("2000-01-15", date!(2023 - 06 - 01)).unwrap()
}

/// Creates a user named `username` with an email address derived from it.
pub(crate) async fn create_test_user(ex: &mut Executor, username: &'static str) -> UserId {
    create_user(
        ex,
        &Username::from(username),
        &HashedPassword::new(TEST_PASSWORD_HASH),
        &EmailAddress::new(format!("{}@example.com", username)).unwrap(),
        test_birthdate(),
        OffsetDateTime::from_unix_timestamp(1000).unwrap(),
    )
    .await
    .unwrap()
}

/// Returns a timestamp `secs` seconds after the epoch.
pub(crate) fn ts(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(secs).unwrap()
}
