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

//! Database abstraction in terms of the operations needed by the server.
//!
//! Every function in this module takes an `Executor` and issues the queries for a single
//! persistence operation.  Queries use `?` placeholders so that their text is shared by the MySQL
//! and SQLite backends.  Timestamps are stored as pairs of seconds and nanoseconds columns, and
//! they always come from the caller: there are no calls to `NOW()` in here.

#[cfg(feature = "mysql")]
use truthful_core::db::mysql;
#[cfg(any(feature = "sqlite", test))]
use truthful_core::db::sqlite;
use truthful_core::db::{DbResult, Executor};

/// Evaluates `$body` with `$conn` bound to the raw connection behind the `$ex` executor and with
/// `$backend` naming the `truthful_core::db` module of the matching backend.
macro_rules! on_conn [
    ( $ex:expr, |$conn:ident, $backend:ident| $body:expr ) => {
        match $ex {
            #[cfg(feature = "mysql")]
            truthful_core::db::Executor::MySql(ex) => {
                #[allow(unused)]
                use truthful_core::db::mysql as $backend;
                let $conn = ex.conn();
                $body
            }

            #[cfg(any(feature = "sqlite", test))]
            truthful_core::db::Executor::Sqlite(ex) => {
                #[allow(unused)]
                use truthful_core::db::sqlite as $backend;
                let $conn = ex.conn();
                $body
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }
];

mod answers;
pub(crate) use answers::*;
mod bans;
pub(crate) use bans::*;
mod follows;
pub(crate) use follows::*;
mod likes;
pub(crate) use likes::*;
mod profile;
pub(crate) use profile::*;
mod questions;
pub(crate) use questions::*;
mod rate_limits;
pub(crate) use rate_limits::*;
mod users;
pub(crate) use users::*;

#[cfg(test)]
pub(crate) mod testutils;

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "mysql")]
        Executor::MySql(ex) => mysql::run_schema(ex, include_str!("mysql.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}
