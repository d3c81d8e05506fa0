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

//! Persistence of the per-address request counters.

use crate::model::RateLimit;
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbResult, Executor, build_timestamp, unpack_timestamp};

/// Gets the counter for `ip`, creating a zeroed one stamped with `now` if it did not exist yet.
pub(crate) async fn get_rate_limit(
    ex: &mut Executor,
    ip: &str,
    now: OffsetDateTime,
) -> DbResult<RateLimit> {
    let select_str = "
        SELECT request_count, last_updated_secs, last_updated_nsecs
        FROM rate_limits
        WHERE ip_address = ?
    ";
    let insert_str = "
        INSERT INTO rate_limits (ip_address, request_count, last_updated_secs, last_updated_nsecs)
        VALUES (?, 0, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(select_str)
            .bind(ip)
            .fetch_optional(&mut *conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        match row {
            Some(row) => {
                let request_count: i64 =
                    row.try_get("request_count").map_err(backend::map_sqlx_error)?;
                let last_updated_secs: i64 =
                    row.try_get("last_updated_secs").map_err(backend::map_sqlx_error)?;
                let last_updated_nsecs: i64 =
                    row.try_get("last_updated_nsecs").map_err(backend::map_sqlx_error)?;
                Ok(RateLimit::new(
                    ip.to_owned(),
                    request_count,
                    build_timestamp(last_updated_secs, last_updated_nsecs)?,
                ))
            }
            None => {
                let (now_secs, now_nsecs) = unpack_timestamp(now);
                sqlx::query(insert_str)
                    .bind(ip)
                    .bind(now_secs)
                    .bind(now_nsecs)
                    .execute(&mut *conn)
                    .await
                    .map_err(backend::map_sqlx_error)?;
                Ok(RateLimit::new(ip.to_owned(), 0, now))
            }
        }
    })
}

/// Runs the counter update in `query_str` for `ip` with `now` as the new modification time.
async fn update_rate_limit(
    ex: &mut Executor,
    query_str: &'static str,
    ip: &str,
    now: OffsetDateTime,
) -> DbResult<()> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    on_conn!(ex, |conn, backend| {
        sqlx::query(query_str)
            .bind(now_secs)
            .bind(now_nsecs)
            .bind(ip)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}

/// Counts one more request for `ip`.  Addresses without a counter are left untouched.
pub(crate) async fn increment_rate_limit(
    ex: &mut Executor,
    ip: &str,
    now: OffsetDateTime,
) -> DbResult<()> {
    let query_str = "
        UPDATE rate_limits
        SET request_count = request_count + 1, last_updated_secs = ?, last_updated_nsecs = ?
        WHERE ip_address = ?
    ";
    update_rate_limit(ex, query_str, ip, now).await
}

/// Sets the counter for `ip` back to zero.
pub(crate) async fn reset_rate_limit(
    ex: &mut Executor,
    ip: &str,
    now: OffsetDateTime,
) -> DbResult<()> {
    let query_str = "
        UPDATE rate_limits
        SET request_count = 0, last_updated_secs = ?, last_updated_nsecs = ?
        WHERE ip_address = ?
    ";
    update_rate_limit(ex, query_str, ip, now).await
}
