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

//! Persistence of bans and of the pardons that lift them.

use crate::model::{BanId, PardonId, UserId};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbResult, Executor, unpack_timestamp};

/// Stores a ban of `user` issued by `author`.  A ban without `expires_at` is permanent.
pub(crate) async fn create_ban(
    ex: &mut Executor,
    user: UserId,
    author: UserId,
    reason: &str,
    now: OffsetDateTime,
    expires_at: Option<OffsetDateTime>,
) -> DbResult<BanId> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let (expires_secs, expires_nsecs) = match expires_at {
        Some(expires_at) => {
            let (secs, nsecs) = unpack_timestamp(expires_at);
            (Some(secs), Some(nsecs))
        }
        None => (None, None),
    };
    let query_str = "
        INSERT INTO bans
            (user_id, author_id, reason, created_at_secs, created_at_nsecs,
                expires_at_secs, expires_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(user.as_i64())
            .bind(author.as_i64())
            .bind(reason)
            .bind(now_secs)
            .bind(now_nsecs)
            .bind(expires_secs)
            .bind(expires_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(BanId::new(backend::last_insert_id(&done)?))
    })
}

/// Checks if the ban `id` exists and has not expired as of `now`.
pub(crate) async fn is_ban_active(
    ex: &mut Executor,
    id: BanId,
    now: OffsetDateTime,
) -> DbResult<bool> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        SELECT COUNT(*) AS count FROM bans
        WHERE id = ? AND (
            expires_at_secs IS NULL
            OR expires_at_secs > ?
            OR (expires_at_secs = ? AND expires_at_nsecs > ?))
    ";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .bind(now_secs)
            .bind(now_secs)
            .bind(now_nsecs)
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Checks if the ban `id` has been pardoned.
pub(crate) async fn pardon_exists(ex: &mut Executor, id: BanId) -> DbResult<bool> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM pardons WHERE ban_id = ?")
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Lifts the ban `ban` on behalf of `pardoner`.
pub(crate) async fn create_pardon(
    ex: &mut Executor,
    ban: BanId,
    pardoner: UserId,
    now: OffsetDateTime,
) -> DbResult<PardonId> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO pardons (ban_id, pardoner_id, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(ban.as_i64())
            .bind(pardoner.as_i64())
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(PardonId::new(backend::last_insert_id(&done)?))
    })
}

/// Checks if `user` is subject to any ban that is active as of `now` and that was not pardoned.
pub(crate) async fn is_user_banned(
    ex: &mut Executor,
    user: UserId,
    now: OffsetDateTime,
) -> DbResult<bool> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        SELECT COUNT(*) AS count FROM bans AS b
        LEFT JOIN pardons AS p ON p.ban_id = b.id
        WHERE b.user_id = ? AND p.id IS NULL AND (
            b.expires_at_secs IS NULL
            OR b.expires_at_secs > ?
            OR (b.expires_at_secs = ? AND b.expires_at_nsecs > ?))
    ";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(user.as_i64())
            .bind(now_secs)
            .bind(now_secs)
            .bind(now_nsecs)
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}
