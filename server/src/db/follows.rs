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

//! Persistence of the follow relationships between users.

use crate::model::{Page, UserId, UserPreview};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbError, DbResult, Executor, unpack_timestamp};

/// Checks if `follower` follows `followed`.
pub(crate) async fn follow_exists(
    ex: &mut Executor,
    follower: UserId,
    followed: UserId,
) -> DbResult<bool> {
    let query_str =
        "SELECT COUNT(*) AS count FROM follows WHERE follower_id = ? AND followed_id = ?";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(follower.as_i64())
            .bind(followed.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Records that `follower` now follows `followed`.
pub(crate) async fn create_follow(
    ex: &mut Executor,
    follower: UserId,
    followed: UserId,
    now: OffsetDateTime,
) -> DbResult<()> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO follows (follower_id, followed_id, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        sqlx::query(query_str)
            .bind(follower.as_i64())
            .bind(followed.as_i64())
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}

/// Removes the follow relationship from `follower` to `followed`.
pub(crate) async fn delete_follow(
    ex: &mut Executor,
    follower: UserId,
    followed: UserId,
) -> DbResult<()> {
    let query_str = "DELETE FROM follows WHERE follower_id = ? AND followed_id = ?";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(follower.as_i64())
            .bind(followed.as_i64())
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        match done.rows_affected() {
            0 => Err(DbError::NotFound),
            1 => Ok(()),
            _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
        }
    })
}

/// Gets a page of the users that follow `followed`, most recent followers first.
pub(crate) async fn get_followers(
    ex: &mut Executor,
    followed: UserId,
    page: Page,
) -> DbResult<Vec<UserPreview>> {
    let query_str = "
        SELECT u.id, u.username, u.display_name
        FROM follows AS f
        JOIN users AS u ON f.follower_id = u.id
        WHERE f.followed_id = ?
        ORDER BY f.created_at_secs DESC, f.created_at_nsecs DESC, u.id DESC
        LIMIT ? OFFSET ?
    ";
    on_conn!(ex, |conn, backend| {
        let rows = sqlx::query(query_str)
            .bind(followed.as_i64())
            .bind(page.count())
            .bind(page.start())
            .fetch_all(conn)
            .await
            .map_err(backend::map_sqlx_error)?;

        let mut followers = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(backend::map_sqlx_error)?;
            let username: String = row.try_get("username").map_err(backend::map_sqlx_error)?;
            let display_name: String =
                row.try_get("display_name").map_err(backend::map_sqlx_error)?;
            followers.push(UserPreview::new(UserId::new(id), username, display_name));
        }
        Ok(followers)
    })
}
