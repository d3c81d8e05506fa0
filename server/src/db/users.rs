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

//! Persistence of user accounts and their roles.

use crate::model::{Birthdate, DisplayName, HashedPassword, PromoteKind, UserId, UserRoles};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbError, DbResult, Executor, unpack_timestamp};
use truthful_core::model::{EmailAddress, Username};

/// Creates a new user.  The display name of the new user starts as its username.
pub(crate) async fn create_user(
    ex: &mut Executor,
    username: &Username,
    password: &HashedPassword,
    email: &EmailAddress,
    birthdate: Birthdate,
    now: OffsetDateTime,
) -> DbResult<UserId> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO users
            (username, display_name, password, email, birthdate, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(username.as_str())
            .bind(username.as_str())
            .bind(password.as_str())
            .bind(email.as_str())
            .bind(birthdate.to_db_string())
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(UserId::new(backend::last_insert_id(&done)?))
    })
}

/// Checks if a user with `id` exists.
pub(crate) async fn user_exists(ex: &mut Executor, id: UserId) -> DbResult<bool> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE id = ?")
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Checks if the `username` is already taken.
pub(crate) async fn username_exists(ex: &mut Executor, username: &Username) -> DbResult<bool> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE username = ?")
            .bind(username.as_str())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Checks if the `email` address is already registered to any user.
pub(crate) async fn email_exists(ex: &mut Executor, email: &EmailAddress) -> DbResult<bool> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
            .bind(email.as_str())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Resolves a `username` into the identifier of its user.
pub(crate) async fn get_user_id(ex: &mut Executor, username: &Username) -> DbResult<UserId> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT id FROM users WHERE username = ?")
            .bind(username.as_str())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let id: i64 = row.try_get("id").map_err(backend::map_sqlx_error)?;
        Ok(UserId::new(id))
    })
}

/// Gets the password hash of the user with `id`.
pub(crate) async fn get_password_hash(ex: &mut Executor, id: UserId) -> DbResult<HashedPassword> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT password FROM users WHERE id = ?")
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(backend::map_sqlx_error)?;
        Ok(HashedPassword::new(password))
    })
}

/// Gets the moderation roles of the user with `id`.
pub(crate) async fn get_user_roles(ex: &mut Executor, id: UserId) -> DbResult<UserRoles> {
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query("SELECT is_admin, is_moderator FROM users WHERE id = ?")
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let is_admin: bool = row.try_get("is_admin").map_err(backend::map_sqlx_error)?;
        let is_moderator: bool = row.try_get("is_moderator").map_err(backend::map_sqlx_error)?;
        Ok(UserRoles { is_admin, is_moderator })
    })
}

/// Grants the role described by `kind` to the user with `id`.
pub(crate) async fn grant_role(ex: &mut Executor, id: UserId, kind: PromoteKind) -> DbResult<()> {
    let query_str = match kind {
        PromoteKind::Admin => "UPDATE users SET is_admin = TRUE WHERE id = ?",
        PromoteKind::Moderator => "UPDATE users SET is_moderator = TRUE WHERE id = ?",
    };
    on_conn!(ex, |conn, backend| {
        sqlx::query(query_str)
            .bind(id.as_i64())
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}

/// Replaces the public information of the user with `id`.
pub(crate) async fn update_user_information(
    ex: &mut Executor,
    id: UserId,
    display_name: &DisplayName,
    email: &EmailAddress,
) -> DbResult<()> {
    let query_str = "UPDATE users SET display_name = ?, email = ? WHERE id = ?";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(display_name.as_str())
            .bind(email.as_str())
            .bind(id.as_i64())
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        // MySQL only reports rows whose values changed, so zero is not an error here.
        if done.rows_affected() > 1 {
            return Err(DbError::BackendError("Update affected more than one row".to_owned()));
        }
        Ok(())
    })
}
