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

//! Persistence of the likes that users give to answers.

use crate::model::{AnswerId, UserId};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbError, DbResult, Executor, unpack_timestamp};

/// Checks if `user` likes the answer `answer`.
pub(crate) async fn like_exists(
    ex: &mut Executor,
    user: UserId,
    answer: AnswerId,
) -> DbResult<bool> {
    let query_str =
        "SELECT COUNT(*) AS count FROM answer_likes WHERE user_id = ? AND answer_id = ?";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(user.as_i64())
            .bind(answer.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Records that `user` likes the answer `answer`.
pub(crate) async fn create_like(
    ex: &mut Executor,
    user: UserId,
    answer: AnswerId,
    now: OffsetDateTime,
) -> DbResult<()> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO answer_likes (user_id, answer_id, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        sqlx::query(query_str)
            .bind(user.as_i64())
            .bind(answer.as_i64())
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}

/// Removes the like of `user` on the answer `answer`.
pub(crate) async fn delete_like(ex: &mut Executor, user: UserId, answer: AnswerId) -> DbResult<()> {
    let query_str = "DELETE FROM answer_likes WHERE user_id = ? AND answer_id = ?";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(user.as_i64())
            .bind(answer.as_i64())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutils::*;
    use crate::db::{create_answer, create_question};
    use crate::model::{AnswerText, QuestionText};

    #[tokio::test]
    async fn test_like_lifecycle() {
        let mut ex = setup().await;
        let alice = create_test_user(&mut ex, "alice").await;
        let bob = create_test_user(&mut ex, "bob").await;
        let question = create_question(
            &mut ex,
            &QuestionText::new("Why?").unwrap(),
            Some(bob),
            "",
            false,
            alice,
            ts(100),
        )
        .await
        .unwrap();
        let answer =
            create_answer(&mut ex, question, alice, &AnswerText::new("Yes").unwrap(), "", ts(200))
                .await
                .unwrap();

        assert!(!like_exists(&mut ex, bob, answer).await.unwrap());
        create_like(&mut ex, bob, answer, ts(300)).await.unwrap();
        assert!(like_exists(&mut ex, bob, answer).await.unwrap());
        assert!(!like_exists(&mut ex, alice, answer).await.unwrap());

        assert_eq!(
            DbError::AlreadyExists,
            create_like(&mut ex, bob, answer, ts(400)).await.unwrap_err()
        );

        delete_like(&mut ex, bob, answer).await.unwrap();
        assert!(!like_exists(&mut ex, bob, answer).await.unwrap());
        assert_eq!(DbError::NotFound, delete_like(&mut ex, bob, answer).await.unwrap_err());
    }

    #[tokio::test]
    async fn test_create_like_unknown_answer() {
        let mut ex = setup().await;
        let alice = create_test_user(&mut ex, "alice").await;

        assert_eq!(
            DbError::NotFound,
            create_like(&mut ex, alice, AnswerId::new(8), ts(100)).await.unwrap_err()
        );
    }
}
