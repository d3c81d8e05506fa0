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

//! Persistence of answers.

use crate::model::{AnswerId, AnswerText, QuestionId, UserId};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbResult, Executor, unpack_timestamp};

/// Stores the answer given by `user` to the question `question`.
pub(crate) async fn create_answer(
    ex: &mut Executor,
    question: QuestionId,
    user: UserId,
    text: &AnswerText,
    answerer_ip: &str,
    now: OffsetDateTime,
) -> DbResult<AnswerId> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO answers
            (question_id, user_id, text, answerer_ip, created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(question.as_i64())
            .bind(user.as_i64())
            .bind(text.as_str())
            .bind(answerer_ip)
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(AnswerId::new(backend::last_insert_id(&done)?))
    })
}

/// Checks if the answer `id` exists and was not deleted.
pub(crate) async fn answer_exists(ex: &mut Executor, id: AnswerId) -> DbResult<bool> {
    let query_str = "SELECT COUNT(*) AS count FROM answers WHERE id = ? AND is_deleted = FALSE";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let count: i64 = row.try_get("count").map_err(backend::map_sqlx_error)?;
        Ok(count > 0)
    })
}

/// Flags the answer to `question`, if any, as deleted.
pub(crate) async fn mark_answer_deleted_for_question(
    ex: &mut Executor,
    question: QuestionId,
) -> DbResult<()> {
    on_conn!(ex, |conn, backend| {
        sqlx::query("UPDATE answers SET is_deleted = TRUE WHERE question_id = ?")
            .bind(question.as_i64())
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}
