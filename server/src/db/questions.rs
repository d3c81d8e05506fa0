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

//! Persistence of questions.

use crate::model::{Page, Question, QuestionId, QuestionText, UserId, UserPreview};
use sqlx::Row;
use time::OffsetDateTime;
use truthful_core::db::{DbResult, Executor, build_timestamp, unpack_timestamp};

/// Stores a new question asked to `receiver`.
///
/// `author` is `None` when the question comes from a visitor that did not authenticate.
pub(crate) async fn create_question(
    ex: &mut Executor,
    text: &QuestionText,
    author: Option<UserId>,
    author_ip: &str,
    is_author_anonymous: bool,
    receiver: UserId,
    now: OffsetDateTime,
) -> DbResult<QuestionId> {
    let (now_secs, now_nsecs) = unpack_timestamp(now);
    let query_str = "
        INSERT INTO questions
            (text, author_id, author_ip, is_author_anonymous, receiver_id,
                created_at_secs, created_at_nsecs)
        VALUES (?, ?, ?, ?, ?, ?, ?)
    ";
    on_conn!(ex, |conn, backend| {
        let done = sqlx::query(query_str)
            .bind(text.as_str())
            .bind(author.map(UserId::as_i64))
            .bind(author_ip)
            .bind(is_author_anonymous)
            .bind(receiver.as_i64())
            .bind(now_secs)
            .bind(now_nsecs)
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(QuestionId::new(backend::last_insert_id(&done)?))
    })
}

/// Gets the receiver of the question `id`, which must not have been deleted.
pub(crate) async fn get_question_receiver(ex: &mut Executor, id: QuestionId) -> DbResult<UserId> {
    let query_str = "SELECT receiver_id FROM questions WHERE id = ? AND is_deleted = FALSE";
    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_one(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let receiver_id: i64 = row.try_get("receiver_id").map_err(backend::map_sqlx_error)?;
        Ok(UserId::new(receiver_id))
    })
}

/// Checks if the question `id` has an answer that was not deleted.
pub(crate) async fn is_question_answered(ex: &mut Executor, id: QuestionId) -> DbResult<bool> {
    let query_str =
        "SELECT COUNT(*) AS count FROM answers WHERE question_id = ? AND is_deleted = FALSE";
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

/// Gets a page of the questions received by `receiver`, newest first.
///
/// The page is computed over all questions that were not deleted and answered questions are
/// dropped afterwards, so the result may hold fewer than `page.count()` entries even if more
/// pending questions exist.
pub(crate) async fn get_questions(
    ex: &mut Executor,
    receiver: UserId,
    page: Page,
) -> DbResult<Vec<Question>> {
    let query_str = "
        SELECT
            q.id, q.text, q.is_author_anonymous, q.receiver_id,
            q.created_at_secs, q.created_at_nsecs,
            u.id AS author_id, u.username AS author_username,
            u.display_name AS author_display_name
        FROM questions AS q
        LEFT JOIN users AS u ON q.author_id = u.id
        WHERE q.receiver_id = ? AND q.is_deleted = FALSE
        ORDER BY q.created_at_secs DESC, q.created_at_nsecs DESC, q.id DESC
        LIMIT ? OFFSET ?
    ";
    let answered_str =
        "SELECT COUNT(*) AS count FROM answers WHERE question_id = ? AND is_deleted = FALSE";
    on_conn!(ex, |conn, backend| {
        let rows = sqlx::query(query_str)
            .bind(receiver.as_i64())
            .bind(page.count())
            .bind(page.start())
            .fetch_all(&mut *conn)
            .await
            .map_err(backend::map_sqlx_error)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(backend::map_sqlx_error)?;

            let answered = sqlx::query(answered_str)
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .map_err(backend::map_sqlx_error)?;
            let count: i64 = answered.try_get("count").map_err(backend::map_sqlx_error)?;
            if count > 0 {
                continue;
            }

            let text: String = row.try_get("text").map_err(backend::map_sqlx_error)?;
            let is_author_anonymous: bool =
                row.try_get("is_author_anonymous").map_err(backend::map_sqlx_error)?;
            let receiver_id: i64 = row.try_get("receiver_id").map_err(backend::map_sqlx_error)?;
            let created_at_secs: i64 =
                row.try_get("created_at_secs").map_err(backend::map_sqlx_error)?;
            let created_at_nsecs: i64 =
                row.try_get("created_at_nsecs").map_err(backend::map_sqlx_error)?;
            let author_id: Option<i64> =
                row.try_get("author_id").map_err(backend::map_sqlx_error)?;
            let author_username: Option<String> =
                row.try_get("author_username").map_err(backend::map_sqlx_error)?;
            let author_display_name: Option<String> =
                row.try_get("author_display_name").map_err(backend::map_sqlx_error)?;

            let author = match (author_id, author_username, author_display_name) {
                (Some(id), Some(username), Some(display_name)) if !is_author_anonymous => {
                    Some(UserPreview::new(UserId::new(id), username, display_name))
                }
                _ => None,
            };

            questions.push(Question {
                id: QuestionId::new(id),
                text,
                is_author_anonymous,
                author,
                receiver_id: UserId::new(receiver_id),
                created_at: build_timestamp(created_at_secs, created_at_nsecs)?,
            });
        }
        Ok(questions)
    })
}

/// Flags the question `id` as deleted.
pub(crate) async fn mark_question_deleted(ex: &mut Executor, id: QuestionId) -> DbResult<()> {
    on_conn!(ex, |conn, backend| {
        sqlx::query("UPDATE questions SET is_deleted = TRUE WHERE id = ?")
            .bind(id.as_i64())
            .execute(conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        Ok(())
    })
}
