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

//! Aggregation of the public profile of a user.

use crate::model::{AnswerId, Page, ProfileAnswer, UserId, UserPreview, UserProfile};
use sqlx::Row;
use truthful_core::db::{DbResult, Executor, build_timestamp};

/// Gets the profile of `user` including a page of its answers, newest first.
///
/// `requester` is the user looking at the profile, if any, and is used to compute the fields
/// that depend on who is asking.
pub(crate) async fn get_user_profile(
    ex: &mut Executor,
    user: UserId,
    requester: Option<UserId>,
    page: Page,
) -> DbResult<UserProfile> {
    let user_str = "
        SELECT
            username, display_name,
            (SELECT COUNT(*) FROM follows WHERE followed_id = u.id) AS follower_count,
            (SELECT COUNT(*) FROM follows WHERE follower_id = u.id) AS following_count,
            (SELECT COUNT(*) FROM answers WHERE user_id = u.id AND is_deleted = FALSE)
                AS answer_count,
            (SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = u.id)
                AS requester_follows
        FROM users AS u
        WHERE u.id = ?
    ";
    let answers_str = "
        SELECT
            a.id, a.text AS answer_text, a.created_at_secs, a.created_at_nsecs,
            q.text AS question_text, q.is_author_anonymous,
            au.id AS author_id, au.username AS author_username,
            au.display_name AS author_display_name,
            (SELECT COUNT(*) FROM answer_likes WHERE answer_id = a.id) AS like_count,
            (SELECT COUNT(*) FROM answer_likes WHERE answer_id = a.id AND user_id = ?)
                AS requester_likes
        FROM answers AS a
        JOIN questions AS q ON a.question_id = q.id
        LEFT JOIN users AS au ON q.author_id = au.id
        WHERE a.user_id = ? AND a.is_deleted = FALSE
        ORDER BY a.created_at_secs DESC, a.created_at_nsecs DESC, a.id DESC
        LIMIT ? OFFSET ?
    ";
    let requester_id = requester.map(UserId::as_i64);

    on_conn!(ex, |conn, backend| {
        let row = sqlx::query(user_str)
            .bind(requester_id)
            .bind(user.as_i64())
            .fetch_one(&mut *conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(backend::map_sqlx_error)?;
        let display_name: String = row.try_get("display_name").map_err(backend::map_sqlx_error)?;
        let follower_count: i64 = row.try_get("follower_count").map_err(backend::map_sqlx_error)?;
        let following_count: i64 =
            row.try_get("following_count").map_err(backend::map_sqlx_error)?;
        let answer_count: i64 = row.try_get("answer_count").map_err(backend::map_sqlx_error)?;
        let requester_follows: i64 =
            row.try_get("requester_follows").map_err(backend::map_sqlx_error)?;

        let rows = sqlx::query(answers_str)
            .bind(requester_id)
            .bind(user.as_i64())
            .bind(page.count())
            .bind(page.start())
            .fetch_all(&mut *conn)
            .await
            .map_err(backend::map_sqlx_error)?;
        let mut answers = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(backend::map_sqlx_error)?;
            let answer_text: String = row.try_get("answer_text").map_err(backend::map_sqlx_error)?;
            let created_at_secs: i64 =
                row.try_get("created_at_secs").map_err(backend::map_sqlx_error)?;
            let created_at_nsecs: i64 =
                row.try_get("created_at_nsecs").map_err(backend::map_sqlx_error)?;
            let question_text: String =
                row.try_get("question_text").map_err(backend::map_sqlx_error)?;
            let is_author_anonymous: bool =
                row.try_get("is_author_anonymous").map_err(backend::map_sqlx_error)?;
            let author_id: Option<i64> =
                row.try_get("author_id").map_err(backend::map_sqlx_error)?;
            let author_username: Option<String> =
                row.try_get("author_username").map_err(backend::map_sqlx_error)?;
            let author_display_name: Option<String> =
                row.try_get("author_display_name").map_err(backend::map_sqlx_error)?;
            let like_count: i64 = row.try_get("like_count").map_err(backend::map_sqlx_error)?;
            let requester_likes: i64 =
                row.try_get("requester_likes").map_err(backend::map_sqlx_error)?;

            let author = match (author_id, author_username, author_display_name) {
                (Some(id), Some(username), Some(display_name)) if !is_author_anonymous => {
                    Some(UserPreview::new(UserId::new(id), username, display_name))
                }
                _ => None,
            };

            answers.push(ProfileAnswer {
                id: AnswerId::new(id),
                is_author_anonymous,
                author,
                question_text,
                answer_text,
                date_answered: build_timestamp(created_at_secs, created_at_nsecs)?,
                like_count,
                liked_by_requester: requester_likes > 0,
            });
        }

        Ok(UserProfile {
            id: user,
            username,
            display_name,
            follower_count,
            following_count,
            answer_count,
            followed_by_requester: requester_follows > 0,
            requesting_user: requester == Some(user),
            answers,
        })
    })
}
