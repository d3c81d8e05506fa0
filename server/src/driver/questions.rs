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

//! Extends the driver with the operations on questions and answers.

use crate::db;
use crate::driver::moderation::require_moderator;
use crate::driver::{Driver, require_user, resolve_username};
use crate::model::{AnswerId, AnswerText, Question, QuestionId, QuestionText, UserId};
use truthful_core::db::{DbError, Executor};
use truthful_core::driver::{DriverError, DriverResult};

/// Gets the receiver of `question` and checks that it is `user`.
async fn require_receiver(
    ex: &mut Executor,
    question: QuestionId,
    user: UserId,
) -> DriverResult<()> {
    let receiver = match db::get_question_receiver(ex, question).await {
        Ok(receiver) => receiver,
        Err(DbError::NotFound) => {
            return Err(DriverError::NotFound("question not found".to_owned()));
        }
        Err(e) => return Err(e.into()),
    };
    if receiver != user {
        return Err(DriverError::Forbidden("user is not the receiver of the question".to_owned()));
    }
    Ok(())
}

impl Driver {
    /// Asks a question to `receiver`.
    ///
    /// `author` is `None` for visitors that did not authenticate, in which case the question is
    /// stored without an author.
    pub(crate) async fn ask_question(
        self,
        author: Option<UserId>,
        author_ip: String,
        receiver: UserId,
        text: String,
        is_author_anonymous: bool,
    ) -> DriverResult<QuestionId> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        require_user(tx.ex(), receiver, "receiver not found").await?;
        let text = QuestionText::new(text)?;

        let id = db::create_question(
            tx.ex(),
            &text,
            author,
            &author_ip,
            is_author_anonymous,
            receiver,
            now,
        )
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Gets a page of the questions that `user` received and did not answer yet.
    pub(crate) async fn get_questions(
        self,
        user: UserId,
        start: Option<i64>,
        count: Option<i64>,
    ) -> DriverResult<Vec<Question>> {
        let mut tx = self.db.begin().await?;
        let page = self.page(start, count);

        require_user(tx.ex(), user, "user not found").await?;
        let questions = db::get_questions(tx.ex(), user, page).await?;

        tx.commit().await?;
        Ok(questions)
    }

    /// Gets a page of the questions that `username` did not answer yet on behalf of the
    /// moderator `requester`.
    pub(crate) async fn moderation_get_user_questions(
        self,
        requester: UserId,
        username: String,
        start: Option<i64>,
        count: Option<i64>,
    ) -> DriverResult<Vec<Question>> {
        let mut tx = self.db.begin().await?;
        let page = self.page(start, count);

        require_moderator(tx.ex(), requester).await?;
        let user = resolve_username(tx.ex(), username).await?;
        let questions = db::get_questions(tx.ex(), user, page).await?;

        tx.commit().await?;
        Ok(questions)
    }

    /// Answers `question` on behalf of `user`, who must be its receiver.
    pub(crate) async fn answer_question(
        self,
        user: UserId,
        question: QuestionId,
        text: String,
        answerer_ip: String,
    ) -> DriverResult<AnswerId> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let text = AnswerText::new(text)?;
        require_user(tx.ex(), user, "user not found").await?;
        require_receiver(tx.ex(), question, user).await?;
        if db::is_question_answered(tx.ex(), question).await? {
            return Err(DriverError::Forbidden(
                "user has already answered the question".to_owned(),
            ));
        }

        let id = db::create_answer(tx.ex(), question, user, &text, &answerer_ip, now).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Deletes `question` and its answer, if any, on behalf of `user`, who must be its receiver.
    pub(crate) async fn delete_question(
        self,
        user: UserId,
        question: QuestionId,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        require_receiver(tx.ex(), question, user).await?;
        if db::is_question_answered(tx.ex(), question).await? {
            db::mark_answer_deleted_for_question(tx.ex(), question).await?;
        }
        db::mark_question_deleted(tx.ex(), question).await?;

        tx.commit().await?;
        Ok(())
    }
}
