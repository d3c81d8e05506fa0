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

//! Extends the driver with the operations on likes.

use crate::db;
use crate::driver::{Driver, require_user};
use crate::model::{AnswerId, UserId};
use truthful_core::db::Executor;
use truthful_core::driver::{DriverError, DriverResult};

/// Checks that both `user` and `answer` exist.
async fn require_user_and_answer(
    ex: &mut Executor,
    user: UserId,
    answer: AnswerId,
) -> DriverResult<()> {
    require_user(ex, user, "user not found").await?;
    if !db::answer_exists(ex, answer).await? {
        return Err(DriverError::NotFound("post not found".to_owned()));
    }
    Ok(())
}

impl Driver {
    /// Records that `user` likes `answer`.
    pub(crate) async fn like_answer(self, user: UserId, answer: AnswerId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        require_user_and_answer(tx.ex(), user, answer).await?;
        if db::like_exists(tx.ex(), user, answer).await? {
            return Err(DriverError::InvalidInput("user already likes this post".to_owned()));
        }

        db::create_like(tx.ex(), user, answer, now).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Removes the like of `user` on `answer`.
    pub(crate) async fn unlike_answer(self, user: UserId, answer: AnswerId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        require_user_and_answer(tx.ex(), user, answer).await?;
        if !db::like_exists(tx.ex(), user, answer).await? {
            return Err(DriverError::InvalidInput("user does not like this post".to_owned()));
        }

        db::delete_like(tx.ex(), user, answer).await?;

        tx.commit().await?;
        Ok(())
    }
}
