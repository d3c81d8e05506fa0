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

//! Test utilities for the business logic.

use crate::db;
use crate::driver::{Driver, DriverOptions};
use crate::model::{AccessToken, AnswerId, PromoteKind, QuestionId, UserId};
use crate::token::testutils::test_token_service;
use std::sync::Arc;
use time::OffsetDateTime;
use time::macros::datetime;
use truthful_core::clocks::Clock;
use truthful_core::clocks::testutils::SettableClock;
use truthful_core::db::{Db, Executor};

/// Password used by all users created via `TestContext::create_user`.
pub(crate) const TEST_PASSWORD: &str = "Password1";

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock backing the driver, which tests can move at will.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock, with options
    /// that keep password hashing cheap.
    pub(crate) async fn setup() -> Self {
        let opts = DriverOptions { bcrypt_cost: 4, ..Default::default() };
        Self::setup_with_opts(opts).await
    }

    /// Initializes the driver like `setup` does but with custom `opts`.
    pub(crate) async fn setup_with_opts(opts: DriverOptions) -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::from(truthful_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2023-06-01 12:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone(), test_token_service(), opts);
        Self { db, clock, driver }
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets the clock used by the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Returns the current time as seen by the driver.
    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now_utc()
    }

    /// Registers a user named `username` with `TEST_PASSWORD`.
    pub(crate) async fn create_user(&self, username: &str) -> UserId {
        self.driver()
            .register(
                username.to_owned(),
                TEST_PASSWORD.to_owned(),
                format!("{}@example.com", username),
                "2000-01-01".to_owned(),
            )
            .await
            .unwrap()
    }

    /// Grants the role `kind` to the user `id` by directly modifying the database.
    pub(crate) async fn grant(&self, id: UserId, kind: PromoteKind) {
        db::grant_role(&mut self.ex().await, id, kind).await.unwrap();
    }

    /// Issues a token for the user `id` that is valid as of now.
    pub(crate) fn token_for(&self, id: UserId) -> AccessToken {
        self.driver.tokens.issue(id, self.now()).unwrap()
    }

    /// Asks a non-anonymous question from `author` to `receiver`.
    pub(crate) async fn ask(
        &self,
        author: Option<UserId>,
        receiver: UserId,
        text: &str,
    ) -> QuestionId {
        self.driver()
            .ask_question(author, "127.0.0.1".to_owned(), receiver, text.to_owned(), false)
            .await
            .unwrap()
    }

    /// Answers `question` on behalf of `user`.
    pub(crate) async fn answer(&self, user: UserId, question: QuestionId, text: &str) -> AnswerId {
        self.driver()
            .answer_question(user, question, text.to_owned(), "127.0.0.1".to_owned())
            .await
            .unwrap()
    }
}
