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


//! Test utilities for the REST API.

use crate::driver::testutils::TestContext as DriverTestContext;
use crate::model::{AccessToken, AnswerId, PromoteKind, QuestionId, UserId};
use crate::rest::app;
use axum::Router;
use truthful_core::clocks::testutils::SettableClock;
use truthful_core::db::Executor;

/// State of a running test.
pub(crate) struct TestContext {
    /// The driver-level test context backing the app.
    inner: DriverTestContext,

    /// The router under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app on top of an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let inner = DriverTestContext::setup().await;
        let app = app(inner.driver());
        Self { inner, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.inner.ex().await
    }

    /// Gets the clock used by the app.
    pub(crate) fn clock(&self) -> &SettableClock {
        self.inner.clock()
    }

    /// Registers a user named `username` and returns its identifier.
    pub(crate) async fn create_user(&self, username: &str) -> UserId {
        self.inner.create_user(username).await
    }

    /// Registers a user named `username` and returns its identifier and a valid access token.
    pub(crate) async fn create_user_with_token(&self, username: &str) -> (UserId, AccessToken) {
        let id = self.inner.create_user(username).await;
        (id, self.inner.token_for(id))
    }

    /// Grants the role `kind` to the user `id`.
    pub(crate) async fn grant(&self, id: UserId, kind: PromoteKind) {
        self.inner.grant(id, kind).await
    }

    /// Asks a question from `author` to `receiver`.
    pub(crate) async fn ask(
        &self,
        author: Option<UserId>,
        receiver: UserId,
        text: &str,
    ) -> QuestionId {
        self.inner.ask(author, receiver, text).await
    }

    /// Answers `question` on behalf of `user`.
    pub(crate) async fn answer(&self, user: UserId, question: QuestionId, text: &str) -> AnswerId {
        self.inner.answer(user, question, text).await
    }
}
