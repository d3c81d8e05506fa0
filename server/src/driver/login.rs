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

//! Extends the driver with the `login` and `refresh_token` methods.

use crate::db;
use crate::driver::{Driver, verify_password};
use crate::model::{AccessToken, Password};
use truthful_core::db::DbError;
use truthful_core::driver::{DriverError, DriverResult};
use truthful_core::model::Username;

impl Driver {
    /// Logs a user with `username` and `password` in and returns a new access token for them.
    pub(crate) async fn login(
        self,
        username: String,
        password: String,
    ) -> DriverResult<AccessToken> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let unknown = || DriverError::InvalidInput("username does not exist".to_owned());
        let username = Username::new(username).map_err(|_| unknown())?;
        let id = match db::get_user_id(tx.ex(), &username).await {
            Ok(id) => id,
            Err(DbError::NotFound) => return Err(unknown()),
            Err(e) => return Err(e.into()),
        };

        let hash = db::get_password_hash(tx.ex(), id).await?;
        let matches = verify_password(Password::new(password), hash).await?;
        if !matches {
            return Err(DriverError::InvalidInput(
                "invalid login credentials. Please try again".to_owned(),
            ));
        }

        if db::is_user_banned(tx.ex(), id, now).await? {
            return Err(DriverError::Forbidden("user is banned".to_owned()));
        }

        let token = self.tokens.issue(id, now)?;

        tx.commit().await?;
        Ok(token)
    }

    /// Exchanges a valid `token` for a fresh one issued to the same user.
    pub(crate) async fn refresh_token(self, token: AccessToken) -> DriverResult<AccessToken> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let (id, token) = self.tokens.refresh(&token, now)?;
        if !db::user_exists(tx.ex(), id).await? {
            return Err(DriverError::Unauthorized("invalid token".to_owned()));
        }

        tx.commit().await?;
        Ok(token)
    }
}
