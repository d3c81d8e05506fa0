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

//! Extends the driver with the `register` method.

use crate::db;
use crate::driver::{Driver, hash_password};
use crate::model::{Birthdate, Password, UserId};
use truthful_core::driver::{DriverError, DriverResult};
use truthful_core::model::{EmailAddress, Username};

impl Driver {
    /// Creates a new account.
    ///
    /// The fields are validated in order and the first invalid one determines the error.
    pub(crate) async fn register(
        self,
        username: String,
        password: String,
        email: String,
        birthdate: String,
    ) -> DriverResult<UserId> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        let username = Username::new(username)?;
        if db::username_exists(tx.ex(), &username).await? {
            return Err(DriverError::AlreadyExists("username already exists".to_owned()));
        }

        let password = Password::new(password);
        password.validate()?;

        let email = EmailAddress::new(email)?;
        if db::email_exists(tx.ex(), &email).await? {
            return Err(DriverError::AlreadyExists("email already exists".to_owned()));
        }

        let birthdate = Birthdate::new(birthdate, now.date())?;

        let hash = hash_password(password, self.opts.bcrypt_cost).await?;
        let id = db::create_user(tx.ex(), &username, &hash, &email, birthdate, now).await?;

        tx.commit().await?;
        Ok(id)
    }
}
