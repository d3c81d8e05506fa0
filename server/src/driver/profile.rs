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

//! Extends the driver with the operations on user profiles.

use crate::db;
use crate::driver::{Driver, require_user, resolve_username};
use crate::model::{DisplayName, UserId, UserProfile};
use truthful_core::db::DbError;
use truthful_core::driver::{DriverError, DriverResult};
use truthful_core::model::EmailAddress;

impl Driver {
    /// Gets the public profile of `username` as seen by `requester`.
    pub(crate) async fn get_user_profile(
        self,
        requester: Option<UserId>,
        username: String,
        start: Option<i64>,
        count: Option<i64>,
    ) -> DriverResult<UserProfile> {
        let mut tx = self.db.begin().await?;
        let page = self.page(start, count);

        let user = resolve_username(tx.ex(), username).await?;
        let profile = db::get_user_profile(tx.ex(), user, requester, page).await?;

        tx.commit().await?;
        Ok(profile)
    }

    /// Replaces the display name and email address of `user`.
    pub(crate) async fn update_user(
        self,
        user: UserId,
        display_name: String,
        email: String,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        require_user(tx.ex(), user, "user not found").await?;
        let display_name = DisplayName::new(display_name)?;
        let email = EmailAddress::new(email)?;

        match db::update_user_information(tx.ex(), user, &display_name, &email).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => {
                return Err(DriverError::AlreadyExists("email already exists".to_owned()));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}
