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

//! Extends the driver with the operations on the social graph.

use crate::db;
use crate::driver::{Driver, require_user, resolve_username};
use crate::model::{UserId, UserPreview};
use truthful_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Makes `follower` follow `followee`.
    pub(crate) async fn follow_user(
        self,
        follower: UserId,
        followee: UserId,
    ) -> DriverResult<()> {
        if follower == followee {
            return Err(DriverError::InvalidInput("user can't follow himself".to_owned()));
        }

        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        require_user(tx.ex(), followee, "followee not found").await?;
        require_user(tx.ex(), follower, "follower not found").await?;
        if db::follow_exists(tx.ex(), follower, followee).await? {
            return Err(DriverError::InvalidInput("user already follows this user".to_owned()));
        }

        db::create_follow(tx.ex(), follower, followee, now).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Makes `follower` stop following `followee`.
    pub(crate) async fn unfollow_user(
        self,
        follower: UserId,
        followee: UserId,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        if !db::follow_exists(tx.ex(), follower, followee).await? {
            return Err(DriverError::InvalidInput("user doesn't follow this user".to_owned()));
        }

        db::delete_follow(tx.ex(), follower, followee).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Gets a page of the users that follow `username`.
    pub(crate) async fn get_followers(
        self,
        username: String,
        start: Option<i64>,
        count: Option<i64>,
    ) -> DriverResult<Vec<UserPreview>> {
        let mut tx = self.db.begin().await?;
        let page = self.page(start, count);

        let user = resolve_username(tx.ex(), username).await?;
        let followers = db::get_followers(tx.ex(), user, page).await?;

        tx.commit().await?;
        Ok(followers)
    }
}
