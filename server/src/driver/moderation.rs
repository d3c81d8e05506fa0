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

//! Extends the driver with the moderation operations.

use crate::db;
use crate::driver::{Driver, require_user};
use crate::model::{BanId, PardonId, PromoteKind, UserId, UserRoles};
use std::str::FromStr;
use time::Duration;
use truthful_core::db::{DbError, Executor};
use truthful_core::driver::{DriverError, DriverResult};

/// Gets the roles of the user that issued a request.  Unknown users hold no roles.
async fn requester_roles(ex: &mut Executor, requester: UserId) -> DriverResult<UserRoles> {
    match db::get_user_roles(ex, requester).await {
        Ok(roles) => Ok(roles),
        Err(DbError::NotFound) => Ok(UserRoles::default()),
        Err(e) => Err(e.into()),
    }
}

/// Fails unless `requester` is a moderator or an admin.
pub(super) async fn require_moderator(ex: &mut Executor, requester: UserId) -> DriverResult<()> {
    if !requester_roles(ex, requester).await?.can_moderate() {
        return Err(DriverError::Forbidden("user is not a moderator or admin".to_owned()));
    }
    Ok(())
}

impl Driver {
    /// Bans `user` on behalf of `requester` for `duration_hours`.  A non-positive duration issues
    /// a permanent ban.
    pub(crate) async fn ban_user(
        self,
        requester: UserId,
        user: UserId,
        duration_hours: i64,
        reason: String,
    ) -> DriverResult<BanId> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        require_moderator(tx.ex(), requester).await?;
        require_user(tx.ex(), user, "user not found").await?;
        if user == requester {
            return Err(DriverError::Forbidden("cannot ban self".to_owned()));
        }
        if db::get_user_roles(tx.ex(), user).await?.is_admin {
            return Err(DriverError::Forbidden("cannot ban an admin".to_owned()));
        }

        let expires_at = if duration_hours > 0 {
            let expires_at = duration_hours
                .checked_mul(60 * 60)
                .and_then(|secs| now.checked_add(Duration::seconds(secs)))
                .ok_or_else(|| DriverError::InvalidInput("ban duration is too long".to_owned()))?;
            Some(expires_at)
        } else {
            None
        };

        let id = db::create_ban(tx.ex(), user, requester, &reason, now, expires_at).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Lifts the ban `ban` on behalf of `requester`.
    pub(crate) async fn pardon_user(self, requester: UserId, ban: BanId) -> DriverResult<PardonId> {
        let mut tx = self.db.begin().await?;
        let now = self.clock.now_utc();

        require_moderator(tx.ex(), requester).await?;
        if !db::is_ban_active(tx.ex(), ban, now).await? {
            return Err(DriverError::NotFound("ban not found".to_owned()));
        }
        if db::pardon_exists(tx.ex(), ban).await? {
            return Err(DriverError::Forbidden("ban is already pardoned".to_owned()));
        }

        let id = db::create_pardon(tx.ex(), ban, requester, now).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Grants the role named by `kind` to `user` on behalf of the admin `requester`.
    pub(crate) async fn promote_user(
        self,
        requester: UserId,
        user: UserId,
        kind: String,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        if !requester_roles(tx.ex(), requester).await?.is_admin {
            return Err(DriverError::Forbidden(
                "user has no permission to promote users".to_owned(),
            ));
        }
        let kind = PromoteKind::from_str(&kind)?;

        let roles = match db::get_user_roles(tx.ex(), user).await {
            Ok(roles) => roles,
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound("user not found".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        if roles.has(kind) {
            let message = match kind {
                PromoteKind::Admin => "user is already an admin",
                PromoteKind::Moderator => "user is already a moderator",
            };
            return Err(DriverError::InvalidInput(message.to_owned()));
        }

        db::grant_role(tx.ex(), user, kind).await?;

        tx.commit().await?;
        Ok(())
    }
}
