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

//! Roles that users can hold for moderation purposes.

use std::str::FromStr;
use truthful_core::model::ModelError;

/// Role that an administrator can grant to another user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PromoteKind {
    /// Full administrator.  Administrators cannot be banned.
    Admin,

    /// Moderator, able to ban and pardon regular users.
    Moderator,
}

impl FromStr for PromoteKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(PromoteKind::Admin),
            "moderator" => Ok(PromoteKind::Moderator),
            _ => Err(ModelError("invalid promote type".to_owned())),
        }
    }
}

/// Moderation flags of a user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct UserRoles {
    /// Whether the user is an administrator.
    pub(crate) is_admin: bool,

    /// Whether the user is a moderator.
    pub(crate) is_moderator: bool,
}

impl UserRoles {
    /// Returns true if the user is allowed to ban and pardon other users.
    pub(crate) fn can_moderate(&self) -> bool {
        self.is_admin || self.is_moderator
    }

    /// Returns true if the user already holds the role described by `kind`.
    pub(crate) fn has(&self, kind: PromoteKind) -> bool {
        match kind {
            PromoteKind::Admin => self.is_admin,
            PromoteKind::Moderator => self.is_moderator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_kind_from_str() {
        assert_eq!(PromoteKind::Admin, "admin".parse().unwrap());
        assert_eq!(PromoteKind::Moderator, "moderator".parse().unwrap());
        assert_eq!(
            ModelError("invalid promote type".to_owned()),
            "Admin".parse::<PromoteKind>().unwrap_err()
        );
    }

    #[test]
    fn test_user_roles() {
        let regular = UserRoles::default();
        assert!(!regular.can_moderate());
        assert!(!regular.has(PromoteKind::Admin));

        let moderator = UserRoles { is_admin: false, is_moderator: true };
        assert!(moderator.can_moderate());
        assert!(moderator.has(PromoteKind::Moderator));
        assert!(!moderator.has(PromoteKind::Admin));

        let admin = UserRoles { is_admin: true, is_moderator: false };
        assert!(admin.can_moderate());
        assert!(admin.has(PromoteKind::Admin));
    }
}
