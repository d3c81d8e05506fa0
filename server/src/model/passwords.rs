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

//! The `Password` and `HashedPassword` data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use truthful_core::model::{ModelError, ModelResult};

/// Minimum length of a password.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum length of a password in bytes.  bcrypt ignores anything past this.
const MAX_PASSWORD_LENGTH: usize = 72;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Clone))]
pub(crate) struct Password(String);

impl Password {
    /// Creates a new password from a literal string.  The password is not validated until it is
    /// hashed so that callers can decide when to report weak passwords.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        Password(s.into())
    }

    /// Checks that the password is complex enough to be accepted for a new account.
    pub(crate) fn validate(&self) -> ModelResult<()> {
        if self.0.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ModelError(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if self.0.len() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("password is too long".to_owned()));
        }

        let has_number = self.0.chars().any(|c| c.is_ascii_digit());
        let has_lowercase = self.0.chars().any(|c| c.is_ascii_lowercase());
        let has_uppercase = self.0.chars().any(|c| c.is_ascii_uppercase());
        if !has_number || !has_lowercase || !has_uppercase {
            return Err(ModelError(
                "password must contain at least one number, one lowercase letter, and one \
                uppercase letter"
                    .to_owned(),
            ));
        }

        Ok(())
    }

    /// Hashes the password with bcrypt using `cost`.  Consumes the password because there is no
    /// context in which keeping the password alive once we have generated its hash is correct.
    pub(crate) fn hash(self, cost: u32) -> ModelResult<HashedPassword> {
        let hashed =
            bcrypt::hash(self.0, cost).map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    pub(crate) fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.as_str())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

#[cfg(test)]
impl From<&'static str> for Password {
    fn from(s: &'static str) -> Self {
        Password::new(s)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(Clone, PartialEq)]
pub(crate) struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}
