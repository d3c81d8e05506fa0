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

//! Issuance and verification of the bearer tokens that identify users.

use crate::model::{AccessToken, UserId};
use derivative::Derivative;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use truthful_core::driver::{DriverError, DriverResult};
use truthful_core::env::{get_optional_var, get_required_var};

/// Default value for the `TOKEN_VALIDITY` setting when not specified.
const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Configuration options for the token service.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct TokenOptions {
    /// Key used to sign and verify tokens.
    #[derivative(Debug = "ignore")]
    pub secret: String,

    /// How long tokens remain valid after being issued.
    pub validity: Duration,
}

impl TokenOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_JWT_SECRET` and `<prefix>_TOKEN_VALIDITY`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            secret: get_required_var::<String>(prefix, "JWT_SECRET")?,
            validity: get_optional_var::<Duration>(prefix, "TOKEN_VALIDITY")?
                .unwrap_or(DEFAULT_TOKEN_VALIDITY),
        })
    }
}

/// Contents of a token.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
struct Claims {
    /// The user the token was issued to.
    user_id: i64,

    /// Issuance time in seconds since the epoch.
    iat: i64,

    /// Expiration time in seconds since the epoch.
    exp: i64,
}

/// Signs and verifies HS256 tokens.
#[derive(Derivative)]
#[derivative(Debug)]
pub(crate) struct TokenService {
    /// Key to sign new tokens.
    #[derivative(Debug = "ignore")]
    encoding_key: EncodingKey,

    /// Key to verify the signature of received tokens.
    #[derivative(Debug = "ignore")]
    decoding_key: DecodingKey,

    /// How long tokens remain valid after being issued.
    validity: Duration,
}

impl TokenService {
    /// Creates a new token service based on `opts`.
    pub(crate) fn new(opts: TokenOptions) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(opts.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(opts.secret.as_bytes()),
            validity: opts.validity,
        }
    }

    /// Issues a new token for `user_id` that starts being valid at `now`.
    pub(crate) fn issue(&self, user_id: UserId, now: OffsetDateTime) -> DriverResult<AccessToken> {
        let iat = now.unix_timestamp();
        let exp = i64::try_from(self.validity.as_secs())
            .ok()
            .and_then(|validity| iat.checked_add(validity))
            .ok_or_else(|| {
                DriverError::BackendError(format!(
                    "Token validity {:?} is out of range",
                    self.validity
                ))
            })?;
        let claims = Claims { user_id: user_id.as_i64(), iat, exp };
        let header = Header::new(Algorithm::HS256);
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| DriverError::BackendError(format!("Failed to sign token: {}", e)))?;
        Ok(AccessToken::new(token)?)
    }

    /// Checks the signature and expiration of `token` as of `now` and returns the user it
    /// belongs to.
    pub(crate) fn verify(&self, token: &AccessToken, now: OffsetDateTime) -> DriverResult<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = jsonwebtoken::decode::<Claims>(token.as_str(), &self.decoding_key, &validation)
            .map_err(|_| DriverError::Unauthorized("invalid token".to_owned()))?;
        if data.claims.exp <= now.unix_timestamp() {
            return Err(DriverError::Unauthorized("token expired".to_owned()));
        }
        Ok(UserId::new(data.claims.user_id))
    }

    /// Verifies `token` and issues a new one for the same user.
    pub(crate) fn refresh(
        &self,
        token: &AccessToken,
        now: OffsetDateTime,
    ) -> DriverResult<(UserId, AccessToken)> {
        let user_id = self.verify(token, now)?;
        let token = self.issue(user_id, now)?;
        Ok((user_id, token))
    }
}


#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;

    /// Returns a timestamp `secs` seconds after the epoch.
    fn ts(secs: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(secs).unwrap()
    }

    #[test]
    fn test_token_options_from_env_all_present() {
        let overrides = [
            ("TOKENS_JWT_SECRET", Some("the secret")),
            ("TOKENS_TOKEN_VALIDITY", Some("2h")),
        ];
        temp_env::with_vars(overrides, || {
            let opts = TokenOptions::from_env("TOKENS").unwrap();
            assert_eq!(
                TokenOptions {
                    secret: "the secret".to_owned(),
                    validity: Duration::from_secs(2 * 60 * 60),
                },
                opts
            );
        });
    }

    #[test]
    fn test_token_options_from_env_defaults() {
        let overrides =
            [("TOKENS_JWT_SECRET", Some("the secret")), ("TOKENS_TOKEN_VALIDITY", None)];
        temp_env::with_vars(overrides, || {
            let opts = TokenOptions::from_env("TOKENS").unwrap();
            assert_eq!(DEFAULT_TOKEN_VALIDITY, opts.validity);
        });
    }

    #[test]
    fn test_token_options_from_env_missing_secret() {
        temp_env::with_var("MISSING_JWT_SECRET", None::<&str>, || {
            let err = TokenOptions::from_env("MISSING").unwrap_err();
            assert!(err.contains("MISSING_JWT_SECRET not present"));
        });
    }

    #[test]
    fn test_token_options_debug_hides_secret() {
        let opts = TokenOptions { secret: "the secret".to_owned(), validity: Duration::ZERO };
        assert!(!format!("{:?}", opts).contains("the secret"));
    }

    #[test]
    fn test_issue_and_verify() {
        let service = test_token_service();
        let token = service.issue(UserId::new(42), ts(1000)).unwrap();
        assert_eq!(UserId::new(42), service.verify(&token, ts(1000)).unwrap());
        let last = ts(1000 + 7 * 24 * 60 * 60 - 1);
        assert_eq!(UserId::new(42), service.verify(&token, last).unwrap());
    }

    #[test]
    fn test_issue_validity_out_of_range() {
        for validity in [Duration::from_secs(u64::MAX), Duration::from_secs(i64::MAX as u64)] {
            let service =
                TokenService::new(TokenOptions { secret: "the secret".to_owned(), validity });
            match service.issue(UserId::new(42), ts(1000)) {
                Err(DriverError::BackendError(msg)) => assert!(msg.contains("out of range")),
                e => panic!("{:?}", e),
            }
        }
    }

    #[test]
    fn test_verify_expired() {
        let service = test_token_service();
        let token = service.issue(UserId::new(42), ts(1000)).unwrap();
        assert_eq!(
            DriverError::Unauthorized("token expired".to_owned()),
            service.verify(&token, ts(1000 + 7 * 24 * 60 * 60)).unwrap_err()
        );
    }

    #[test]
    fn test_verify_bad_signature() {
        let token = test_token_service().issue(UserId::new(42), ts(1000)).unwrap();
        let other = TokenService::new(TokenOptions {
            secret: "other secret".to_owned(),
            validity: DEFAULT_TOKEN_VALIDITY,
        });
        assert_eq!(
            DriverError::Unauthorized("invalid token".to_owned()),
            other.verify(&token, ts(1000)).unwrap_err()
        );
    }

    #[test]
    fn test_verify_garbage() {
        let service = test_token_service();
        assert_eq!(
            DriverError::Unauthorized("invalid token".to_owned()),
            service.verify(&AccessToken::new("a.b.c").unwrap(), ts(1000)).unwrap_err()
        );
    }

    #[test]
    fn test_refresh() {
        let service = test_token_service();
        let token = service.issue(UserId::new(7), ts(1000)).unwrap();

        let (user_id, new_token) = service.refresh(&token, ts(5000)).unwrap();
        assert_eq!(UserId::new(7), user_id);
        let last = ts(5000 + 7 * 24 * 60 * 60 - 1);
        assert_eq!(UserId::new(7), service.verify(&new_token, last).unwrap());

        assert_eq!(
            DriverError::Unauthorized("token expired".to_owned()),
            service.refresh(&token, ts(1000 + 7 * 24 * 60 * 60)).unwrap_err()
        );
    }
}
