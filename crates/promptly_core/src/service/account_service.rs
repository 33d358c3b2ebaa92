//! Account registration, password login and bearer-token authentication.
//!
//! # Invariants
//! - A raw token is returned exactly once, at issue time.
//! - Storage only ever sees the SHA-256 hex digest of a token.
//! - Passwords are stored as a per-account salt plus an iterated salted
//!   SHA-256 digest.
//! - Registration either creates the account with its first token or writes
//!   nothing.

use crate::model::user::{NewAccount, User};
use crate::model::validation::{validate_password, validate_username, ValidationErrors};
use crate::repo::user_repo::UserRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const PASSWORD_HASH_ROUNDS: u32 = 10_000;
const REQUIRED_MESSAGE: &str = "This field is required.";
const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Freshly issued credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub user: User,
    /// Raw bearer token. Not recoverable after this value is dropped.
    pub token: String,
}

/// Account service facade over a user repository.
pub struct AccountService<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Creates an account and issues its first token.
    pub fn register(&self, raw_username: &str, raw_password: &str) -> ServiceResult<IssuedToken> {
        let username = validate_username(raw_username);
        let password = validate_password(raw_password);
        let (username, password) = match (username, password) {
            (Ok(username), Ok(password)) => (username, password),
            (username, password) => {
                let mut errors = ValidationErrors::default();
                for failed in [username.err(), password.err()].into_iter().flatten() {
                    errors.merge(failed);
                }
                return Err(errors.into());
            }
        };

        let salt = Uuid::new_v4().simple().to_string();
        let token = new_token();
        let user = self.users.create_account(&NewAccount {
            username: &username,
            password_salt: &salt,
            password_hash: &hash_password(&password, &salt),
            token_hash: &hash_token(&token),
        })?;
        info!(
            "event=account_register module=service status=ok user_id={}",
            user.id
        );
        Ok(IssuedToken { user, token })
    }

    /// Verifies a username/password pair and issues a new token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub fn login(&self, raw_username: &str, raw_password: &str) -> ServiceResult<IssuedToken> {
        let username = raw_username.trim();
        let mut missing = ValidationErrors::default();
        if username.is_empty() {
            missing.push("username", REQUIRED_MESSAGE);
        }
        if raw_password.is_empty() {
            missing.push("password", REQUIRED_MESSAGE);
        }
        if !missing.is_empty() {
            return Err(missing.into());
        }

        let verified = self
            .users
            .find_credential(username)?
            .filter(|stored| {
                !stored.password_hash.is_empty()
                    && hash_password(raw_password, &stored.password_salt) == stored.password_hash
            });
        let Some(stored) = verified else {
            warn!("event=account_login module=service status=rejected");
            return Err(ValidationErrors::single("__all__", INVALID_LOGIN_MESSAGE).into());
        };

        let token = self.issue_token(&stored.user)?;
        info!(
            "event=account_login module=service status=ok user_id={}",
            stored.user.id
        );
        Ok(IssuedToken {
            user: stored.user,
            token,
        })
    }

    /// Issues an additional token for an existing account.
    pub fn issue_token(&self, user: &User) -> ServiceResult<String> {
        let token = new_token();
        self.users.insert_token(user.id, &hash_token(&token))?;
        Ok(token)
    }

    /// Resolves a raw bearer token to its account.
    pub fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServiceError::Unauthenticated);
        }
        self.users
            .find_user_by_token(&hash_token(token))?
            .ok_or(ServiceError::Unauthenticated)
    }

    /// Revokes a raw bearer token. Unknown tokens are `Unauthenticated`.
    pub fn revoke(&self, token: &str) -> ServiceResult<()> {
        if !self.users.revoke_token(&hash_token(token.trim()))? {
            return Err(ServiceError::Unauthenticated);
        }
        Ok(())
    }
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the lowercase hex SHA-256 digest of `token`.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns the lowercase hex digest of `password` stretched with `salt`.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..PASSWORD_HASH_ROUNDS {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(salt.as_bytes())
            .finalize();
    }
    format!("{digest:x}")
}
