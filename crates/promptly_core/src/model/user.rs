//! Account identity model.

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Registered account. Owns projects and suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Everything written when an account is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password_salt: &'a str,
    pub password_hash: &'a str,
    /// Digest of the first bearer token.
    pub token_hash: &'a str,
}

/// Account row together with its stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub user: User,
    pub password_salt: String,
    /// Empty for accounts that predate password login.
    pub password_hash: String,
}
