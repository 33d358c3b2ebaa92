//! Account and bearer-token persistence.
//!
//! # Invariants
//! - Usernames are unique case-insensitively.
//! - An account row, its credential and its first token are written in one
//!   transaction; a failed token insert leaves no account behind.
//! - Only token and password digests are stored.

use crate::model::user::{NewAccount, StoredCredential, User, UserId};
use crate::repo::{ensure_connection_ready, map_unique_violation, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT
    users.id,
    users.username,
    users.created_at
FROM users";

/// Repository interface for accounts and their tokens.
pub trait UserRepository {
    /// Creates one account with its first token. Fails with `Conflict` on a
    /// taken username.
    fn create_account(&self, account: &NewAccount<'_>) -> RepoResult<User>;
    /// Loads the stored password digest for `username`, case-insensitively.
    fn find_credential(&self, username: &str) -> RepoResult<Option<StoredCredential>>;
    /// Stores a token digest for `user_id`.
    fn insert_token(&self, user_id: UserId, token_hash: &str) -> RepoResult<()>;
    /// Resolves a token digest to its account.
    fn find_user_by_token(&self, token_hash: &str) -> RepoResult<Option<User>>;
    /// Deletes a token digest. Returns whether a row was removed.
    fn revoke_token(&self, token_hash: &str) -> RepoResult<bool>;
}

/// SQLite-backed account repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "users")?;
        ensure_connection_ready(conn, "user_tokens")?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_account(&self, account: &NewAccount<'_>) -> RepoResult<User> {
        let tx = self.conn.unchecked_transaction()?;
        let user = tx
            .query_row(
                "INSERT INTO users (username, password_salt, password_hash)
                 VALUES (?1, ?2, ?3)
                 RETURNING id, username, created_at;",
                params![
                    account.username,
                    account.password_salt,
                    account.password_hash
                ],
                parse_user_row,
            )
            .map_err(|err| {
                map_unique_violation(err, format!("username `{}` is taken", account.username))
            })?;
        tx.execute(
            "INSERT INTO user_tokens (token_hash, user_id) VALUES (?1, ?2);",
            params![account.token_hash, user.id],
        )
        .map_err(|err| map_unique_violation(err, "token already issued"))?;
        tx.commit()?;
        Ok(user)
    }

    fn find_credential(&self, username: &str) -> RepoResult<Option<StoredCredential>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                users.id,
                users.username,
                users.created_at,
                users.password_salt,
                users.password_hash
             FROM users
             WHERE users.username = ?1;",
        )?;
        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(StoredCredential {
                user: parse_user_row(row)?,
                password_salt: row.get(3)?,
                password_hash: row.get(4)?,
            }));
        }
        Ok(None)
    }

    fn insert_token(&self, user_id: UserId, token_hash: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO user_tokens (token_hash, user_id) VALUES (?1, ?2);",
                params![token_hash, user_id],
            )
            .map_err(|err| map_unique_violation(err, "token already issued"))?;
        Ok(())
    }

    fn find_user_by_token(&self, token_hash: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "{USER_SELECT_SQL}
             INNER JOIN user_tokens ON user_tokens.user_id = users.id
             WHERE user_tokens.token_hash = ?1;"
        ))?;
        let mut rows = stmt.query([token_hash])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn revoke_token(&self, token_hash: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM user_tokens WHERE token_hash = ?1;",
            [token_hash],
        )?;
        Ok(changed > 0)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
    })
}
