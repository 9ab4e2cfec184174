//! Credential records and login sessions.

use argon2::{PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::SqlitePool;

use crate::models::CredentialRecord;
use crate::network::Account;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub async fn find_credentials(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query_as::<_, CredentialRecord>(r#"SELECT * FROM "users" WHERE username = ?"#)
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
}

/// Creates a user with a fresh signing key pair.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<CredentialRecord, AccountError> {
    if find_credentials(pool, username).await?.is_some() {
        return Err(AccountError::UsernameTaken);
    }

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::Hash(e.to_string()))?
        .to_string();

    let account = Account::generate();
    let record = CredentialRecord {
        username: username.to_string(),
        password_hash,
        private_key: account.private_key_hex(),
        public_key: account.public_key_hex(),
        address: account.address(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let result = sqlx::query(
        r#"INSERT INTO "users" (username, password_hash, private_key, public_key, address, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&record.username)
    .bind(&record.password_hash)
    .bind(&record.private_key)
    .bind(&record.public_key)
    .bind(&record.address)
    .bind(&record.created_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(record),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(AccountError::UsernameTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the record when `password` matches.
pub async fn verify_login(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<CredentialRecord>, sqlx::Error> {
    let Some(record) = find_credentials(pool, username).await? else {
        return Ok(None);
    };
    let valid = PasswordHash::new(&record.password_hash)
        .map(|hash| {
            argon2::Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
        .unwrap_or(false);
    Ok(valid.then_some(record))
}

pub async fn create_session(
    pool: &SqlitePool,
    username: &str,
    ttl_days: i64,
) -> Result<String, sqlx::Error> {
    let token = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    let expires_at = (now + chrono::Duration::days(ttl_days)).to_rfc3339();

    sqlx::query(
        r#"INSERT INTO "sessions" (token, username, expires_at, created_at) VALUES (?, ?, ?, ?)"#,
    )
    .bind(&token)
    .bind(username)
    .bind(&expires_at)
    .bind(now.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(token)
}

/// Username for a live session; expired sessions are deleted.
pub async fn session_user(pool: &SqlitePool, token: &str) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String, String)>(
        r#"SELECT username, expires_at FROM "sessions" WHERE token = ?"#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some((username, expires_at)) = row else {
        return Ok(None);
    };

    let expired = chrono::DateTime::parse_from_rfc3339(&expires_at)
        .map(|t| t < chrono::Utc::now())
        .unwrap_or(true);
    if expired {
        delete_session(pool, token).await?;
        return Ok(None);
    }
    Ok(Some(username))
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM "sessions" WHERE token = ?"#)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
