//! Helper functions could be used in api/, front/, ...

use crate::config;
use anyhow::anyhow;
use argon2::Argon2;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;
use uuid::Uuid;

pub async fn setup_sqlite_db_pool(encrypted: bool) -> anyhow::Result<SqlitePool> {
    if encrypted {
        return Ok(SqlitePool::connect_with(
            SqliteConnectOptions::from_str(&config::APP_CONFIG.db_host)?
                .pragma("key", &config::APP_CONFIG.db_pass_encrypt)
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .pragma("foreign_keys", "ON")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(
        SqliteConnectOptions::from_str(&config::APP_CONFIG.db_host)?.pragma("foreign_keys", "ON"),
    )
    .await?)
}

/// Applies the schema on startup; every statement is IF NOT EXISTS so
/// reruns are harmless.
pub async fn run_migrations(db_pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(include_str!("../migrations/0001_create_tables.sql"))
        .execute(db_pool)
        .await?;
    Ok(())
}

pub fn build_cookie_key(pwd: &str, salt: &str) -> anyhow::Result<[u8; 32]> {
    let mut cookie_key = [0u8; 32];
    Argon2::default()
        .hash_password_into(
            Uuid::from_str(pwd)?.as_bytes(),
            Uuid::from_str(salt)?.as_bytes(),
            &mut cookie_key,
        )
        .map_err(|err| anyhow!("cookie_key couldn't be created: {}", err))?;

    Ok(cookie_key)
}

pub fn build_random_cookie_key() -> anyhow::Result<[u8; 32]> {
    build_cookie_key(&Uuid::new_v4().to_string(), &Uuid::new_v4().to_string())
}
