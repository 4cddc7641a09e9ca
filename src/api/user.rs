use argon2::{Argon2, PasswordHash, PasswordVerifier};
use derive_more::{Display, Error};

use crate::{models, repo};

#[derive(Debug, Display, Error)]
pub enum AuthError {
    #[display("invalid email or password")]
    InvalidCredentials,
    #[display("auth backend failure: {_0}")]
    Internal(#[error(not(source))] String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Verifies credentials against the stored argon2 hash. Disabled
/// accounts fail the same way as unknown emails or bad passwords so the
/// response never reveals which check rejected the caller.
pub async fn authenticate_user(
    email: &str,
    password: &str,
    repo: &repo::ImplAppRepo,
) -> Result<models::user_app::User, AuthError> {
    let user = repo
        .get_user_by_email(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !user.is_enabled {
        return Err(AuthError::InvalidCredentials);
    }

    let parsed_hash =
        PasswordHash::new(&user.password_hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)?;

    Ok(user)
}
