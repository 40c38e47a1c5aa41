//! Argon2id password hashing, run off the async executor.

use anyhow::{Context as _, anyhow};
use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngExt;
use tokio::sync::OnceCell;

use crate::error::RegistryError;

/// Hash `password` with Argon2id (default parameters) and a random 16-byte salt.
/// Returns the PHC string.
pub async fn hash_password(password: String) -> Result<String, RegistryError> {
    let hash = tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let salt_bytes: [u8; 16] = rand::rng().random();
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("encode salt: {e}"))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("hash password: {e}"))
    })
    .await
    .context("join password hashing task")??;
    Ok(hash)
}

/// Check `password` against a stored PHC string. A mismatch is `Ok(false)`;
/// an unparsable stored hash is an internal error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, RegistryError> {
    let matches = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow!("parse stored hash: {e}"))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow!("verify password: {e}")),
        }
    })
    .await
    .context("join password verification task")??;
    Ok(matches)
}

static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Run a full verification against a fixed hash built with the same
/// parameters as real ones. The outcome is always a mismatch.
pub async fn verify_against_dummy(password: String) -> Result<(), RegistryError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password("personnel-registry-dummy".to_owned()))
        .await?
        .clone();
    verify_password(password, hash).await?;
    Ok(())
}
