use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::ServerConfig;

/// Hash of a throwaway random secret, verified against when the username is
/// unknown so both paths pay for one argon2 run.
pub fn dummy_hash() -> anyhow::Result<String> {
    let secret = uuid::Uuid::new_v4().to_string();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Checks `password` for `username`.
///
/// Unknown users are verified against `dummy_hash` and always rejected.
pub fn verify_login(
    config: &ServerConfig,
    dummy_hash: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<bool> {
    let (hash, known) = match config.find_user(username) {
        Some(user) => (user.password_hash.as_str(), true),
        None => (dummy_hash, false),
    };
    let matches = verify_password(hash, password)?;
    Ok(known && matches)
}

fn verify_password(hash: &str, password: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
