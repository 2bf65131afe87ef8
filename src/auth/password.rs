use argon2::{
    password_hash::{self, PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Argon2id with library defaults over a fresh random salt, as a PHC string.
///
/// CPU-bound; call it off the async workers.
pub fn hash_password(plain: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on mismatch, `Err` only when `stored` is not a valid PHC string.
#[cfg(test)]
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, password_hash::Error> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
