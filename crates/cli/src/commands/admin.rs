//! Admin credential helpers.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

/// Hash a password and print the PHC string for `ADMIN_PASSWORD_HASH`.
///
/// # Errors
///
/// Returns an error if hashing fails.
#[allow(clippy::print_stdout)] // the hash is the command's output, not a log line
pub fn hash_password(password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("failed to hash password: {e}"))?;

    println!("{hash}");
    Ok(())
}
