//! Authentication service.
//!
//! Password login with salted argon2 hashes and opaque database-backed
//! session tokens.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use minimart_core::{Customer, CustomerId};

use crate::db::customers::CustomerConflict;
use crate::db::{CustomerRepository, SessionRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 4;

/// Minimum nickname length.
const MIN_NICKNAME_LENGTH: usize = 2;

/// Authentication service.
///
/// Handles customer signup, login, logout, and credential changes.
pub struct AuthService<'a> {
    customers: CustomerRepository<'a>,
    sessions: SessionRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
            sessions: SessionRepository::new(pool),
        }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for a blank login id or short
    /// nickname, `AuthError::WeakPassword` for a short password, and
    /// `AuthError::DuplicateLoginId` / `AuthError::DuplicateNickname` on
    /// collisions.
    pub async fn signup(
        &self,
        login_id: &str,
        password: &str,
        nickname: &str,
    ) -> Result<Customer, AuthError> {
        let login_id = login_id.trim();
        let nickname = nickname.trim();

        if login_id.is_empty() {
            return Err(AuthError::InvalidInput("login ID is required".to_owned()));
        }
        if nickname.chars().count() < MIN_NICKNAME_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "nickname must be at least {MIN_NICKNAME_LENGTH} characters"
            )));
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        match self.customers.create(login_id, &password_hash, nickname).await? {
            Ok(customer) => Ok(customer),
            Err(CustomerConflict::LoginId) => Err(AuthError::DuplicateLoginId),
            Err(CustomerConflict::Nickname) => Err(AuthError::DuplicateNickname),
        }
    }

    /// Whether a login id is still available for signup.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login_id_available(&self, login_id: &str) -> Result<bool, AuthError> {
        Ok(!self.customers.login_id_exists(login_id.trim()).await?)
    }

    /// Login with login id and password, minting a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either part is wrong; the
    /// error does not say which.
    pub async fn login(
        &self,
        login_id: &str,
        password: &str,
    ) -> Result<(Customer, String), AuthError> {
        let (customer, password_hash) = self
            .customers
            .get_with_password_hash(login_id.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.sessions.create(customer.id).await?;
        Ok((customer, token))
    }

    /// Delete a session. Unknown tokens succeed silently - logout is
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the delete fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.delete(token).await?;
        Ok(())
    }

    /// Change a customer's nickname (uniqueness-checked).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidInput` for a short nickname and
    /// `AuthError::DuplicateNickname` on collision.
    pub async fn change_nickname(
        &self,
        customer_id: CustomerId,
        new_nickname: &str,
    ) -> Result<(), AuthError> {
        let new_nickname = new_nickname.trim();
        if new_nickname.chars().count() < MIN_NICKNAME_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "nickname must be at least {MIN_NICKNAME_LENGTH} characters"
            )));
        }

        match self.customers.update_nickname(customer_id, new_nickname).await? {
            Ok(()) => Ok(()),
            Err(_) => Err(AuthError::DuplicateNickname),
        }
    }

    /// Change a customer's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the current password is
    /// wrong and `AuthError::WeakPassword` when the new one is too short.
    pub async fn change_password(
        &self,
        customer_id: CustomerId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored_hash = self
            .customers
            .password_hash(customer_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &stored_hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.customers
            .update_password_hash(customer_id, &new_hash)
            .await?;

        Ok(())
    }
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("open sesame").expect("hash");
        assert!(verify_password("open sesame", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same input").expect("hash");
        let b = hash_password("same input").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("abc"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("abcd").is_ok());
    }
}
