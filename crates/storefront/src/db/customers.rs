//! Customer repository for database operations.

use sqlx::PgPool;

use minimart_core::{Customer, CustomerId};

use super::RepositoryError;

const CUSTOMER_COLUMNS: &str = "id, login_id, nickname, balance, total_charge, created_at";

/// Which unique constraint a conflicting insert or update ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerConflict {
    LoginId,
    Nickname,
}

impl CustomerConflict {
    fn from_constraint(constraint: &str) -> Self {
        if constraint.contains("nickname") {
            Self::Nickname
        } else {
            Self::LoginId
        }
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Whether a login id is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn login_id_exists(&self, login_id: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM customers WHERE login_id = $1)",
        )
        .bind(login_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a customer with an already-hashed credential.
    ///
    /// # Errors
    ///
    /// Returns `Ok(Err(conflict))` when the login id or nickname is taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        login_id: &str,
        password_hash: &str,
        nickname: &str,
    ) -> Result<Result<Customer, CustomerConflict>, RepositoryError> {
        let result = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (login_id, password_hash, nickname) \
             VALUES ($1, $2, $3) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(login_id)
        .bind(password_hash)
        .bind(nickname)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(customer) => Ok(Ok(customer)),
            Err(e) => match RepositoryError::from_sqlx(e) {
                RepositoryError::Conflict(constraint) => {
                    Ok(Err(CustomerConflict::from_constraint(&constraint)))
                }
                other => Err(other),
            },
        }
    }

    /// Get a customer together with their password hash, by login id.
    ///
    /// Returns `None` if no such login id exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        login_id: &str,
    ) -> Result<Option<(Customer, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerWithHash>(&format!(
            "SELECT {CUSTOMER_COLUMNS}, password_hash FROM customers WHERE login_id = $1"
        ))
        .bind(login_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CustomerWithHash::split))
    }

    /// Get a customer's password hash by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn password_hash(&self, id: CustomerId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Change a customer's nickname.
    ///
    /// # Errors
    ///
    /// Returns `Ok(Err(..))` when the nickname is taken,
    /// `RepositoryError::NotFound` if the customer doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_nickname(
        &self,
        id: CustomerId,
        nickname: &str,
    ) -> Result<Result<(), CustomerConflict>, RepositoryError> {
        let result = sqlx::query("UPDATE customers SET nickname = $1 WHERE id = $2")
            .bind(nickname)
            .bind(id)
            .execute(self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(RepositoryError::NotFound),
            Ok(_) => Ok(Ok(())),
            Err(e) => match RepositoryError::from_sqlx(e) {
                RepositoryError::Conflict(_) => Ok(Err(CustomerConflict::Nickname)),
                other => Err(other),
            },
        }
    }

    /// Replace a customer's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_password_hash(
        &self,
        id: CustomerId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE customers SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Row shape for queries that also carry the credential hash.
#[derive(sqlx::FromRow)]
struct CustomerWithHash {
    id: CustomerId,
    login_id: String,
    nickname: String,
    balance: minimart_core::Money,
    total_charge: minimart_core::Money,
    created_at: chrono::DateTime<chrono::Utc>,
    password_hash: String,
}

impl CustomerWithHash {
    fn split(self) -> (Customer, String) {
        (
            Customer {
                id: self.id,
                login_id: self.login_id,
                nickname: self.nickname,
                balance: self.balance,
                total_charge: self.total_charge,
                created_at: self.created_at,
            },
            self.password_hash,
        )
    }
}
