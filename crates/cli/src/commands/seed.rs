//! Seed the database with demo data.
//!
//! Inserts a small catalog and one demo customer so a fresh checkout of the
//! repo has something to click through. Re-running is harmless: every insert
//! skips rows that already exist.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use minimart_core::Money;

/// (id, name)
const CATEGORIES: &[(i32, &str)] = &[
    (1, "Fruit"),
    (2, "Vegetables"),
    (3, "Grains"),
    (4, "Snacks"),
];

/// (id, category id, name, price, stock, origin) - ids follow the
/// category * 100 + sequence scheme the admin binary allocates with.
const PRODUCTS: &[(i32, i32, &str, i64, i32, &str)] = &[
    (101, 1, "Fuji Apple", 3_500, 120, "Cheongsong"),
    (102, 1, "Shine Muscat", 12_000, 40, "Gimcheon"),
    (103, 1, "Mandarin Box", 15_000, 35, "Jeju"),
    (201, 2, "Napa Cabbage", 4_800, 80, "Haenam"),
    (202, 2, "Green Onion Bundle", 2_200, 150, "unspecified"),
    (301, 3, "Rice 10kg", 32_000, 25, "Icheon"),
    (401, 4, "Honey Butter Chips", 1_800, 200, "unspecified"),
    (402, 4, "Choco Pie Box", 4_500, 90, "unspecified"),
];

const DEMO_LOGIN_ID: &str = "demo";
const DEMO_PASSWORD: &str = "demo1234";
const DEMO_NICKNAME: &str = "Demo Shopper";

/// Resolve the database URL from the environment.
fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    for key in ["DATABASE_URL", "STOREFRONT_DATABASE_URL", "ADMIN_DATABASE_URL"] {
        if let Ok(value) = std::env::var(key) {
            return Ok(SecretString::from(value));
        }
    }
    Err("DATABASE_URL not set".into())
}

/// Insert demo categories, products, and the demo customer.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let mut inserted = 0_u64;

    for (id, name) in CATEGORIES {
        inserted += sqlx::query(
            "INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(name)
        .execute(&pool)
        .await?
        .rows_affected();
    }

    for (id, category_id, name, price, stock, origin) in PRODUCTS {
        inserted += sqlx::query(
            "INSERT INTO products (id, category_id, name, price, stock_quantity, origin) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(Money::from(*price))
        .bind(stock)
        .bind(origin)
        .execute(&pool)
        .await?
        .rows_affected();
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|e| format!("failed to hash demo password: {e}"))?
        .to_string();

    inserted += sqlx::query(
        "INSERT INTO customers (login_id, password_hash, nickname) \
         VALUES ($1, $2, $3) ON CONFLICT (login_id) DO NOTHING",
    )
    .bind(DEMO_LOGIN_ID)
    .bind(&password_hash)
    .bind(DEMO_NICKNAME)
    .execute(&pool)
    .await?
    .rows_affected();

    tracing::info!(inserted, "Seeding complete");
    tracing::info!("Demo login: {DEMO_LOGIN_ID} / {DEMO_PASSWORD}");
    Ok(())
}
