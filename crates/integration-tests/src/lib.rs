//! Integration tests for Minimart.
//!
//! # Running Tests
//!
//! ```bash
//! # Create the database and run migrations + seed
//! cargo run -p minimart-cli -- migrate
//! cargo run -p minimart-cli -- seed
//!
//! # Start both servers
//! cargo run -p minimart-storefront &
//! cargo run -p minimart-admin &
//!
//! # Run integration tests (they are ignored by default)
//! cargo test -p minimart-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` - default `http://localhost:8080`
//! - `ADMIN_BASE_URL` - default `http://localhost:8081`
//! - `ADMIN_USERNAME` / `ADMIN_TEST_PASSWORD` - credentials the admin
//!   server was started with (for the admin tests)

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string())
}

/// Plain HTTP client; sessions travel in the `Authorization` header, so no
/// cookie store is needed.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// Sign up a throwaway customer and log them in, returning the session token.
///
/// # Panics
///
/// Panics when the storefront is unreachable or rejects the flow; these
/// helpers run inside `#[ignore]`d tests that require live servers.
pub async fn signup_and_login(client: &Client) -> (String, Value) {
    let base_url = storefront_base_url();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let login_id = format!("it-{}", &suffix[..12]);

    let resp = client
        .post(format!("{base_url}/api/customer/signup"))
        .json(&json!({
            "loginId": login_id,
            "password": "it-password",
            "nickname": format!("it-nick-{}", &suffix[..12]),
        }))
        .send()
        .await
        .expect("signup request failed");
    assert!(resp.status().is_success(), "signup rejected");

    let login: Value = client
        .post(format!("{base_url}/api/customer/login"))
        .json(&json!({"loginId": login_id, "password": "it-password"}))
        .send()
        .await
        .expect("login request failed")
        .json()
        .await
        .expect("login response not JSON");

    assert_eq!(login["success"], true, "login failed: {login}");
    let token = login["sessionId"]
        .as_str()
        .expect("login response missing sessionId")
        .to_owned();

    (token, login)
}

/// Log in as the admin principal, returning the session token.
///
/// # Panics
///
/// Panics when the admin server is unreachable or the credentials from the
/// environment are wrong.
pub async fn admin_login(client: &Client) -> String {
    let base_url = admin_base_url();
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");

    let login: Value = client
        .post(format!("{base_url}/api/admin/login"))
        .json(&json!({"username": username, "password": password}))
        .send()
        .await
        .expect("admin login request failed")
        .json()
        .await
        .expect("admin login response not JSON");

    assert_eq!(login["success"], true, "admin login failed: {login}");
    login["sessionId"]
        .as_str()
        .expect("admin login response missing sessionId")
        .to_owned()
}

/// Fetch the current stock of a product via the public listing.
///
/// # Panics
///
/// Panics when the listing is unreachable or the product is absent.
pub async fn product_stock(client: &Client, product_id: i64) -> i64 {
    let base_url = storefront_base_url();
    let products: Value = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("product list request failed")
        .json()
        .await
        .expect("product list not JSON");

    products
        .as_array()
        .expect("product list not an array")
        .iter()
        .find(|p| p["productId"] == product_id)
        .unwrap_or_else(|| panic!("product {product_id} not in listing"))["stock"]
        .as_i64()
        .expect("stock not a number")
}
