//! Integration tests for the storefront cart and checkout flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p minimart-storefront)
//!
//! Run with: cargo test -p minimart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use minimart_core::Grade;
use minimart_core::ledger::MIN_TOP_UP;
use minimart_integration_tests::{
    client, product_stock, signup_and_login, storefront_base_url,
};

/// Seeded product used by the cart tests (Fuji Apple, plenty of stock).
const TEST_PRODUCT: i64 = 101;

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_health() {
    let client = client();
    let resp = client
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("health request failed");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_me_reports_guest_without_token() {
    let client = client();
    let me: Value = client
        .get(format!("{}/api/customer/me", storefront_base_url()))
        .send()
        .await
        .expect("me request failed")
        .json()
        .await
        .expect("me response not JSON");

    assert_eq!(me["loggedIn"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_requires_authentication() {
    let client = client();
    let resp = client
        .post(format!("{}/api/cart/add", storefront_base_url()))
        .json(&json!({"productId": TEST_PRODUCT, "quantity": 1}))
        .send()
        .await
        .expect("cart add request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_mutations_conserve_stock() {
    let client = client();
    let base_url = storefront_base_url();
    let (token, _) = signup_and_login(&client).await;

    let initial_stock = product_stock(&client, TEST_PRODUCT).await;

    // Reserve 3 units
    let resp: Value = client
        .post(format!("{base_url}/api/cart/add"))
        .header("Authorization", &token)
        .json(&json!({"productId": TEST_PRODUCT, "quantity": 3}))
        .send()
        .await
        .expect("cart add failed")
        .json()
        .await
        .expect("cart add response not JSON");
    assert_eq!(resp["success"], true, "add rejected: {resp}");
    assert_eq!(product_stock(&client, TEST_PRODUCT).await, initial_stock - 3);

    // Shrink the line to 1: two units flow back
    let resp: Value = client
        .put(format!("{base_url}/api/cart/update-with-stock"))
        .header("Authorization", &token)
        .json(&json!({"productId": TEST_PRODUCT, "newQuantity": 1}))
        .send()
        .await
        .expect("cart resize failed")
        .json()
        .await
        .expect("cart resize response not JSON");
    assert_eq!(resp["success"], true, "resize rejected: {resp}");
    assert_eq!(product_stock(&client, TEST_PRODUCT).await, initial_stock - 1);

    // Clearing restores everything
    let resp: Value = client
        .delete(format!("{base_url}/api/cart/clear-restore"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("cart clear failed")
        .json()
        .await
        .expect("cart clear response not JSON");
    assert_eq!(resp["success"], true, "clear rejected: {resp}");
    assert_eq!(product_stock(&client, TEST_PRODUCT).await, initial_stock);

    // Clearing an already-empty cart is still a success
    let resp: Value = client
        .delete(format!("{base_url}/api/cart/clear-restore"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("second cart clear failed")
        .json()
        .await
        .expect("second clear response not JSON");
    assert_eq!(resp["success"], true);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_add_beyond_stock_is_rejected_without_side_effects() {
    let client = client();
    let base_url = storefront_base_url();
    let (token, _) = signup_and_login(&client).await;

    let initial_stock = product_stock(&client, TEST_PRODUCT).await;

    let resp = client
        .post(format!("{base_url}/api/cart/add"))
        .header("Authorization", &token)
        .json(&json!({"productId": TEST_PRODUCT, "quantity": initial_stock + 1}))
        .send()
        .await
        .expect("cart add failed");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("response not JSON");
    assert_eq!(body["success"], false);
    assert_eq!(product_stock(&client, TEST_PRODUCT).await, initial_stock);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_charge_then_purchase_selected() {
    let client = client();
    let base_url = storefront_base_url();
    let (token, _) = signup_and_login(&client).await;

    // Charge enough for anything in the seed catalog; Bronze -> Bronze
    let charge: Value = client
        .post(format!("{base_url}/api/customer/charge"))
        .header("Authorization", &token)
        .json(&json!({"amount": 100_000}))
        .send()
        .await
        .expect("charge failed")
        .json()
        .await
        .expect("charge response not JSON");
    assert_eq!(charge["success"], true, "charge rejected: {charge}");
    assert_eq!(charge["newGrade"], Grade::Bronze.as_str());
    assert_eq!(charge["gradeChanged"], false);

    let initial_stock = product_stock(&client, TEST_PRODUCT).await;

    // Reserve 2, buy 1: the unbought unit must flow back to stock
    let resp: Value = client
        .post(format!("{base_url}/api/cart/add"))
        .header("Authorization", &token)
        .json(&json!({"productId": TEST_PRODUCT, "quantity": 2}))
        .send()
        .await
        .expect("cart add failed")
        .json()
        .await
        .expect("cart add response not JSON");
    assert_eq!(resp["success"], true);

    let purchase: Value = client
        .post(format!("{base_url}/api/purchase/selected"))
        .header("Authorization", &token)
        .json(&json!({"productId": TEST_PRODUCT, "purchaseQuantity": 1}))
        .send()
        .await
        .expect("purchase failed")
        .json()
        .await
        .expect("purchase response not JSON");
    assert_eq!(purchase["success"], true, "purchase rejected: {purchase}");

    // 2 reserved, 1 bought: net stock change is exactly the bought unit
    assert_eq!(product_stock(&client, TEST_PRODUCT).await, initial_stock - 1);

    // The cart line is consumed by the purchase
    let cart: Value = client
        .get(format!("{base_url}/api/cart"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("cart fetch failed")
        .json()
        .await
        .expect("cart response not JSON");
    assert_eq!(cart["success"], true);
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_charge_below_minimum_is_rejected() {
    let client = client();
    let base_url = storefront_base_url();
    let (token, _) = signup_and_login(&client).await;

    let resp = client
        .post(format!("{base_url}/api/customer/charge"))
        .header("Authorization", &token)
        .json(&json!({"amount": MIN_TOP_UP - 1}))
        .send()
        .await
        .expect("charge failed");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("response not JSON");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_all_on_empty_cart_fails() {
    let client = client();
    let base_url = storefront_base_url();
    let (token, _) = signup_and_login(&client).await;

    let resp = client
        .post(format!("{base_url}/api/purchase/all"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("purchase all failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("response not JSON");
    assert_eq!(body["success"], false);
}
