//! Integration tests for the admin catalog API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running (cargo run -p minimart-admin)
//! - `ADMIN_TEST_PASSWORD` set to the password behind `ADMIN_PASSWORD_HASH`
//!
//! Run with: cargo test -p minimart-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use minimart_integration_tests::{admin_base_url, admin_login, client};

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_categories_require_authentication() {
    let client = client();
    let resp = client
        .get(format!("{}/api/admin/categories", admin_base_url()))
        .send()
        .await
        .expect("categories request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_TEST_PASSWORD"]
async fn test_login_rejects_wrong_password() {
    let client = client();
    let resp = client
        .post(format!("{}/api/admin/login", admin_base_url()))
        .json(&json!({"username": "admin", "password": "definitely-wrong"}))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_TEST_PASSWORD"]
async fn test_product_lifecycle_with_derived_ids() {
    let client = client();
    let base_url = admin_base_url();
    let token = admin_login(&client).await;
    let suffix = uuid::Uuid::new_v4().simple().to_string();

    // Create a category
    let category: Value = client
        .post(format!("{base_url}/api/admin/categories"))
        .header("Authorization", &token)
        .json(&json!({"categoryName": format!("it-cat-{}", &suffix[..12])}))
        .send()
        .await
        .expect("category create failed")
        .json()
        .await
        .expect("category create response not JSON");
    assert_eq!(category["success"], true, "category rejected: {category}");
    let category_id = category["categoryId"].as_i64().expect("categoryId missing");

    // First product gets category * 100 + 1
    let product: Value = client
        .post(format!("{base_url}/api/admin/products"))
        .header("Authorization", &token)
        .json(&json!({
            "categoryId": category_id,
            "productName": format!("it-prod-{}", &suffix[..12]),
            "price": 2500,
            "stockQuantity": 10,
            "origin": "it-origin",
        }))
        .send()
        .await
        .expect("product create failed")
        .json()
        .await
        .expect("product create response not JSON");
    assert_eq!(product["success"], true, "product rejected: {product}");
    let product_id = product["productId"].as_i64().expect("productId missing");
    assert_eq!(product_id, category_id * 100 + 1);

    // Duplicate name is refused
    let dup = client
        .post(format!("{base_url}/api/admin/products"))
        .header("Authorization", &token)
        .json(&json!({
            "categoryId": category_id,
            "productName": format!("it-prod-{}", &suffix[..12]),
            "price": 100,
            "stockQuantity": 1,
        }))
        .send()
        .await
        .expect("duplicate product request failed");
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    // Category with products cannot be deleted
    let blocked = client
        .delete(format!("{base_url}/api/admin/categories/{category_id}"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("category delete request failed");
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    // Update, then delete the product
    let updated: Value = client
        .put(format!("{base_url}/api/admin/products/{product_id}"))
        .header("Authorization", &token)
        .json(&json!({
            "productName": format!("it-prod-{}-renamed", &suffix[..12]),
            "price": 2600,
            "stockQuantity": 12,
        }))
        .send()
        .await
        .expect("product update failed")
        .json()
        .await
        .expect("product update response not JSON");
    assert_eq!(updated["success"], true, "update rejected: {updated}");

    let deleted: Value = client
        .delete(format!("{base_url}/api/admin/products/{product_id}"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("product delete failed")
        .json()
        .await
        .expect("product delete response not JSON");
    assert_eq!(deleted["success"], true, "delete rejected: {deleted}");

    // Now the category can go too
    let gone: Value = client
        .delete(format!("{base_url}/api/admin/categories/{category_id}"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("category delete failed")
        .json()
        .await
        .expect("category delete response not JSON");
    assert_eq!(gone["success"], true, "category delete rejected: {gone}");
}

#[tokio::test]
#[ignore = "Requires running admin server and ADMIN_TEST_PASSWORD"]
async fn test_resync_grades_reports_updated_count() {
    let client = client();
    let base_url = admin_base_url();
    let token = admin_login(&client).await;

    let resync: Value = client
        .post(format!("{base_url}/api/admin/maintenance/resync-grades"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("resync failed")
        .json()
        .await
        .expect("resync response not JSON");

    assert_eq!(resync["success"], true, "resync rejected: {resync}");
    assert!(resync["updatedCount"].is_u64());
}
