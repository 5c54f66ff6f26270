//! HTTP API tests against a running server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`cw-cli migrate`)
//! - The server running (`cargo run -p cartwheel-server`)
//!
//! Set `CARTWHEEL_BASE_URL` if the server is not on `http://localhost:3000`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use cartwheel_integration_tests::{base_url, unique_name};

async fn post(client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}{path}", base_url()))
        .json(body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    (status, resp.json().await.expect("JSON body"))
}

async fn get(client: &Client, path: &str) -> (StatusCode, Value) {
    let resp = client
        .get(format!("{}{path}", base_url()))
        .send()
        .await
        .expect("request failed");
    let status = resp.status();
    (status, resp.json().await.expect("JSON body"))
}

async fn create_product(client: &Client, price: &str, stock: i32) -> i64 {
    let name = unique_name("Http product");
    let body = json!({"name": name, "price": price, "stock_quantity": stock});
    let (status, product) = post(client, "/products", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["price"], price);
    product["id"].as_i64().expect("id")
}

async fn add_item(client: &Client, cart_id: i64, product_id: i64, quantity: i32) -> Value {
    let body = json!({"cart_id": cart_id, "product_id": product_id, "quantity": quantity});
    let (status, item) = post(client, "/carts/add-item", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    item
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_endpoints() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_request_id_is_echoed() {
    let resp = Client::new()
        .get(format!("{}/health", base_url()))
        .header("x-request-id", "smoke-test-1")
        .send()
        .await
        .expect("request failed");

    assert_eq!(resp.headers()["x-request-id"], "smoke-test-1");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_cart_flow() {
    let client = Client::new();

    let body = json!({"name": unique_name("Http")});
    let (status, customer) = post(&client, "/customers", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = customer["cart_id"].as_i64().expect("cart_id");

    let beans = create_product(&client, "10.00", 15).await;
    let filters = create_product(&client, "15.00", 20).await;

    let item = add_item(&client, cart_id, beans, 5).await;
    assert_eq!(item["status"], "ADDED");
    assert_eq!(item["quantity"], 5);
    add_item(&client, cart_id, filters, 7).await;

    let (status, details) = post(&client, "/carts/details", &json!({"cart": cart_id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["count"], 12);
    assert_eq!(details["total_price"], "155.00");
    assert_eq!(details["cart_items"][0]["product"]["id"], beans);
    assert_eq!(details["cart_items"][1]["product"]["id"], filters);

    let (status, summary) = post(&client, "/carts/checkout", &json!({"cart_id": cart_id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["count"], 12);
    assert_eq!(summary["total_price"], "155.00");
    let items = summary["cart_items"].as_array().expect("cart_items");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["status"] == "CHECKOUT"));

    for (product_id, remaining) in [(beans, 10), (filters, 13)] {
        let (status, product) = get(&client, &format!("/products/{product_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["stock_quantity"], remaining);
    }

    let (status, body) = post(&client, "/carts/checkout", &json!({"cart_id": cart_id})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Cart is empty."}));
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_error_responses() {
    let client = Client::new();

    let (status, body) = post(
        &client,
        "/carts/add-item",
        &json!({"cart_id": 1, "product_id": 1, "quantity": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Quantity must be more than zero.");

    let body = json!({"cart_item_id": i32::MAX});
    let (status, body) = post(&client, "/carts/remove-item", &body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid cart item.");

    let (status, body) = get(&client, &format!("/carts/{}", i32::MAX)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid cart id.");

    let (status, body) = get(&client, "/no/such/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found.");

    let (status, body) = get(&client, "/carts/details").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed.");
}
