use crate::common::{TestApp, TestResponse, get_request, json_request};

use axum::http::StatusCode;
use grocer::domain::orders::OrderRepository;
use serde_json::{Value, json};

async fn place(app: &TestApp, token: &str, products: Value) -> TestResponse {
    app.send(json_request(
        "POST",
        "/api/v1/orders",
        json!({ "address": "Almaty, Dostyk 5, apt 12", "products": products }),
        Some(token),
    ))
    .await
}

async fn set_quantity(app: &TestApp, token: &str, item_id: &Value, quantity: Value) -> TestResponse {
    app.send(json_request(
        "PATCH",
        &format!("/api/v1/order-items/{}", item_id),
        json!({ "quantity": quantity }),
        Some(token),
    ))
    .await
}

#[tokio::test]
async fn test_order_totals_are_floored_line_sums() {
    let app = TestApp::new();
    let (user_id, token, _) = app.register_and_login("buyer@grocer.test").await;

    let response = place(
        &app,
        &token,
        json!([
            { "id": 1, "price": 100, "amount": 2 },
            { "id": 2, "price": 50, "amount": 3 }
        ]),
    )
    .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    let order = &response.body["data"]["attributes"];
    assert_eq!(order["total"], 350);
    assert_eq!(order["userId"], user_id);
    assert_eq!(order["statusId"], 1);
    assert_eq!(order["items"][0]["total"], 200);
    assert_eq!(order["items"][1]["total"], 150);
}

#[tokio::test]
async fn test_fractional_amounts_round_down() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("weigh@grocer.test").await;

    let response = place(&app, &token, json!([{ "id": 3, "price": 999, "amount": 0.333 }])).await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    // 999 * 0.333 = 332.667
    assert_eq!(response.body["data"]["attributes"]["total"], 332);
}

#[tokio::test]
async fn test_every_invalid_line_is_reported() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("sloppy@grocer.test").await;

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/orders",
            json!({
                "address": "",
                "products": [
                    { "id": 1, "price": -5, "amount": 1 },
                    { "id": 2, "price": 10, "amount": 0 }
                ]
            }),
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let pointers = response.error_pointers();
    assert!(pointers.contains(&"/address".to_string()));
    assert!(pointers.contains(&"/products/0/price".to_string()));
    assert!(pointers.contains(&"/products/1/amount".to_string()));
    assert_eq!(app.orders.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_order_is_rejected() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("empty@grocer.test").await;

    let response = place(&app, &token, json!([])).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_pointers(), vec!["/products".to_string()]);
}

#[tokio::test]
async fn test_unknown_product_points_at_its_line() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("unknown@grocer.test").await;

    let response = place(
        &app,
        &token,
        json!([
            { "id": 1, "price": 100, "amount": 1 },
            { "id": 404, "price": 100, "amount": 1 }
        ]),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_pointers(), vec!["/products/1/id".to_string()]);
    assert_eq!(app.orders.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_placing_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/orders",
            json!({ "address": "x", "products": [{ "id": 1, "price": 1, "amount": 1 }] }),
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_is_visible_to_owner_only() {
    let app = TestApp::new();
    let (_, owner, _) = app.register_and_login("owner@grocer.test").await;
    let (_, stranger, _) = app.register_and_login("stranger@grocer.test").await;

    let placed = place(&app, &owner, json!([{ "id": 1, "price": 10, "amount": 1 }])).await;
    let uri = format!("/api/v1/orders/{}", placed.body["data"]["id"].as_str().unwrap());

    let mine = app.send(get_request(&uri, Some(&owner))).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"]["attributes"]["items"][0]["productId"], 1);

    let theirs = app.send(get_request(&uri, Some(&stranger))).await;
    assert_eq!(theirs.status, StatusCode::FORBIDDEN);

    let missing = app.send(get_request("/api/v1/orders/9999", Some(&owner))).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zero_quantity_removes_item_and_its_total() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("trim@grocer.test").await;
    let placed = place(
        &app,
        &token,
        json!([
            { "id": 1, "price": 100, "amount": 2 },
            { "id": 2, "price": 50, "amount": 3 }
        ]),
    )
    .await;
    let order_uri = format!("/api/v1/orders/{}", placed.body["data"]["id"].as_str().unwrap());
    let first_item = placed.body["data"]["attributes"]["items"][0]["id"].clone();

    let response = set_quantity(&app, &token, &first_item, json!(0)).await;

    assert_eq!(response.status, StatusCode::OK);
    let update = &response.body["data"]["attributes"];
    assert_eq!(update["removed"], true);
    assert_eq!(update["delta"], -200);
    assert_eq!(update["orderTotal"], 150);

    let order = app.send(get_request(&order_uri, Some(&token))).await;
    assert_eq!(order.body["data"]["attributes"]["total"], 150);
    assert_eq!(
        order.body["data"]["attributes"]["items"].as_array().unwrap().len(),
        1
    );

    let gone = set_quantity(&app, &token, &first_item, json!(1)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quantity_change_reprices_from_unit_price() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("more@grocer.test").await;
    let placed = place(&app, &token, json!([{ "id": 1, "price": 50, "amount": 3 }])).await;
    let item = placed.body["data"]["attributes"]["items"][0]["id"].clone();

    let response = set_quantity(&app, &token, &item, json!(5)).await;

    assert_eq!(response.status, StatusCode::OK);
    let update = &response.body["data"]["attributes"];
    assert_eq!(update["total"], 250);
    assert_eq!(update["delta"], 100);
    assert_eq!(update["orderTotal"], 250);
}

#[tokio::test]
async fn test_item_of_another_users_order_is_forbidden() {
    let app = TestApp::new();
    let (_, owner, _) = app.register_and_login("mine@grocer.test").await;
    let (_, other, _) = app.register_and_login("notmine@grocer.test").await;
    let placed = place(&app, &owner, json!([{ "id": 1, "price": 50, "amount": 1 }])).await;
    let item = placed.body["data"]["attributes"]["items"][0]["id"].clone();

    let response = set_quantity(&app, &other, &item, json!(3)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_negative_quantity_is_rejected() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("neg@grocer.test").await;
    let placed = place(&app, &token, json!([{ "id": 1, "price": 50, "amount": 1 }])).await;
    let item = placed.body["data"]["attributes"]["items"][0]["id"].clone();

    let response = set_quantity(&app, &token, &item, json!(-1)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_pointers(), vec!["/quantity".to_string()]);
}

#[tokio::test]
async fn test_vanished_order_is_an_edit_conflict() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("race@grocer.test").await;
    let placed = place(&app, &token, json!([{ "id": 1, "price": 50, "amount": 1 }])).await;
    let item = placed.body["data"]["attributes"]["items"][0]["id"].clone();
    let order_id: i64 = placed.body["data"]["id"].as_str().unwrap().parse().unwrap();

    let admin = app.admin().await.1;
    app.orders.remove_order_header(order_id).unwrap();

    // Admin skips the ownership lookup and reaches the transaction
    let response = set_quantity(&app, &admin, &item, json!(2)).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_order_total_out_of_range_is_rejected() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("whale@grocer.test").await;

    let response = place(
        &app,
        &token,
        json!([
            { "id": 1, "price": 4611686018427387904_i64, "amount": 1 },
            { "id": 2, "price": 4611686018427387904_i64, "amount": 1 }
        ]),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_pointers(), vec!["/products/1/amount".to_string()]);
    assert_eq!(app.orders.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_quantity_out_of_range_is_rejected() {
    let app = TestApp::new();
    let (_, token, _) = app.register_and_login("bulk-buyer@grocer.test").await;
    let placed = place(&app, &token, json!([{ "id": 1, "price": 50, "amount": 1 }])).await;
    let item = placed.body["data"]["attributes"]["items"][0]["id"].clone();

    let response = set_quantity(&app, &token, &item, json!(1e300)).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_pointers(), vec!["/quantity".to_string()]);
}
