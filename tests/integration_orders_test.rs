mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};

use common::{body_json, TestApp};
use sales_order_api::entities::{sales_order, sales_order_line};

async fn order_count(app: &TestApp) -> u64 {
    sales_order::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count orders")
}

async fn line_count(app: &TestApp) -> u64 {
    sales_order_line::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count lines")
}

fn sample_order() -> Value {
    json!({
        "reference_number": 12345678,
        "customer_code": "CUST001",
        "user_id": 45,
        "status": "P",
        "remarks": "First test order",
        "lines": [
            {
                "reference_number": 12345678,
                "item_code": "ITEM001",
                "item_name": "Blue Shirt",
                "policy_code": "PROMO10",
                "policy_detail": "10% Off",
                "requested_qty": 10,
                "requested_rate": 15.5
            },
            {
                "item_code": "ITEM002",
                "requested_qty": 8,
                "requested_rate": 15.0,
                "policy_rate": 14.25
            }
        ]
    })
}

async fn create_sample_order(app: &TestApp) -> i64 {
    let response = app
        .request(Method::POST, "/api/v1/orders", Some(sample_order()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    body["data"]["id"].as_i64().expect("order id present")
}

#[tokio::test]
async fn health_and_status_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["checks"]["database"], json!("healthy"));

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["service"], json!("sales-order-api"));
}

#[tokio::test]
async fn create_and_fetch_order_with_derived_values() {
    let app = TestApp::new().await;
    let id = create_sample_order(&app).await;

    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let header = &body["data"]["header"];
    assert_eq!(header["customer_code"], json!("CUST001"));
    assert_eq!(header["user_id"], json!(45));
    assert_eq!(header["status"], json!("P"));
    assert_eq!(header["reference_number"], json!(12345678));

    let lines = body["data"]["lines"].as_array().expect("lines array");
    assert_eq!(lines.len(), 2);

    // requested_value = qty x rate; approved side defaults to zero, not null
    assert_eq!(lines[0]["requested_value"], json!(155.0));
    assert_eq!(lines[0]["approved_value"], json!(0.0));
    assert_eq!(lines[0]["approved_qty"], Value::Null);
    assert_eq!(lines[1]["requested_value"], json!(120.0));

    // listing shows the header, newest first
    let response = app.request(Method::GET, "/api/v1/orders", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["orders"][0]["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn approve_line_sets_and_resets_approved_value() {
    let app = TestApp::new().await;
    let id = create_sample_order(&app).await;

    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{id}"), None)
            .await,
    )
    .await;
    let line_id = body["data"]["lines"][0]["id"].as_i64().expect("line id");

    // approve with explicit quantities
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/lines/{line_id}/approve"),
            Some(json!({ "approved_qty": 8, "approved_rate": 15.0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["approved_qty"], json!(8.0));
    assert_eq!(body["data"]["approved_rate"], json!(15.0));
    assert_eq!(body["data"]["approved_value"], json!(120.0));

    // re-approving with both fields omitted resets the value to zero
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/lines/{line_id}/approve"),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["approved_qty"], Value::Null);
    assert_eq!(body["data"]["approved_rate"], Value::Null);
    assert_eq!(body["data"]["approved_value"], json!(0.0));
}

#[tokio::test]
async fn approve_line_belonging_to_another_order_is_not_found() {
    let app = TestApp::new().await;
    let first = create_sample_order(&app).await;
    let second = create_sample_order(&app).await;
    assert_ne!(first, second);

    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{first}"), None)
            .await,
    )
    .await;
    let first_line = body["data"]["lines"][0]["id"].as_i64().expect("line id");

    // the line exists, but not on the second order
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{second}/lines/{first_line}/approve"),
            Some(json!({ "approved_qty": 1, "approved_rate": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // and the line itself is untouched
    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{first}"), None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["lines"][0]["approved_value"], json!(0.0));
}

#[tokio::test]
async fn partial_updates_leave_other_fields_untouched() {
    let app = TestApp::new().await;
    let id = create_sample_order(&app).await;

    // update only the status
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "status": "D" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["header"]["status"], json!("D"));
    assert_eq!(body["data"]["header"]["remarks"], json!("First test order"));

    // update only the remarks
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({ "remarks": "Delivered in full" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["header"]["status"], json!("D"));
    assert_eq!(
        body["data"]["header"]["remarks"],
        json!("Delivered in full")
    );

    // neither field is a client error
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/status"),
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // unknown order is not found
    let response = app
        .request(
            Method::PUT,
            "/api/v1/orders/999999/status",
            Some(json!({ "status": "D" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_with_zero_lines_is_rejected_without_persisting() {
    let app = TestApp::new().await;

    let payload = json!({
        "customer_code": "CUST001",
        "user_id": 45,
        "lines": []
    });

    let response = app
        .request(Method::POST, "/api/v1/orders", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(order_count(&app).await, 0);

    // rejection is idempotent
    let response = app
        .request(Method::POST, "/api/v1/orders", Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(order_count(&app).await, 0);
}

#[tokio::test]
async fn create_with_bad_middle_line_persists_nothing() {
    let app = TestApp::new().await;

    let mut lines = Vec::new();
    for i in 0..5 {
        lines.push(json!({
            "item_code": format!("ITEM{i:03}"),
            "requested_qty": 5,
            "requested_rate": 9.75
        }));
    }
    // third of five loses its rate
    lines[2] = json!({ "item_code": "ITEM002", "requested_qty": 5 });

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_code": "CUST001",
                "user_id": 45,
                "lines": lines
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(order_count(&app).await, 0);
    assert_eq!(line_count(&app).await, 0);

    // no header ever became visible
    let response = app.request(Method::GET, "/api/v1/orders/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_requires_customer_code_and_user_id() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "user_id": 45,
                "lines": [{ "item_code": "ITEM001", "requested_qty": 1, "requested_rate": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_code": "CUST001",
                "lines": [{ "item_code": "ITEM001", "requested_qty": 1, "requested_rate": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(order_count(&app).await, 0);
}

#[tokio::test]
async fn delete_order_cascades_to_lines() {
    let app = TestApp::new().await;
    let id = create_sample_order(&app).await;
    assert_eq!(line_count(&app).await, 2);

    let response = app
        .request(Method::DELETE, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // header gone
    let response = app
        .request(Method::GET, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // lines gone with it
    let remaining = sales_order_line::Entity::find()
        .filter(sales_order_line::Column::OrderId.eq(id))
        .count(&*app.state.db)
        .await
        .expect("count lines");
    assert_eq!(remaining, 0);
    assert_eq!(line_count(&app).await, 0);

    // deleting again reports not found
    let response = app
        .request(Method::DELETE, &format!("/api/v1/orders/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lenient_numeric_inputs_are_coerced() {
    let app = TestApp::new().await;

    // quantities and rates arrive as strings
    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_code": "CUST002",
                "user_id": 7,
                "lines": [{
                    "item_code": "ITEM010",
                    "requested_qty": "10",
                    "requested_rate": "15.5"
                }]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"]
        .as_i64()
        .expect("order id");

    let body = body_json(
        app.request(Method::GET, &format!("/api/v1/orders/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["lines"][0]["requested_value"], json!(155.0));
    let line_id = body["data"]["lines"][0]["id"].as_i64().expect("line id");

    // malformed approval inputs normalize to zero instead of erroring
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{id}/lines/{line_id}/approve"),
            Some(json!({ "approved_qty": "not-a-number", "approved_rate": 15.0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["approved_value"], json!(0.0));
}

#[tokio::test]
async fn error_responses_carry_structured_bodies() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/orders/424242", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Not Found"));
    assert!(body["message"]
        .as_str()
        .expect("message present")
        .contains("424242"));
    assert_eq!(body["request_id"].as_str().map(str::to_string), request_id);
}
