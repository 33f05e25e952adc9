//! Cylinders, gas types, inventory, supplies and the debug surface

mod common;

use axum::http::{Method, StatusCode};
use common::{get, request, token_for, TestApp};
use medgas_api::config::FeatureFlags;
use medgas_shared::models::{cylinder::CylinderStatus, user::Role};
use serde_json::json;

fn send_as(role: Role, method: Method, uri: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    request(method, uri, Some(&token_for(role)), Some(body))
}

#[tokio::test]
async fn test_empty_inventory_is_success() {
    let t = TestApp::new();

    let (status, body) = t.json(get("/api/inventory/summary", Role::Technician)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": [] }));
}

#[tokio::test]
async fn test_inventory_upsert_then_summary() {
    let t = TestApp::new();
    let oxygen = t.store.seed_gas_type("Oxygen");

    let (status, body) = t
        .json(send_as(
            Role::Storekeeper,
            Method::PUT,
            &format!("/api/inventory/{}", oxygen),
            json!({ "total_cylinders": 12, "total_liters": 480.0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Inventory updated");

    let (_, summary) = t.json(get("/api/inventory/summary", Role::Admin)).await;
    assert_eq!(summary["data"][0]["gas_name"], "Oxygen");
    assert_eq!(summary["data"][0]["total_cylinders"], 12);
}

#[tokio::test]
async fn test_inventory_rejects_negative_levels() {
    let t = TestApp::new();
    let oxygen = t.store.seed_gas_type("Oxygen");

    let (status, body) = t
        .json(send_as(
            Role::Admin,
            Method::PUT,
            &format!("/api/inventory/{}", oxygen),
            json!({ "total_cylinders": -1, "total_liters": 10.0 }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "total_cylinders");
    assert_eq!(t.store.writes(), 0);
}

#[tokio::test]
async fn test_cylinder_lifecycle() {
    let t = TestApp::new();

    let (status, created) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/cylinders",
            json!({ "code": "OX-100", "size": "40L" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "empty");
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = t
        .json(send_as(
            Role::Technician,
            Method::PATCH,
            &format!("/api/cylinders/{}/status", id),
            json!({ "status": "filled" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cylinder marked as filled");
    assert_eq!(t.store.cylinder_status(id as i32), Some(CylinderStatus::Filled));

    let (_, filled) = t.json(get("/api/cylinders?status=filled", Role::Technician)).await;
    assert_eq!(filled["count"], 1);

    let (status, _) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/cylinders",
            json!({ "code": "OX-100", "size": "40L" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cylinder_status_and_filter_validation() {
    let t = TestApp::new();
    let id = t.store.seed_cylinder("OX-1", CylinderStatus::Empty, None);

    let (status, body) = t
        .json(send_as(
            Role::Technician,
            Method::PATCH,
            &format!("/api/cylinders/{}/status", id),
            json!({ "status": "lost" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid status");
    assert_eq!(t.store.writes(), 0);

    let (status, _) = t.json(get("/api/cylinders?status=lost", Role::Admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t.json(get("/api/cylinders/999", Role::Admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_technician_cannot_register_cylinders() {
    let t = TestApp::new();

    let (status, _) = t
        .json(send_as(
            Role::Technician,
            Method::POST,
            "/api/cylinders",
            json!({ "code": "OX-1", "size": "40L" }),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(t.store.calls(), 0);
}

#[tokio::test]
async fn test_assign_cylinder_to_supply() {
    let t = TestApp::new();
    let supply = t.store.seed_supply("General", 80.0, None, None);
    let cylinder = t.store.seed_cylinder("OX-1", CylinderStatus::Filled, None);

    let (status, body) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            &format!("/api/cylinders/{}/assign", cylinder),
            json!({ "supply_id": supply }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cylinder assigned");
    assert_eq!(t.store.cylinder_status(cylinder), Some(CylinderStatus::Assigned));
}

#[tokio::test]
async fn test_gas_types() {
    let t = TestApp::new();

    let (status, body) = t
        .json(send_as(
            Role::Admin,
            Method::POST,
            "/api/gas-types",
            json!({ "name": "  Nitrous Oxide " }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Nitrous Oxide");

    let (_, list) = t.json(get("/api/gas-types", Role::Technician)).await;
    assert_eq!(list["count"], 1);

    let (status, _) = t
        .json(send_as(Role::Admin, Method::POST, "/api/gas-types", json!({ "name": "" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_supply_create_and_signatures() {
    let t = TestApp::new();

    let (status, created) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/supplies",
            json!({
                "hospital_name": "St. Mary",
                "total_price": 250.0,
                "recipient_name": "Ward Sister",
                "recipient_signature": "data:image/png;base64,AAAA",
                "driver_name": "Sam Driver",
                "deliverer_signature": ""
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["data"].get("recipient_signature").is_none());
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, signatures) = t
        .json(get(&format!("/api/supplies/{}/signatures", id), Role::Technician))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        signatures,
        json!({
            "recipient_name": "Ward Sister",
            "recipient_signature": "data:image/png;base64,AAAA",
            "deliverer_name": "Sam Driver",
            "deliverer_signature": null
        })
    );
}

#[tokio::test]
async fn test_signatures_bad_and_missing_ids() {
    let t = TestApp::new();

    let (status, _) = t.json(get("/api/supplies/abc/signatures", Role::Admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t.json(get("/api/supplies/-4/signatures", Role::Admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = t.json(get("/api/supplies/77/signatures", Role::Admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Supply not found");
}

#[tokio::test]
async fn test_debug_routes_absent_by_default() {
    let t = TestApp::new();

    let response = t.send(get("/api/debug/time", Role::Admin)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(t.store.calls(), 0);
}

#[tokio::test]
async fn test_debug_routes_when_enabled() {
    let t = TestApp::with_features(FeatureFlags {
        debug_routes: true,
        ..FeatureFlags::default()
    });

    let (status, _) = t.json(get("/api/debug/time", Role::Storekeeper)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.json(get("/api/debug/schema/cylinders", Role::Admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = t.json(get("/api/debug/schema/secrets", Role::Admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unknown table");

    t.store.set_failing(true);
    let (status, body) = t.json(get("/api/debug/time", Role::Admin)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_blank_names_are_rejected_before_write() {
    let t = TestApp::new();

    let (status, body) = t
        .json(send_as(Role::Admin, Method::POST, "/api/gas-types", json!({ "name": "   " })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "name");

    let (status, body) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/cylinders",
            json!({ "code": "  ", "size": " " }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let (status, body) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/supplies",
            json!({
                "hospital_name": " ",
                "total_price": 10.0,
                "recipient_name": "\t",
                "driver_name": "   "
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"].as_array().unwrap().len(), 3);

    assert_eq!(t.store.writes(), 0);
}

#[tokio::test]
async fn test_padded_names_are_stored_trimmed() {
    let t = TestApp::new();

    let (status, cylinder) = t
        .json(send_as(
            Role::Storekeeper,
            Method::POST,
            "/api/cylinders",
            json!({ "code": " OX-7 ", "size": " 10L" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cylinder["data"]["code"], "OX-7");
    assert_eq!(cylinder["data"]["size"], "10L");

    let (status, supply) = t
        .json(send_as(
            Role::Admin,
            Method::POST,
            "/api/supplies",
            json!({
                "hospital_name": "  General ",
                "total_price": 5.0,
                "recipient_name": "Ward Sister",
                "driver_name": " Sam Driver"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(supply["data"]["hospital_name"], "General");
    assert_eq!(supply["data"]["driver_name"], "Sam Driver");
}
