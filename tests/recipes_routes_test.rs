// ABOUTME: Integration tests for the recipes and calculator route handlers
// ABOUTME: Tests CRUD statuses, validation bodies, stock updates, and production estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use axum::Router;
use chocolatier::server::HttpServer;
use common::create_test_server_resources;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

const TOLERANCE: f64 = 1e-9;

// ============================================================================
// Test Helpers
// ============================================================================

async fn setup_test_router() -> Router {
    let resources = create_test_server_resources().await.unwrap();
    HttpServer::router(resources)
}

fn sample_recipe_body() -> Value {
    json!({
        "name": "Tablette noire 85%",
        "description": "Dark tablet sweetened with stevia",
        "protocol": ["Melt the cocoa mass at 45C", "Temper down to 28C"],
        "molding": ["Polycarbonate 100g"],
        "yield": 20,
        "totalCost": 0.0,
        "stock": 0.0,
        "ingredients": [
            {"name": "Cocoa", "quantity": 80.0, "price": 25000.0},
            {"name": "Stevia", "quantity": 20.0, "price": 50000.0}
        ]
    })
}

async fn create_sample_recipe(router: &Router) -> Value {
    let response = AxumTestRequest::post("/api/recipes")
        .json(&sample_recipe_body())
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

// ============================================================================
// Recipe CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_create_recipe() {
    let router = setup_test_router().await;
    let recipe = create_sample_recipe(&router).await;

    assert_eq!(recipe["name"], "Tablette noire 85%");
    assert_eq!(recipe["yield"], 20);
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 2);
    // Server recomputes the reference batch cost regardless of the
    // submitted totalCost: 80*25000/1000 + 20*50000/1000 = 3000
    assert!((recipe["totalCost"].as_f64().unwrap() - 3000.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_create_recipe_validation_error() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({
            "name": "",
            "yield": 0,
            "stock": -2.0,
            "ingredients": [{"name": "", "quantity": -1.0, "price": 100.0}]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let fields: Vec<String> = body["error"]["details"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_owned())
        .collect();
    assert!(fields.contains(&"name".to_owned()));
    assert!(fields.contains(&"yield".to_owned()));
    assert!(fields.contains(&"stock".to_owned()));
    assert!(fields.contains(&"ingredients[0].name".to_owned()));
    assert!(fields.contains(&"ingredients[0].quantity".to_owned()));
}

#[tokio::test]
async fn test_get_recipe() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let recipe: Value = response.json();
    assert_eq!(recipe["id"], created["id"]);
    assert_eq!(recipe["protocol"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_recipe_not_found() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::get(&format!("/api/recipes/{}", uuid::Uuid::new_v4()))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_list_recipes() {
    let router = setup_test_router().await;
    create_sample_recipe(&router).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let mut second = sample_recipe_body();
    second["name"] = json!("Tablette lait");
    let response = AxumTestRequest::post("/api/recipes")
        .json(&second)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = AxumTestRequest::get("/api/recipes").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let recipes = body["recipes"].as_array().unwrap();
    // Newest first
    assert_eq!(recipes[0]["name"], "Tablette lait");
    assert_eq!(recipes[1]["name"], "Tablette noire 85%");
}

#[tokio::test]
async fn test_update_recipe() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&format!("/api/recipes/{id}"))
        .json(&json!({"name": "Tablette noire 90%"}))
        .send(router.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let recipe: Value = response.json();
    assert_eq!(recipe["name"], "Tablette noire 90%");
    // Untouched fields survive the partial update
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 2);
    assert_eq!(recipe["yield"], 20);
}

#[tokio::test]
async fn test_update_recipe_recomputes_cost_on_ingredient_replacement() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::put(&format!("/api/recipes/{id}"))
        .json(&json!({
            "totalCost": 99999.0,
            "ingredients": [{"name": "Cocoa mass", "quantity": 100.0, "price": 20000.0}]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let recipe: Value = response.json();
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 1);
    // 100*20000/1000 = 2000; the submitted totalCost is ignored
    assert!((recipe["totalCost"].as_f64().unwrap() - 2000.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_delete_recipe() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::delete(&format!("/api/recipes/{id}"))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}"))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_recipe_not_found() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::delete(&format!("/api/recipes/{}", uuid::Uuid::new_v4()))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Stock Update Tests
// ============================================================================

#[tokio::test]
async fn test_update_stock() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::patch(&format!("/api/recipes/{id}/stock"))
        .json(&json!({"stock": 12.0}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let recipe: Value = response.json();
    assert!((recipe["stock"].as_f64().unwrap() - 12.0).abs() < TOLERANCE);
    // Everything else untouched
    assert_eq!(recipe["name"], "Tablette noire 85%");
    assert_eq!(recipe["ingredients"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_stock_rejects_negative() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::patch(&format!("/api/recipes/{id}/stock"))
        .json(&json!({"stock": -1.0}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

// ============================================================================
// Production Estimate Tests
// ============================================================================

#[tokio::test]
async fn test_production_estimate_normal_format() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!(
        "/api/recipes/{id}/production?format=normal&quantity=3"
    ))
    .send(router)
    .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["format"], "normal");
    assert_eq!(body["unitCount"], 3);
    assert!((body["unitCostMini"].as_f64().unwrap() - 150.0).abs() < TOLERANCE);
    assert!((body["unitCostNormal"].as_f64().unwrap() - 3000.0).abs() < TOLERANCE);
    assert!((body["totalCost"].as_f64().unwrap() - 9000.0).abs() < TOLERANCE);

    let lines = body["ingredients"].as_array().unwrap();
    assert_eq!(lines[0]["name"], "Cocoa");
    assert!((lines[0]["quantity"].as_f64().unwrap() - 240.0).abs() < TOLERANCE);
    assert!((lines[1]["quantity"].as_f64().unwrap() - 60.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_production_estimate_mini_defaults_to_one_unit() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/production?format=mini"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["unitCount"], 1);
    assert!((body["totalCost"].as_f64().unwrap() - 150.0).abs() < TOLERANCE);
    // Mini breakdown sums to the 5 g unit weight
    let total_weight: f64 = body["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["quantity"].as_f64().unwrap())
        .sum();
    assert!((total_weight - 5.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_production_estimate_unknown_format_rejected() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/production?format=jumbo"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_production_estimate_zero_quantity_rejected() {
    let router = setup_test_router().await;
    let created = create_sample_recipe(&router).await;
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/production?quantity=0"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_production_estimate_zero_weight_recipe_rejected() {
    let router = setup_test_router().await;

    let mut body = sample_recipe_body();
    body["ingredients"] = json!([{"name": "Cocoa", "quantity": 0.0, "price": 25000.0}]);
    let response = AxumTestRequest::post("/api/recipes")
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap();

    let response = AxumTestRequest::get(&format!("/api/recipes/{id}/production"))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "DEGENERATE_INPUT");
}

#[tokio::test]
async fn test_production_estimate_missing_recipe() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::get(&format!(
        "/api/recipes/{}/production?format=mini",
        uuid::Uuid::new_v4()
    ))
    .send(router)
    .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::get("/health").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_endpoint() {
    let router = setup_test_router().await;

    let response = AxumTestRequest::get("/ready").send(router).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
}
