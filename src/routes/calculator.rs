// ABOUTME: Route handler for the production cost calculator
// ABOUTME: Scales a stored recipe to a tablet format and unit count with derived costs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! Calculator routes
//!
//! One endpoint that runs the scaling/costing engine against a stored
//! recipe. The recipe's reference batch is normalized to a mini tablet,
//! scaled to the requested format and unit count, and priced per line.

use crate::{
    constants::validation_messages,
    database::recipes::RecipesManager,
    errors::AppError,
    scaling::{self, ProductionLine, TabletFormat},
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Query parameters for a production estimate
#[derive(Debug, Deserialize, Default)]
pub struct ProductionQuery {
    /// Tablet format, `mini` or `normal` (default `normal`)
    pub format: Option<String>,
    /// Number of units to produce (default 1)
    pub quantity: Option<u32>,
}

/// One ingredient line of the production estimate
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductionLineResponse {
    /// Ingredient label
    pub name: String,
    /// Grams needed for the whole run
    pub quantity: f64,
    /// Cost of this line for the whole run
    pub cost: f64,
}

impl From<ProductionLine> for ProductionLineResponse {
    fn from(line: ProductionLine) -> Self {
        Self {
            name: line.name,
            quantity: line.quantity,
            cost: line.cost,
        }
    }
}

/// Response for a production estimate
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionResponse {
    /// Recipe the estimate was computed for
    pub recipe_id: String,
    /// Recipe name
    pub recipe_name: String,
    /// Tablet format of the run
    pub format: String,
    /// Number of units in the run
    pub unit_count: u32,
    /// Per-ingredient quantities and costs for the run
    pub ingredients: Vec<ProductionLineResponse>,
    /// Ingredient cost of one mini tablet
    pub unit_cost_mini: f64,
    /// Ingredient cost of one normal tablet
    pub unit_cost_normal: f64,
    /// Total ingredient cost of the run
    pub total_cost: f64,
}

/// Calculator routes handler
pub struct CalculatorRoutes;

impl CalculatorRoutes {
    /// Create all calculator routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/:id/production",
                get(Self::handle_production_estimate),
            )
            .with_state(resources)
    }

    /// Handle GET /api/recipes/:id/production - Run the costing engine
    async fn handle_production_estimate(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Query(query): Query<ProductionQuery>,
    ) -> Result<Response, AppError> {
        let recipe_id = Uuid::parse_str(&id)
            .map_err(|_| AppError::not_found(format!("Recipe {id}")))?;

        let format = match query.format.as_deref() {
            None => TabletFormat::default(),
            Some(raw) => TabletFormat::parse(raw).ok_or_else(|| {
                AppError::invalid_input(validation_messages::UNKNOWN_TABLET_FORMAT).with_details(
                    serde_json::json!({
                        "fields": [{
                            "field": "format",
                            "message": validation_messages::UNKNOWN_TABLET_FORMAT
                        }]
                    }),
                )
            })?,
        };
        let unit_count = query.quantity.unwrap_or(1);

        let manager = RecipesManager::new(resources.database.pool().clone());
        let recipe = manager
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let mini_ingredients = scaling::normalize_to_mini(&recipe.ingredients)
            .map_err(|e| e.with_resource_id(id.clone()))?;
        let plan = scaling::calculate_production(&mini_ingredients, format, unit_count)?;

        let unit_cost_mini = scaling::cost_of(&mini_ingredients);
        let normal_ingredients =
            scaling::scale_for_format(&mini_ingredients, TabletFormat::Normal);
        let unit_cost_normal = scaling::cost_of(&normal_ingredients);

        let response = ProductionResponse {
            recipe_id: recipe.id.to_string(),
            recipe_name: recipe.name,
            format: plan.format.as_str().to_owned(),
            unit_count: plan.unit_count,
            ingredients: plan.lines.into_iter().map(Into::into).collect(),
            unit_cost_mini,
            unit_cost_normal,
            total_cost: plan.total_cost,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
