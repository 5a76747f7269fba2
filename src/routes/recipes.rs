// ABOUTME: Route handlers for the recipes REST API
// ABOUTME: Provides endpoints for recipe CRUD and stock-only updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! Recipes routes
//!
//! CRUD endpoints over the recipe store plus the dedicated stock update.
//! Wire JSON is camelCase, matching the contract of the original
//! application (`totalCost`, `yield`, `createdAt`).

use crate::{
    database::recipes::{CreateRecipeRequest, RecipesManager, UpdateRecipeRequest},
    errors::AppError,
    models::{Ingredient, Recipe},
    scaling,
    server::ServerResources,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Response for one ingredient line
#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientResponse {
    /// Unique identifier
    pub id: String,
    /// Ingredient label
    pub name: String,
    /// Grams in the reference batch
    pub quantity: f64,
    /// Cost per kilogram
    pub price: f64,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.map(|id| id.to_string()).unwrap_or_default(),
            name: ingredient.name,
            quantity: ingredient.quantity,
            price: ingredient.price,
        }
    }
}

/// Response for a recipe
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    /// Unique identifier
    pub id: String,
    /// Recipe name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Ingredient lines in stored order
    pub ingredients: Vec<IngredientResponse>,
    /// Ordered fabrication steps
    pub protocol: Vec<String>,
    /// Ordered molding labels
    pub molding: Vec<String>,
    /// Mini-tablet units the reference batch produces
    #[serde(rename = "yield")]
    pub yield_count: u32,
    /// Denormalized reference batch cost
    pub total_cost: f64,
    /// Current inventory count
    pub stock: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            name: recipe.name,
            description: recipe.description,
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            protocol: recipe.protocol,
            molding: recipe.molding,
            yield_count: recipe.yield_count,
            total_cost: recipe.total_cost,
            stock: recipe.stock,
            created_at: recipe.created_at.to_rfc3339(),
            updated_at: recipe.updated_at.to_rfc3339(),
        }
    }
}

/// Response metadata attached to list responses
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Response timestamp
    pub timestamp: String,
    /// API version
    pub api_version: String,
}

/// Response for listing recipes
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    /// Recipes, newest first
    pub recipes: Vec<RecipeResponse>,
    /// Total count of stored recipes
    pub total: u32,
    /// Metadata
    pub metadata: ResponseMetadata,
}

/// Response for a successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRecipeResponse {
    /// Whether the recipe was deleted
    pub success: bool,
}

/// Ingredient line as submitted by clients
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientBody {
    /// Existing id, ignored; lines are always re-created
    #[serde(default)]
    pub id: Option<String>,
    /// Ingredient label
    #[serde(default)]
    pub name: String,
    /// Grams in the reference batch
    #[serde(default)]
    pub quantity: f64,
    /// Cost per kilogram
    #[serde(default)]
    pub price: f64,
}

impl From<IngredientBody> for Ingredient {
    fn from(body: IngredientBody) -> Self {
        Self {
            id: body.id.as_deref().and_then(|id| Uuid::parse_str(id).ok()),
            name: body.name,
            quantity: body.quantity,
            price: body.price,
        }
    }
}

/// Request body for creating a recipe
///
/// Every field is optional at the serde layer so that missing values reach
/// validation and come back as per-field messages rather than a bare
/// deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeBody {
    /// Recipe name
    #[serde(default)]
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered fabrication steps
    #[serde(default)]
    pub protocol: Vec<String>,
    /// Ordered molding labels
    #[serde(default)]
    pub molding: Vec<String>,
    /// Mini-tablet units the reference batch produces
    #[serde(rename = "yield", default)]
    pub yield_count: u32,
    /// Client-computed total cost; ignored, the server recomputes it
    #[serde(default)]
    pub total_cost: Option<f64>,
    /// Initial inventory count
    #[serde(default)]
    pub stock: f64,
    /// Reference batch ingredient lines
    #[serde(default)]
    pub ingredients: Vec<IngredientBody>,
}

/// Request body for updating a recipe
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeBody {
    /// New name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New fabrication steps (if provided)
    pub protocol: Option<Vec<String>>,
    /// New molding labels (if provided)
    pub molding: Option<Vec<String>>,
    /// New yield (if provided)
    #[serde(rename = "yield")]
    pub yield_count: Option<u32>,
    /// New total cost (if provided; ignored when ingredients are replaced)
    pub total_cost: Option<f64>,
    /// New stock (if provided)
    pub stock: Option<f64>,
    /// Replacement ingredient list (if provided)
    pub ingredients: Option<Vec<IngredientBody>>,
}

/// Request body for the stock-only update
#[derive(Debug, Deserialize)]
pub struct UpdateStockBody {
    /// New inventory count
    pub stock: f64,
}

/// Recipes routes handler
pub struct RecipesRoutes;

impl RecipesRoutes {
    /// Create all recipes routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", put(Self::handle_update))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .route("/api/recipes/:id/stock", patch(Self::handle_update_stock))
            .with_state(resources)
    }

    /// Get the recipes manager from the shared pool
    fn manager(resources: &Arc<ServerResources>) -> RecipesManager {
        RecipesManager::new(resources.database.pool().clone())
    }

    /// Parse a path id, mapping unparseable ids to a not-found outcome
    fn parse_recipe_id(id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("Recipe {id}")))
    }

    /// Build metadata for responses
    fn build_metadata() -> ResponseMetadata {
        ResponseMetadata {
            timestamp: Utc::now().to_rfc3339(),
            api_version: "1.0".to_owned(),
        }
    }

    /// Handle GET /api/recipes - List recipes, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let manager = Self::manager(&resources);
        let recipes = manager.list().await?;
        let total = manager.count().await?;

        let response = ListRecipesResponse {
            recipes: recipes.into_iter().map(Into::into).collect(),
            total,
            metadata: Self::build_metadata(),
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/recipes - Create a new recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<CreateRecipeBody>,
    ) -> Result<Response, AppError> {
        let ingredients: Vec<Ingredient> = body.ingredients.into_iter().map(Into::into).collect();

        // The stored total cost is always the engine's sum over the
        // submitted reference batch; any client-computed value is ignored.
        let request = CreateRecipeRequest {
            name: body.name,
            description: body.description,
            protocol: body.protocol,
            molding: body.molding,
            yield_count: body.yield_count,
            total_cost: scaling::cost_of(&ingredients),
            stock: body.stock,
            ingredients,
        };
        request.validate()?;

        let manager = Self::manager(&resources);
        let recipe = manager.create(&request).await?;

        tracing::info!(recipe_id = %recipe.id, "recipe created");
        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id - Get a specific recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;
        let manager = Self::manager(&resources);
        let recipe = manager
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/recipes/:id - Update a recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateRecipeBody>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;

        let ingredients: Option<Vec<Ingredient>> = body
            .ingredients
            .map(|list| list.into_iter().map(Into::into).collect());

        // A replaced ingredient list invalidates any submitted total cost;
        // recompute through the engine. Without ingredients the field stays
        // independently editable.
        let total_cost = match &ingredients {
            Some(list) => Some(scaling::cost_of(list)),
            None => body.total_cost,
        };

        let request = UpdateRecipeRequest {
            name: body.name,
            description: body.description,
            protocol: body.protocol,
            molding: body.molding,
            yield_count: body.yield_count,
            total_cost,
            stock: body.stock,
            ingredients,
        };
        request.validate()?;

        let manager = Self::manager(&resources);
        let recipe = manager
            .update(recipe_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        tracing::info!(recipe_id = %recipe.id, "recipe updated");
        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - Delete a recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;
        let manager = Self::manager(&resources);
        let deleted = manager.delete(recipe_id).await?;

        if !deleted {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        tracing::info!(recipe_id = %recipe_id, "recipe deleted");
        Ok((
            StatusCode::OK,
            Json(DeleteRecipeResponse { success: true }),
        )
            .into_response())
    }

    /// Handle PATCH /api/recipes/:id/stock - Update only the stock field
    async fn handle_update_stock(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(body): Json<UpdateStockBody>,
    ) -> Result<Response, AppError> {
        let recipe_id = Self::parse_recipe_id(&id)?;

        if body.stock < 0.0 {
            return Err(AppError::invalid_input("Recipe validation failed")
                .with_details(serde_json::json!({
                    "fields": [{
                        "field": "stock",
                        "message": crate::constants::validation_messages::MIN_STOCK
                    }]
                })));
        }

        let manager = Self::manager(&resources);
        let recipe = manager
            .update_stock(recipe_id, body.stock)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
