// ABOUTME: Database operations for recipes and their ingredient lines
// ABOUTME: Handles CRUD with atomic ingredient replacement and stock-only updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

use crate::constants::validation_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, Recipe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

/// Request to create a new recipe with its full ingredient list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Recipe name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Ordered fabrication steps
    pub protocol: Vec<String>,
    /// Ordered molding labels
    pub molding: Vec<String>,
    /// Number of mini-tablet units the reference batch produces
    pub yield_count: u32,
    /// Total cost of the reference batch (recomputed by the caller)
    pub total_cost: f64,
    /// Initial inventory count
    pub stock: f64,
    /// Reference batch ingredient lines (ids ignored; fresh ids are assigned)
    pub ingredients: Vec<Ingredient>,
}

/// Request to update an existing recipe
///
/// Absent fields are left untouched. A present `ingredients` list replaces
/// the stored set wholesale, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New name (if provided)
    pub name: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New fabrication steps (if provided)
    pub protocol: Option<Vec<String>>,
    /// New molding labels (if provided)
    pub molding: Option<Vec<String>>,
    /// New yield (if provided)
    pub yield_count: Option<u32>,
    /// New total cost (if provided)
    pub total_cost: Option<f64>,
    /// New stock (if provided)
    pub stock: Option<f64>,
    /// Replacement ingredient list (if provided)
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Build a structured validation error from per-field findings
fn validation_error(fields: Vec<(String, &'static str)>) -> AppError {
    let details: Vec<serde_json::Value> = fields
        .iter()
        .map(|(field, message)| serde_json::json!({"field": field, "message": message}))
        .collect();
    AppError::invalid_input("Recipe validation failed")
        .with_details(serde_json::json!({ "fields": details }))
}

/// Collect per-field findings for an ingredient list
fn check_ingredients(ingredients: &[Ingredient], fields: &mut Vec<(String, &'static str)>) {
    for (index, ingredient) in ingredients.iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            fields.push((
                format!("ingredients[{index}].name"),
                validation_messages::REQUIRED_INGREDIENT_NAME,
            ));
        }
        if ingredient.quantity < 0.0 {
            fields.push((
                format!("ingredients[{index}].quantity"),
                validation_messages::MIN_QUANTITY,
            ));
        }
        if ingredient.price < 0.0 {
            fields.push((
                format!("ingredients[{index}].price"),
                validation_messages::MIN_PRICE,
            ));
        }
    }
}

/// Collect per-field findings for a protocol step list
fn check_protocol(protocol: &[String], fields: &mut Vec<(String, &'static str)>) {
    for (index, step) in protocol.iter().enumerate() {
        if step.trim().is_empty() {
            fields.push((
                format!("protocol[{index}]"),
                validation_messages::REQUIRED_PROTOCOL_STEP,
            ));
        }
    }
}

impl CreateRecipeRequest {
    /// Validate all field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every offending field
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push(("name".to_owned(), validation_messages::REQUIRED_NAME));
        }
        if self.yield_count < 1 {
            fields.push(("yield".to_owned(), validation_messages::MIN_YIELD));
        }
        if self.stock < 0.0 {
            fields.push(("stock".to_owned(), validation_messages::MIN_STOCK));
        }
        check_protocol(&self.protocol, &mut fields);
        check_ingredients(&self.ingredients, &mut fields);

        if fields.is_empty() {
            Ok(())
        } else {
            Err(validation_error(fields))
        }
    }
}

impl UpdateRecipeRequest {
    /// Validate the provided subset of fields
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every offending field
    pub fn validate(&self) -> AppResult<()> {
        let mut fields = Vec::new();
        if self.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            fields.push(("name".to_owned(), validation_messages::REQUIRED_NAME));
        }
        if self.yield_count.is_some_and(|y| y < 1) {
            fields.push(("yield".to_owned(), validation_messages::MIN_YIELD));
        }
        if self.stock.is_some_and(|s| s < 0.0) {
            fields.push(("stock".to_owned(), validation_messages::MIN_STOCK));
        }
        if let Some(protocol) = &self.protocol {
            check_protocol(protocol, &mut fields);
        }
        if let Some(ingredients) = &self.ingredients {
            check_ingredients(ingredients, &mut fields);
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(validation_error(fields))
        }
    }
}

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new recipe together with its ingredient lines
    ///
    /// The recipe row and every ingredient row are written in one
    /// transaction so readers never observe a partially created recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn create(&self, request: &CreateRecipeRequest) -> AppResult<Recipe> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let protocol_json = serde_json::to_string(&request.protocol)?;
        let molding_json = serde_json::to_string(&request.molding)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO recipes (
                id, name, description, protocol, molding,
                yield_count, total_cost, stock, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(&protocol_json)
        .bind(&molding_json)
        .bind(i64::from(request.yield_count))
        .bind(request.total_cost)
        .bind(request.stock)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        let ingredients = insert_ingredients(&mut tx, id, &request.ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        Ok(Recipe {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            ingredients,
            protocol: request.protocol.clone(),
            molding: request.molding.clone(),
            yield_count: request.yield_count,
            total_cost: request.total_cost,
            stock: request.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a recipe by ID with its ingredient lines
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn get(&self, recipe_id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, protocol, molding,
                   yield_count, total_cost, stock, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ingredient_rows = sqlx::query(
            r"
            SELECT id, recipe_id, name, quantity, price
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY position
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredients: {e}")))?;

        let ingredients = ingredient_rows
            .iter()
            .map(row_to_ingredient)
            .collect::<AppResult<Vec<_>>>()?;

        row_to_recipe(&row, ingredients).map(Some)
    }

    /// List all recipes, newest first, with their ingredient lines
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn list(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, protocol, molding,
                   yield_count, total_cost, stock, created_at, updated_at
            FROM recipes
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let ingredient_rows = sqlx::query(
            r"
            SELECT id, recipe_id, name, quantity, price
            FROM ingredients
            ORDER BY recipe_id, position
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        let mut by_recipe: HashMap<String, Vec<Ingredient>> = HashMap::new();
        for row in &ingredient_rows {
            let recipe_id: String = row.get("recipe_id");
            by_recipe
                .entry(recipe_id)
                .or_default()
                .push(row_to_ingredient(row)?);
        }

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let ingredients = by_recipe.remove(&id).unwrap_or_default();
                row_to_recipe(row, ingredients)
            })
            .collect()
    }

    /// Count stored recipes
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn count(&self) -> AppResult<u32> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;
        let count: i64 = row.get("count");
        Ok(u32::try_from(count).unwrap_or(0))
    }

    /// Update an existing recipe
    ///
    /// Field updates and ingredient replacement happen in one transaction.
    /// When `ingredients` is present, the stored set is deleted and the new
    /// lines inserted in order (full replacement, not a merge).
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn update(
        &self,
        recipe_id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> AppResult<Option<Recipe>> {
        // First get the existing recipe
        let existing = self.get(recipe_id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let now = Utc::now();
        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.clone().or(existing.description);
        let protocol = request.protocol.as_ref().unwrap_or(&existing.protocol);
        let molding = request.molding.as_ref().unwrap_or(&existing.molding);
        let yield_count = request.yield_count.unwrap_or(existing.yield_count);
        let total_cost = request.total_cost.unwrap_or(existing.total_cost);
        let stock = request.stock.unwrap_or(existing.stock);
        let protocol_json = serde_json::to_string(protocol)?;
        let molding_json = serde_json::to_string(molding)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            UPDATE recipes SET
                name = $1, description = $2, protocol = $3, molding = $4,
                yield_count = $5, total_cost = $6, stock = $7, updated_at = $8
            WHERE id = $9
            ",
        )
        .bind(name)
        .bind(&description)
        .bind(&protocol_json)
        .bind(&molding_json)
        .bind(i64::from(yield_count))
        .bind(total_cost)
        .bind(stock)
        .bind(now.to_rfc3339())
        .bind(recipe_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if let Some(ingredients) = &request.ingredients {
            sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
                .bind(recipe_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to replace ingredients: {e}")))?;

            insert_ingredients(&mut tx, recipe_id, ingredients).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit update: {e}")))?;

        // Return updated recipe
        self.get(recipe_id).await
    }

    /// Update only the stock field of a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn update_stock(&self, recipe_id: Uuid, stock: f64) -> AppResult<Option<Recipe>> {
        let result = sqlx::query(
            r"
            UPDATE recipes SET stock = $1, updated_at = $2
            WHERE id = $3
            ",
        )
        .bind(stock)
        .bind(Utc::now().to_rfc3339())
        .bind(recipe_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update stock: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(recipe_id).await
    }

    /// Delete a recipe; its ingredient lines cascade
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn delete(&self, recipe_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Insert ingredient lines for a recipe inside an open transaction
///
/// Fresh ids are assigned; the list order is recorded in `position`.
async fn insert_ingredients(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: Uuid,
    ingredients: &[Ingredient],
) -> AppResult<Vec<Ingredient>> {
    let mut persisted = Vec::with_capacity(ingredients.len());
    for (position, ingredient) in ingredients.iter().enumerate() {
        let ingredient_id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO ingredients (id, recipe_id, name, quantity, price, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(ingredient_id.to_string())
        .bind(recipe_id.to_string())
        .bind(&ingredient.name)
        .bind(ingredient.quantity)
        .bind(ingredient.price)
        .bind(i64::try_from(position).unwrap_or(i64::MAX))
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert ingredient: {e}")))?;

        persisted.push(Ingredient {
            id: Some(ingredient_id),
            name: ingredient.name.clone(),
            quantity: ingredient.quantity,
            price: ingredient.price,
        });
    }
    Ok(persisted)
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id_str: String = row.get("id");
    Ok(Ingredient {
        id: Some(
            Uuid::parse_str(&id_str)
                .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        ),
        name: row.get("name"),
        quantity: row.get("quantity"),
        price: row.get("price"),
    })
}

fn row_to_recipe(row: &SqliteRow, ingredients: Vec<Ingredient>) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let protocol_json: String = row.get("protocol");
    let molding_json: String = row.get("molding");
    let yield_count: i64 = row.get("yield_count");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let protocol: Vec<String> = serde_json::from_str(&protocol_json)?;
    let molding: Vec<String> = serde_json::from_str(&molding_json)?;

    Ok(Recipe {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        description: row.get("description"),
        ingredients,
        protocol,
        molding,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        yield_count: yield_count as u32,
        total_cost: row.get("total_cost"),
        stock: row.get("stock"),
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp: {e}")))
}
