// ABOUTME: Domain models for recipes and their ingredients
// ABOUTME: Recipe and Ingredient definitions shared by the store, engine, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! Common data models for recipes and ingredients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ingredient line of a recipe's reference batch
///
/// Quantities are grams in the reference batch; prices are per kilogram in
/// the local currency unit. The reference batch's total weight is whatever
/// the quantities sum to, not necessarily one of the tablet formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier (absent for not-yet-persisted ingredients)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Ingredient label
    pub name: String,
    /// Grams of this ingredient in the reference batch
    pub quantity: f64,
    /// Cost per kilogram in the local currency unit
    pub price: f64,
}

impl Ingredient {
    /// Create an unpersisted ingredient line
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            price,
        }
    }
}

/// A chocolate confection recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Recipe name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Ingredient lines of the reference batch, in stored order
    pub ingredients: Vec<Ingredient>,
    /// Ordered fabrication steps
    pub protocol: Vec<String>,
    /// Ordered molding labels (informational, unused in calculations)
    pub molding: Vec<String>,
    /// Number of mini-tablet units the reference batch is designed to produce
    #[serde(rename = "yield")]
    pub yield_count: u32,
    /// Denormalized total cost of the reference batch's ingredients
    pub total_cost: f64,
    /// Current inventory count of produced units
    pub stock: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
