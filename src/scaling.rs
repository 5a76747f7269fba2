// ABOUTME: Tablet scaling and costing engine for recipe production estimates
// ABOUTME: Pure functions converting a reference batch into per-format quantities and costs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! # Scaling and Costing Engine
//!
//! Pure, stateless calculations over a recipe's reference ingredient list.
//! Every surface that needs scaled quantities or costs goes through this
//! module; the arithmetic lives nowhere else.
//!
//! A recipe stores its ingredients for a *reference batch* of arbitrary
//! total weight. [`normalize_to_mini`] rescales that batch to one mini
//! tablet (5 g); [`scale_for_format`] converts between the two canonical
//! tablet formats; [`calculate_production`] derives quantities and costs
//! for a production run.

use crate::constants::validation_messages;
use crate::errors::{AppError, AppResult};
use crate::models::Ingredient;
use serde::{Deserialize, Serialize};

/// Canonical mini tablet weight in grams
pub const MINI_TABLET_WEIGHT_G: f64 = 5.0;

/// Canonical normal tablet weight in grams
pub const NORMAL_TABLET_WEIGHT_G: f64 = 100.0;

/// One normal tablet equals this many mini tablets by mass
pub const CONVERSION_RATIO: f64 = NORMAL_TABLET_WEIGHT_G / MINI_TABLET_WEIGHT_G;

/// The two canonical production unit formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TabletFormat {
    /// 5 g mini tablet
    Mini,
    /// 100 g normal tablet
    #[default]
    Normal,
}

impl TabletFormat {
    /// Convert to wire string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mini => "mini",
            Self::Normal => "normal",
        }
    }

    /// Parse from wire string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mini" => Some(Self::Mini),
            "normal" => Some(Self::Normal),
            _ => None,
        }
    }

    /// Unit weight in grams for this format
    #[must_use]
    pub const fn unit_weight_g(&self) -> f64 {
        match self {
            Self::Mini => MINI_TABLET_WEIGHT_G,
            Self::Normal => NORMAL_TABLET_WEIGHT_G,
        }
    }

    /// Quantity multiplier relative to the mini-normalized list
    #[must_use]
    pub const fn conversion_factor(&self) -> f64 {
        match self {
            Self::Mini => 1.0,
            Self::Normal => CONVERSION_RATIO,
        }
    }
}

/// One ingredient line of a production run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionLine {
    /// Ingredient label
    pub name: String,
    /// Grams needed for the whole run
    pub quantity: f64,
    /// Cost of this line for the whole run
    pub cost: f64,
}

/// Quantities and costs for a production run of one recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// Unit format of the run
    pub format: TabletFormat,
    /// Number of units produced
    pub unit_count: u32,
    /// Per-ingredient quantities and costs
    pub lines: Vec<ProductionLine>,
    /// Total ingredient cost of the run
    pub total_cost: f64,
}

/// Rescale a reference ingredient list to one mini tablet (5 g total)
///
/// Names and per-kilogram prices are unchanged; quantities are multiplied
/// by `5 / T` where `T` is the reference batch's total weight.
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::DegenerateInput`] when the reference
/// list is empty or sums to zero weight, which would make the scale factor
/// undefined.
pub fn normalize_to_mini(ingredients: &[Ingredient]) -> AppResult<Vec<Ingredient>> {
    let total_weight: f64 = ingredients.iter().map(|i| i.quantity).sum();
    if total_weight <= 0.0 {
        return Err(AppError::degenerate_input(
            "reference batch has zero total weight",
        ));
    }

    let scale_factor = MINI_TABLET_WEIGHT_G / total_weight;
    Ok(ingredients
        .iter()
        .map(|i| Ingredient {
            quantity: i.quantity * scale_factor,
            ..i.clone()
        })
        .collect())
}

/// Convert a mini-normalized list to the requested tablet format
///
/// Identity for [`TabletFormat::Mini`]; multiplies every quantity by
/// [`CONVERSION_RATIO`] for [`TabletFormat::Normal`], so the result sums to
/// the format's unit weight.
#[must_use]
pub fn scale_for_format(mini_ingredients: &[Ingredient], format: TabletFormat) -> Vec<Ingredient> {
    let factor = format.conversion_factor();
    mini_ingredients
        .iter()
        .map(|i| Ingredient {
            quantity: i.quantity * factor,
            ..i.clone()
        })
        .collect()
}

/// Total ingredient cost of a list: gram quantities times per-kilogram prices
#[must_use]
pub fn cost_of(ingredients: &[Ingredient]) -> f64 {
    ingredients
        .iter()
        .map(|i| i.quantity * i.price / 1000.0)
        .sum()
}

/// Derive quantities and costs for producing `unit_count` tablets
///
/// `base_ingredients` must be the mini-normalized list (the output of
/// [`normalize_to_mini`]). Each quantity is multiplied by the format's
/// conversion factor and the unit count; line costs follow the same
/// grams-times-price-per-kilogram rule as [`cost_of`].
///
/// # Errors
///
/// Returns a validation error when `unit_count` is zero.
pub fn calculate_production(
    base_ingredients: &[Ingredient],
    format: TabletFormat,
    unit_count: u32,
) -> AppResult<ProductionPlan> {
    if unit_count == 0 {
        return Err(
            AppError::invalid_input(validation_messages::MIN_PRODUCTION_QUANTITY).with_details(
                serde_json::json!({
                    "fields": [{"field": "quantity", "message": validation_messages::MIN_PRODUCTION_QUANTITY}]
                }),
            ),
        );
    }

    let run_factor = format.conversion_factor() * f64::from(unit_count);
    let lines: Vec<ProductionLine> = base_ingredients
        .iter()
        .map(|i| {
            let quantity = i.quantity * run_factor;
            ProductionLine {
                name: i.name.clone(),
                quantity,
                cost: quantity * i.price / 1000.0,
            }
        })
        .collect();
    let total_cost = lines.iter().map(|line| line.cost).sum();

    Ok(ProductionPlan {
        format,
        unit_count,
        lines,
        total_cost,
    })
}
