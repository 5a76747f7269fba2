// ABOUTME: Main library entry point for the chocolatier recipe and costing service
// ABOUTME: Provides recipe CRUD storage and the tablet scaling/costing engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

#![deny(unsafe_code)]

//! # Chocolatier
//!
//! A recipe-management service for diabetic-friendly chocolate confections.
//! Recipes carry an ingredient list (grams and per-kilogram prices), a
//! fabrication protocol, and a yield; the service scales any recipe to the
//! canonical tablet formats (mini 5 g, normal 100 g) and derives per-unit
//! and production costs.
//!
//! ## Architecture
//!
//! - **Models**: `Recipe` and `Ingredient` domain types
//! - **Scaling**: the pure tablet scaling and costing engine
//! - **Database**: SQLite-backed recipe store with cascade-deleted ingredients
//! - **Routes**: REST API for recipe CRUD, stock updates, and production estimates
//! - **Config**: environment-driven server configuration

/// Environment-based server configuration
pub mod config;

/// Application constants and validation messages
pub mod constants;

/// SQLite persistence layer for recipes and ingredients
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Common data models for recipes and ingredients
pub mod models;

/// HTTP routes for recipe CRUD, production estimates, and health checks
pub mod routes;

/// Tablet scaling and costing engine
pub mod scaling;

/// HTTP server assembly and shared resources
pub mod server;
