// ABOUTME: Route module organization for chocolatier HTTP endpoints
// ABOUTME: Provides route definitions organized by domain with thin handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! Route module for the chocolatier HTTP API
//!
//! Each domain module contains route definitions and thin handler functions
//! delegating to the store and the scaling engine.

/// Production estimate (cost calculator) routes
pub mod calculator;
/// Health check and system status routes
pub mod health;
/// Recipe CRUD and stock update routes
pub mod recipes;
