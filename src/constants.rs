// ABOUTME: System-wide constants and configuration defaults for the chocolatier service
// ABOUTME: Contains service identity, port/database defaults, and validation messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! # Constants Module
//!
//! Application constants and environment-based configuration defaults.

/// Service identity constants
pub mod service_names {
    /// Canonical service name used in logs and health responses
    pub const CHOCOLATIER_SERVER: &str = "chocolatier-server";

    /// Server version from Cargo.toml
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Default configuration values, overridable via environment variables
pub mod defaults {
    /// Default HTTP API port
    pub const HTTP_PORT: u16 = 8081;

    /// Default bind address
    pub const BIND_ADDRESS: &str = "127.0.0.1";

    /// Default SQLite database URL
    pub const DATABASE_URL: &str = "sqlite:data/chocolatier.db";
}

/// Per-field validation messages surfaced in structured validation errors
pub mod validation_messages {
    /// Recipe name must be non-empty
    pub const REQUIRED_NAME: &str = "name is required";

    /// Yield must be at least one mini-tablet unit
    pub const MIN_YIELD: &str = "yield must be at least 1";

    /// Stock cannot go negative
    pub const MIN_STOCK: &str = "stock cannot be negative";

    /// Ingredient name must be non-empty
    pub const REQUIRED_INGREDIENT_NAME: &str = "ingredient name is required";

    /// Ingredient quantity cannot be negative
    pub const MIN_QUANTITY: &str = "quantity cannot be negative";

    /// Ingredient price cannot be negative
    pub const MIN_PRICE: &str = "price cannot be negative";

    /// Protocol steps must be non-empty text
    pub const REQUIRED_PROTOCOL_STEP: &str = "protocol steps cannot be empty";

    /// Production quantity must be at least one unit
    pub const MIN_PRODUCTION_QUANTITY: &str = "quantity must be at least 1";

    /// Tablet format must be one of the known formats
    pub const UNKNOWN_TABLET_FORMAT: &str = "format must be \"mini\" or \"normal\"";
}
