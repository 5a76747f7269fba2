// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database and server-resource creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::missing_errors_doc)]

//! Shared test utilities for `chocolatier`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use chocolatier::{
    config::{DatabaseConfig, Environment, LogLevel, ServerConfig},
    database::Database,
    server::ServerResources,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database with migrated schema
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new("sqlite::memory:").await
}

/// Test server configuration pointed at an in-memory database
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        bind_address: "127.0.0.1".into(),
        log_level: LogLevel::default(),
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
        },
    }
}

/// Standard test server resources over an in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        database,
        Arc::new(create_test_config()),
    )))
}
