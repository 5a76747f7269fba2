// ABOUTME: HTTP server assembly and shared resource container
// ABOUTME: Builds the axum router with middleware layers and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! # HTTP Server Module
//!
//! Shared resource container and server assembly. `ServerResources` holds
//! the expensive shared objects (database pool, configuration) behind Arcs
//! so route handlers never recreate them.

use crate::config::ServerConfig;
use crate::database::Database;
use crate::routes::{calculator::CalculatorRoutes, health::HealthRoutes, recipes::RecipesRoutes};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    pub database: Arc<Database>,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        Self {
            database: Arc::new(database),
            config,
        }
    }
}

/// HTTP server over the assembled routes
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a new HTTP server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Assemble the full application router
    #[must_use]
    pub fn router(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .merge(RecipesRoutes::routes(resources.clone()))
            .merge(CalculatorRoutes::routes(resources.clone()))
            .merge(HealthRoutes::routes(resources))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Bind and serve until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if binding the listener or serving fails
    pub async fn serve(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.resources.config.bind_address, self.resources.config.http_port
        );
        let listener = TcpListener::bind(&addr).await?;
        info!("HTTP server listening on {addr}");

        let router = Self::router(self.resources);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
