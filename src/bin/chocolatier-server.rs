// ABOUTME: Server binary for the chocolatier recipe and costing service
// ABOUTME: Loads configuration, initializes logging and storage, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chocolatier Contributors

//! # Chocolatier Server Binary
//!
//! Starts the recipe-management HTTP API with SQLite storage.

use anyhow::Result;
use chocolatier::{
    config::ServerConfig,
    database::Database,
    logging,
    server::{HttpServer, ServerResources},
};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "chocolatier-server")]
#[command(about = "Chocolatier - recipe management and tablet costing API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Chocolatier server");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));
    HttpServer::new(resources).serve().await
}
