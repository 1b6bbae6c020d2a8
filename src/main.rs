/*
 * Copyright (C) 2025 Jakub Žitník
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 */

mod config;
mod error;
mod handlers;
mod page;
mod pihole;
mod state;
#[cfg(test)]
mod test_support;
mod utils;

use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(Config::from_env());

    let missing = config.missing_upstream_settings();
    if !missing.is_empty() {
        tracing::warn!(
            "Missing {}; every device will be reported as not in the group",
            missing.join(", ")
        );
    }

    let client = Client::builder()
        .build()
        .expect("Failed to build reqwest client");

    let state = AppState::new(client, config.clone());
    let app = handlers::router(state);

    let addr_str = format!("0.0.0.0:{}", config.port);
    let addr: SocketAddr = addr_str
        .parse()
        .expect("Invalid address/port configuration");

    tracing::info!("Server running at http://{}", addr);
    tracing::info!(
        "Managing group {} on {}",
        config.group,
        config.pihole_url
    );
    if !config.trust_forwarded_for {
        tracing::info!("Ignoring X-Forwarded-For; using peer addresses");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}
