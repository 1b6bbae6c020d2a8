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

use crate::{config::Config, pihole::PiholeClient};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Client for the Pi-hole admin API.
    pub pihole: PiholeClient,
    /// The application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self {
            pihole: PiholeClient::new(client, &config),
            config,
        }
    }
}
