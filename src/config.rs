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

use std::env;

/// Configuration for the toggle server.
///
/// Built once at startup and shared read-only through [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct Config {
    /// The port to listen on.
    pub port: u16,
    /// Base URL of the Pi-hole admin interface, e.g. `http://192.168.1.100`.
    pub pihole_url: String,
    /// API key sent as the `auth` query parameter.
    pub api_key: String,
    /// Id of the group whose membership is toggled.
    pub group: String,
    /// Whether the `X-Forwarded-For` header identifies the client.
    /// Only safe behind a reverse proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Config {
    /// # Environment Variables
    /// * `PORT` - Port to listen on (default: 3000).
    /// * `PIHOLE_URL` - Base URL of the Pi-hole.
    /// * `PIHOLE_API_KEY` - Pi-hole API token.
    /// * `PIHOLE_GROUP` - Group id to add clients to.
    /// * `TRUST_FORWARDED_FOR` - Set to "false" or "0" to ignore `X-Forwarded-For`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Missing Pi-hole settings are left empty rather than rejected; the
    /// resulting upstream calls fail and are reported as "not a member".
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let pihole_url = lookup("PIHOLE_URL").unwrap_or_default();
        let api_key = lookup("PIHOLE_API_KEY").unwrap_or_default();
        let group = lookup("PIHOLE_GROUP").unwrap_or_default();

        let trust_forwarded_for = lookup("TRUST_FORWARDED_FOR")
            .map(|v| !(v == "false" || v == "0"))
            .unwrap_or(true);

        Self {
            port,
            pihole_url,
            api_key,
            group,
            trust_forwarded_for,
        }
    }

    /// Names of the Pi-hole settings that were not provided.
    pub fn missing_upstream_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pihole_url.is_empty() {
            missing.push("PIHOLE_URL");
        }
        if self.api_key.is_empty() {
            missing.push("PIHOLE_API_KEY");
        }
        if self.group.is_empty() {
            missing.push("PIHOLE_GROUP");
        }
        missing
    }
}
