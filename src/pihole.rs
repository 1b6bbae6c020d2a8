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

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{config::Config, error::UpstreamError};

/// Whether an IP is listed in the configured group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Member,
    NotMember,
}

impl Membership {
    pub fn is_member(self) -> bool {
        self == Membership::Member
    }
}

/// One entry of the `list_clients` response. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct GroupClient {
    ip: String,
}

/// Thin client over the Pi-hole `admin/api.php` group endpoints.
///
/// Every call goes to the appliance; nothing is cached between requests.
#[derive(Clone)]
pub struct PiholeClient {
    http: Client,
    endpoint: String,
    api_key: String,
    group: String,
}

impl PiholeClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            endpoint: format!("{}/admin/api.php", config.pihole_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            group: config.group.clone(),
        }
    }

    fn api_url(&self, action: &str, client_ip: Option<&str>) -> Result<Url, UpstreamError> {
        let mut params = vec![
            ("auth", self.api_key.as_str()),
            ("action", action),
            ("group_id", self.group.as_str()),
        ];
        if let Some(ip) = client_ip {
            params.push(("client_ip", ip));
        }
        Ok(Url::parse_with_params(&self.endpoint, &params)?)
    }

    /// Fetches the group's client list and checks for an exact `ip` match.
    pub async fn membership(&self, ip: &str) -> Result<Membership, UpstreamError> {
        let url = self.api_url("list_clients", None)?;

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let clients: Vec<GroupClient> = resp.json().await.map_err(|e| {
            if e.is_decode() {
                UpstreamError::malformed(e)
            } else {
                UpstreamError::transport(e)
            }
        })?;

        if clients.iter().any(|c| c.ip == ip) {
            Ok(Membership::Member)
        } else {
            Ok(Membership::NotMember)
        }
    }

    /// Like [`Self::membership`], but any failure reads as "not a member".
    pub async fn is_member(&self, ip: &str) -> bool {
        match self.membership(ip).await {
            Ok(m) => m.is_member(),
            Err(e) => {
                tracing::error!("Error checking group status for {}: {}", ip, e);
                false
            }
        }
    }

    /// Adds `ip` to the group when `join` is set, removes it otherwise.
    pub async fn update(&self, ip: &str, join: bool) -> Result<(), UpstreamError> {
        let action = if join { "add_client" } else { "remove_client" };
        let url = self.api_url(action, Some(ip))?;

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(UpstreamError::transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        Ok(())
    }

    /// Like [`Self::update`], returning `false` on failure.
    pub async fn set_membership(&self, ip: &str, join: bool) -> bool {
        match self.update(ip, join).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error toggling group membership for {}: {}", ip, e);
                false
            }
        }
    }
}
