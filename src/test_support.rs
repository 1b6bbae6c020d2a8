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

//! In-process stand-in for the Pi-hole `admin/api.php` group endpoints.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::{config::Config, pihole::PiholeClient, state::AppState};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub params: HashMap<String, String>,
}

#[derive(Default)]
struct Inner {
    members: Vec<String>,
    calls: Vec<RecordedCall>,
    mutations: Vec<(String, String)>,
    malformed: bool,
    failing: bool,
    failing_writes: bool,
}

#[derive(Serialize)]
struct Entry {
    ip: String,
    name: String,
}

type Shared = Arc<Mutex<Inner>>;

pub struct MockPihole {
    base_url: String,
    inner: Shared,
}

impl MockPihole {
    pub const API_KEY: &'static str = "test-key";
    pub const GROUP: &'static str = "3";

    pub async fn start(members: &[&str]) -> Self {
        let inner: Shared = Arc::new(Mutex::new(Inner {
            members: members.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }));

        let app = Router::new()
            .route("/admin/api.php", get(api).post(api))
            .with_state(inner.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            inner,
        }
    }

    pub fn config(&self) -> Config {
        self.config_with_key(Self::API_KEY)
    }

    pub fn config_with_key(&self, key: &str) -> Config {
        let base_url = self.base_url.clone();
        let key = key.to_string();
        Config::from_lookup(move |name| match name {
            "PIHOLE_URL" => Some(base_url.clone()),
            "PIHOLE_API_KEY" => Some(key.clone()),
            "PIHOLE_GROUP" => Some(Self::GROUP.to_string()),
            _ => None,
        })
    }

    pub fn client(&self) -> PiholeClient {
        PiholeClient::new(Client::new(), &self.config())
    }

    pub fn client_with_key(&self, key: &str) -> PiholeClient {
        PiholeClient::new(Client::new(), &self.config_with_key(key))
    }

    pub fn state(&self, config: Config) -> AppState {
        AppState::new(Client::new(), Arc::new(config))
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Accepted `(action, client_ip)` mutations, in order.
    pub fn mutations(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().mutations.clone()
    }

    pub fn set_malformed(&self, malformed: bool) {
        self.inner.lock().unwrap().malformed = malformed;
    }

    /// Makes every request answer `500`.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    /// Makes only `POST` requests answer `500`; reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.inner.lock().unwrap().failing_writes = failing;
    }
}

async fn api(
    State(inner): State<Shared>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut inner = inner.lock().unwrap();
    inner.calls.push(RecordedCall {
        method: method.to_string(),
        params: params.clone(),
    });

    if inner.failing || (inner.failing_writes && method == Method::POST) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if params.get("auth").map(String::as_str) != Some(MockPihole::API_KEY)
        || params.get("group_id").map(String::as_str) != Some(MockPihole::GROUP)
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let action = params.get("action").map(String::as_str).unwrap_or("");
    match (method, action) {
        (Method::GET, "list_clients") => {
            if inner.malformed {
                return (
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"{"error":"unexpected"}"#,
                )
                    .into_response();
            }
            let entries: Vec<Entry> = inner
                .members
                .iter()
                .map(|ip| Entry {
                    ip: ip.clone(),
                    name: String::new(),
                })
                .collect();
            Json(entries).into_response()
        }
        (Method::POST, "add_client" | "remove_client") => {
            let Some(ip) = params.get("client_ip").cloned() else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            if action == "add_client" {
                if !inner.members.contains(&ip) {
                    inner.members.push(ip.clone());
                }
            } else {
                inner.members.retain(|m| m != &ip);
            }
            inner.mutations.push((action.to_string(), ip));
            StatusCode::OK.into_response()
        }
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// A config pointing at a local port nothing listens on.
pub async fn closed_port_config() -> Config {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    Config::from_lookup(move |name| match name {
        "PIHOLE_URL" => Some(format!("http://{}", addr)),
        "PIHOLE_API_KEY" => Some(MockPihole::API_KEY.to_string()),
        "PIHOLE_GROUP" => Some(MockPihole::GROUP.to_string()),
        _ => None,
    })
}
