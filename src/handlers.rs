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

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    Form, Router,
    extract::{ConnectInfo, FromRequestParts, State, rejection::FormRejection},
    http::request::Parts,
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{page, state::AppState, utils};

/// Builds the router serving the status page and the toggle form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status_page).post(toggle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Address of the caller, as resolved by [`utils::resolve_client_ip`].
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientIp(utils::resolve_client_ip(
            &parts.headers,
            peer,
            state.config.trust_forwarded_for,
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Join,
    Leave,
}

impl Action {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "join" => Some(Action::Join),
            "leave" => Some(Action::Leave),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub action: Option<String>,
}

/// `GET /` shows the caller's current status.
pub async fn status_page(State(state): State<AppState>, ClientIp(ip): ClientIp) -> Html<String> {
    let in_group = state.pihole.is_member(&ip).await;
    tracing::info!("Status for {}: in_group={}", ip, in_group);

    Html(page::render(&ip, in_group))
}

/// `POST /` joins or leaves the group, then shows the resulting status.
///
/// The upstream is only written when the requested state differs from the
/// current one. Anything other than `join`/`leave` leaves membership alone.
pub async fn toggle(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    form: Result<Form<ToggleForm>, FormRejection>,
) -> Html<String> {
    let action = match form {
        Ok(Form(form)) => form.action.as_deref().and_then(Action::parse),
        Err(e) => {
            tracing::debug!("Ignoring undecodable form from {}: {}", ip, e);
            None
        }
    };

    let in_group = state.pihole.is_member(&ip).await;

    match action {
        Some(Action::Join) if !in_group => {
            tracing::info!("Adding {} to group {}", ip, state.config.group);
            state.pihole.set_membership(&ip, true).await;
        }
        Some(Action::Leave) if in_group => {
            tracing::info!("Removing {} from group {}", ip, state.config.group);
            state.pihole.set_membership(&ip, false).await;
        }
        _ => {}
    }

    let in_group = state.pihole.is_member(&ip).await;
    Html(page::render(&ip, in_group))
}
