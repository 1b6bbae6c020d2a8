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

use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a call to the Pi-hole admin API.
///
/// Wrapped `reqwest` errors have their URL stripped, since the query string
/// carries the API key.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Invalid Pi-hole URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Pi-hole request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Pi-hole responded with status {0}")]
    Status(StatusCode),

    #[error("Unexpected Pi-hole response: {0}")]
    Malformed(reqwest::Error),
}

impl UpstreamError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    pub fn malformed(err: reqwest::Error) -> Self {
        Self::Malformed(err.without_url())
    }
}
