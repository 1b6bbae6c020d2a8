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

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Used when neither a forwarded header nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Determines the address of the client making the request.
///
/// Priority:
/// 1. `X-Forwarded-For` header, taken verbatim (when `trust_forwarded_for` is set).
/// 2. IP of the TCP peer.
/// 3. [`UNKNOWN_CLIENT`].
///
/// The header value is neither split on commas nor parsed as an IP, so a
/// multi-hop chain is used as one opaque string. Non-UTF-8 bytes are decoded
/// lossily. An empty header counts as absent.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .map(|h| String::from_utf8_lossy(h.as_bytes()))
            .filter(|v| !v.is_empty())
        {
            return forwarded.into_owned();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Escapes a value for use in HTML text or a quoted attribute.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
