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

use crate::utils::escape_html;

/// Renders the status page for `client_ip`.
///
/// The form posts back to `/` with the action that flips the current state.
pub fn render(client_ip: &str, in_group: bool) -> String {
    let (status, action, label) = if in_group {
        (
            "Adblocking is enabled for your device.",
            "leave",
            "Disable Adblocking",
        )
    } else {
        (
            "Adblocking is disabled for your device.",
            "join",
            "Enable Adblocking",
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Adblocking Management</title>
</head>
<body>
    <h1>Adblocking Management</h1>
    <p>Your IP: {ip}</p>
    <p>Status: {status}</p>
    <form method="POST">
        <button type="submit" name="action" value="{action}">{label}</button>
    </form>
</body>
</html>
"#,
        ip = escape_html(client_ip),
    )
}
