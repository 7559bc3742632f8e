// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Answer-file rendering.
//!
//! Deterministic mapping from a validated configuration to the
//! installer's TOML answer document. Field order follows the config
//! struct declarations and absent optional fields are omitted, so the
//! same input always renders byte-identical output.

use thiserror::Error;

use crate::config::ValidConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("answer serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Render the `[global]` / `[network]` / `[disk-setup]` answer document.
pub fn render_answer(config: &ValidConfig) -> Result<String, RenderError> {
    let rendered = toml::to_string(config.as_config())?;
    Ok(unquote_dotted_keys(&rendered))
}

/// The TOML serializer quotes keys containing dots
/// (`"filter.ID_NET_NAME_MAC" = ...`); the installer expects them bare.
fn unquote_dotted_keys(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    for line in doc.lines() {
        match quoted_key(line) {
            Some((key, rest)) => {
                out.push_str(key);
                out.push_str(rest);
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

/// Split `"key" = value` into the bare key and the ` = value` remainder.
fn quoted_key(line: &str) -> Option<(&str, &str)> {
    let stripped = line.strip_prefix('"')?;
    let (key, rest) = stripped.split_once('"')?;
    if !rest.trim_start().starts_with('=') {
        return None;
    }
    Some((key, rest))
}

#[cfg(test)]
#[path = "answer_tests.rs"]
mod tests;
