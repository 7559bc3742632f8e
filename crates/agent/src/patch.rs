// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Self-contained discovery variant: patch a local answer file.
//!
//! Replaces the MAC filter and disk list lines of an already-rendered
//! answer file with the hardware selected on this boot. Textual,
//! line-exact substitution keeps the rest of the file byte-identical.
//! A missing file is a warning, not a failure; the installer then runs
//! with whatever the image shipped.

use std::io;
use std::path::Path;

use kiln_core::{mac_filter_expression, DiscoveredHardware};
use tracing::{info, warn};

const MAC_FILTER_KEY: &str = "filter.ID_NET_NAME_MAC";
const DISK_LIST_KEY: &str = "disk-list";

pub fn patch_answer_file(path: &Path, hardware: &DiscoveredHardware) -> io::Result<()> {
    if !path.exists() {
        warn!(path = %path.display(), "answer file absent, nothing to patch");
        return Ok(());
    }
    let text = std::fs::read_to_string(path)?;
    let patched = patch_answer_text(&text, hardware);
    std::fs::write(path, patched)?;
    info!(path = %path.display(), disk = %hardware.disk_path, mac = %hardware.nic_mac, "answer file patched");
    Ok(())
}

fn patch_answer_text(text: &str, hardware: &DiscoveredHardware) -> String {
    let mut lines: Vec<String> = text
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if is_assignment(trimmed, MAC_FILTER_KEY) {
                format!("{MAC_FILTER_KEY} = \"{}\"", mac_filter_expression(&hardware.nic_mac))
            } else if is_assignment(trimmed, DISK_LIST_KEY) {
                format!("{DISK_LIST_KEY} = [\"{}\"]", hardware.disk_path)
            } else {
                line.to_string()
            }
        })
        .collect();
    if text.ends_with('\n') {
        lines.push(String::new());
    }
    lines.join("\n")
}

fn is_assignment(line: &str, key: &str) -> bool {
    line.strip_prefix(key).is_some_and(|rest| rest.trim_start().starts_with('='))
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
