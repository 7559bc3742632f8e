// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot-time device discovery intake.
//!
//! Machines booting the installer image report the disk and management
//! NIC they selected. Each report re-renders an answer file from the
//! base configuration, patched with the reporter's MAC filter and disk
//! list, and caches it keyed by MAC. The installer later fetches that
//! answer by posting its interface list.

use std::collections::HashMap;

use kiln_core::{
    mac_filter_expression, render_answer, validate, InstallConfig, RenderError, ValidationErrors,
};
use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// A syntactically valid sha512-crypt hash with no known preimage.
/// Installs from the built-in base config come up with root login
/// disabled until the password is reset through the console.
const LOCKED_ROOT_HASH: &str =
    "$6$kilnlocked$xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery report carried no management MAC")]
    MissingMac,

    #[error("base configuration is invalid: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One report from a booting machine.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryReport {
    pub disk: String,
    pub mgmt_nic: String,
    #[serde(default)]
    pub mgmt_mac: Option<String>,
}

/// Answer-file cache keyed by normalized (lowercased) MAC.
pub struct DiscoveryRegistry {
    base: InstallConfig,
    answers: Mutex<HashMap<String, String>>,
}

impl DiscoveryRegistry {
    pub fn new(base: InstallConfig) -> Self {
        Self { base, answers: Mutex::new(HashMap::new()) }
    }

    /// Record a report: patch the base config with the reporter's MAC
    /// and disk, render, and cache. A repeated report re-renders.
    pub fn record(&self, report: &DiscoveryReport) -> Result<(), DiscoveryError> {
        let mac = report
            .mgmt_mac
            .as_deref()
            .map(normalize_mac)
            .ok_or(DiscoveryError::MissingMac)?;

        let mut config = self.base.clone();
        config.network.mac_filter = Some(mac_filter_expression(&mac));
        config.disks.disk_list = vec![report.disk.clone()];

        let valid = validate(config)?;
        let answer = render_answer(&valid)?;
        info!(mac = %mac, nic = %report.mgmt_nic, disk = %report.disk, "discovery report cached");
        self.answers.lock().insert(mac, answer);
        Ok(())
    }

    /// Cached answer file for a MAC, if a report has been seen.
    pub fn answer_for(&self, mac: &str) -> Option<String> {
        self.answers.lock().get(&normalize_mac(mac)).cloned()
    }
}

impl Default for DiscoveryRegistry {
    fn default() -> Self {
        Self::new(default_answer_config())
    }
}

fn normalize_mac(mac: &str) -> String {
    mac.trim().to_ascii_lowercase()
}

/// Base configuration for discovered machines: DHCP networking and a
/// locked root account; MAC filter and disk list come from the report.
pub fn default_answer_config() -> InstallConfig {
    use kiln_core::{DiskSelection, IdentityConfig, NetworkConfig};

    InstallConfig {
        identity: IdentityConfig {
            fqdn: "node.kiln.internal".to_string(),
            mailto: "root@localhost".to_string(),
            country: "us".to_string(),
            timezone: "America/New_York".to_string(),
            keyboard: "en-us".to_string(),
            root_password_hashed: LOCKED_ROOT_HASH.to_string(),
        },
        network: NetworkConfig::dhcp(),
        disks: DiskSelection::default(),
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
