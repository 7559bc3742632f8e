// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Machine configuration as submitted for an ISO build.
//!
//! The wire shape mirrors the answer-file sections: `global`, `network`,
//! `disk-setup`. A submission is immutable once parsed; validation
//! produces a [`ValidConfig`] and from there the value is only read.

use serde::{Deserialize, Serialize};

/// Identity and locale settings (the `global` answer section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub fqdn: String,
    pub mailto: String,
    pub country: String,
    pub timezone: String,
    pub keyboard: String,
    /// sha512-crypt hash computed client-side. The plaintext never
    /// appears in this structure; entropy is checked before hashing
    /// via [`crate::validate::validate_password`].
    #[serde(rename = "root-password-hashed")]
    pub root_password_hashed: String,
}

/// Where the installed system gets its network configuration from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkSource {
    /// Configure via DHCP at install time.
    #[serde(rename = "from-dhcp", alias = "dhcp")]
    Dhcp,
    /// Static configuration taken from the answer file.
    #[serde(rename = "from-answer", alias = "static")]
    FromAnswer,
}

crate::simple_display! {
    NetworkSource {
        Dhcp => "from-dhcp",
        FromAnswer => "from-answer",
    }
}

/// Network settings (the `network` answer section).
///
/// Invariant (enforced by validation): when `source` is DHCP the three
/// static fields are `None`; when `source` is FromAnswer all three are
/// present and the gateway lies inside the CIDR's network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub source: NetworkSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// One or more IPv4 resolver addresses, comma-separated on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
    /// Management NIC pin, e.g. `*a1b2c3d4e5f6`. Filled in by hardware
    /// discovery rather than the submitter.
    #[serde(
        rename = "filter.ID_NET_NAME_MAC",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mac_filter: Option<String>,
}

/// Filter expression pinning the management NIC by MAC.
///
/// The installer glob-matches the expression against the udev
/// `ID_NET_NAME_MAC` property, which carries the MAC without colon
/// separators: `aa:bb:cc:dd:ee:ff` becomes `*aabbccddeeff`.
pub fn mac_filter_expression(mac: &str) -> String {
    let mut expr = String::with_capacity(mac.len() + 1);
    expr.push('*');
    expr.extend(mac.chars().filter(|c| *c != ':').map(|c| c.to_ascii_lowercase()));
    expr
}

impl NetworkConfig {
    /// A DHCP config with all static fields cleared.
    pub fn dhcp() -> Self {
        Self {
            source: NetworkSource::Dhcp,
            cidr: None,
            gateway: None,
            dns: None,
            mac_filter: None,
        }
    }
}

/// Installation target disks (the `disk-setup` answer section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSelection {
    pub filesystem: String,
    #[serde(rename = "zfs.raid", default, skip_serializing_if = "Option::is_none")]
    pub zfs_raid: Option<String>,
    /// Device paths to install onto. Usually a single entry chosen by
    /// the discovery agent.
    #[serde(rename = "disk-list", default)]
    pub disk_list: Vec<String>,
}

impl Default for DiskSelection {
    fn default() -> Self {
        Self {
            filesystem: "zfs".to_string(),
            zfs_raid: Some("raid0".to_string()),
            disk_list: Vec::new(),
        }
    }
}

/// A full build submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    #[serde(rename = "global")]
    pub identity: IdentityConfig,
    pub network: NetworkConfig,
    #[serde(rename = "disk-setup", default)]
    pub disks: DiskSelection,
}

/// An [`InstallConfig`] that has passed [`crate::validate::validate`].
///
/// Construction is restricted to the validator so a `ValidConfig` can be
/// trusted downstream (renderer, orchestrator) without rechecking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidConfig(InstallConfig);

impl ValidConfig {
    pub(crate) fn new(config: InstallConfig) -> Self {
        Self(config)
    }

    pub fn identity(&self) -> &IdentityConfig {
        &self.0.identity
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.0.network
    }

    pub fn disks(&self) -> &DiskSelection {
        &self.0.disks
    }

    pub fn as_config(&self) -> &InstallConfig {
        &self.0
    }
}
