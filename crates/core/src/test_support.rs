// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builders for tests in this crate and downstream crates.

use crate::config::{
    DiskSelection, IdentityConfig, InstallConfig, NetworkConfig, NetworkSource,
};

/// A sha512-crypt shaped hash for test identities.
pub const TEST_HASH: &str = "$6$rounds=656000$saltsalt$testhashtesthashtesthashtesthash";

/// Builder for [`InstallConfig`] with sensible valid defaults.
pub struct ConfigBuilder {
    fqdn: String,
    mailto: String,
    source: NetworkSource,
    cidr: Option<String>,
    gateway: Option<String>,
    dns: Option<String>,
    mac_filter: Option<String>,
    disk_list: Vec<String>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            fqdn: "host.example.com".to_string(),
            mailto: "root@localhost".to_string(),
            source: NetworkSource::Dhcp,
            cidr: None,
            gateway: None,
            dns: None,
            mac_filter: None,
            disk_list: Vec::new(),
        }
    }
}

impl ConfigBuilder {
    pub fn fqdn(mut self, v: impl Into<String>) -> Self {
        self.fqdn = v.into();
        self
    }

    pub fn mailto(mut self, v: impl Into<String>) -> Self {
        self.mailto = v.into();
        self
    }

    pub fn static_network(
        mut self,
        cidr: impl Into<String>,
        gateway: impl Into<String>,
        dns: impl Into<String>,
    ) -> Self {
        self.source = NetworkSource::FromAnswer;
        self.cidr = Some(cidr.into());
        self.gateway = Some(gateway.into());
        self.dns = Some(dns.into());
        self
    }

    pub fn mac_filter(mut self, v: impl Into<String>) -> Self {
        self.mac_filter = Some(v.into());
        self
    }

    pub fn disk(mut self, v: impl Into<String>) -> Self {
        self.disk_list.push(v.into());
        self
    }

    pub fn build(self) -> InstallConfig {
        InstallConfig {
            identity: IdentityConfig {
                fqdn: self.fqdn,
                mailto: self.mailto,
                country: "us".to_string(),
                timezone: "America/New_York".to_string(),
                keyboard: "us".to_string(),
                root_password_hashed: TEST_HASH.to_string(),
            },
            network: NetworkConfig {
                source: self.source,
                cidr: self.cidr,
                gateway: self.gateway,
                dns: self.dns,
                mac_filter: self.mac_filter,
            },
            disks: DiskSelection {
                disk_list: self.disk_list,
                ..DiskSelection::default()
            },
        }
    }
}
