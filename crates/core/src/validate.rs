// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration validation.
//!
//! Pure functions over [`InstallConfig`]: either a normalized
//! [`ValidConfig`] comes back, or a map of field name to error message.
//! Nothing here touches the filesystem or network.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use thiserror::Error;

use crate::config::{InstallConfig, NetworkConfig, NetworkSource, ValidConfig};

/// Minimum password length before the entropy estimate is even computed.
pub const MIN_PASSWORD_LEN: usize = 12;

/// Entropy acceptance threshold in bits.
pub const MIN_PASSWORD_ENTROPY_BITS: f64 = 80.0;

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, msg) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

impl ValidationErrors {
    fn new() -> Self {
        Self(BTreeMap::new())
    }

    fn push(&mut self, field: &str, msg: impl Into<String>) {
        self.0.insert(field.to_string(), msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validate a submission, returning a normalized config or field errors.
///
/// Normalization clears the static network fields when the source is
/// DHCP, so the DHCP invariant holds on the output regardless of what
/// the submitter sent alongside.
pub fn validate(mut config: InstallConfig) -> Result<ValidConfig, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(msg) = validate_fqdn(&config.identity.fqdn) {
        errors.push("fqdn", msg);
    }
    if let Err(msg) = validate_email(&config.identity.mailto) {
        errors.push("mailto", msg);
    }
    for (field, value) in [
        ("country", &config.identity.country),
        ("timezone", &config.identity.timezone),
        ("keyboard", &config.identity.keyboard),
    ] {
        if value.trim().is_empty() {
            errors.push(field, "must not be empty");
        }
    }
    if let Err(msg) = validate_password_hash(&config.identity.root_password_hashed) {
        errors.push("root-password-hashed", msg);
    }

    match validate_network(&config.network) {
        Ok(network) => config.network = network,
        Err(network_errors) => {
            for (field, msg) in network_errors.0 {
                errors.0.insert(field, msg);
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidConfig::new(config))
    } else {
        Err(errors)
    }
}

/// RFC-1123 style host name check: labels of alphanumerics and inner
/// hyphens, each at most 63 chars, at least two labels, 253 total.
pub fn validate_fqdn(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if s.len() > 253 {
        return Err("must be at most 253 characters".to_string());
    }
    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return Err("must be a fully qualified domain name".to_string());
    }
    for label in labels {
        if label.is_empty() || label.len() > 63 {
            return Err("labels must be 1-63 characters".to_string());
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("invalid character in label '{label}'"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{label}' must not start or end with '-'"));
        }
    }
    Ok(())
}

/// Minimal `local@domain.tld` shape check.
pub fn validate_email(s: &str) -> Result<(), String> {
    let Some((local, domain)) = s.split_once('@') else {
        return Err("must contain '@'".to_string());
    };
    if local.is_empty() {
        return Err("missing local part".to_string());
    }
    if domain.is_empty() || !domain.contains('.') && domain != "localhost" {
        return Err("invalid mail domain".to_string());
    }
    Ok(())
}

/// Coarse password-strength gate.
///
/// Rejects passwords shorter than [`MIN_PASSWORD_LEN`]. Otherwise
/// computes `entropy = len(pw) * log2(pool)` where `pool` sums fixed
/// per-class weights for every character class observed in the
/// password: digits 10, lowercase 26, uppercase 26, special 20.
/// Accepts iff entropy exceeds [`MIN_PASSWORD_ENTROPY_BITS`].
///
/// This is a pool-size estimator, not a measurement of randomness;
/// the formula is fixed and intentionally coarse.
pub fn validate_password(pw: &str) -> Result<(), String> {
    if pw.len() < MIN_PASSWORD_LEN {
        return Err(format!("must be at least {MIN_PASSWORD_LEN} characters"));
    }
    let entropy = password_entropy(pw);
    if entropy > MIN_PASSWORD_ENTROPY_BITS {
        Ok(())
    } else {
        Err(format!(
            "entropy {entropy:.1} bits is below the {MIN_PASSWORD_ENTROPY_BITS} bit threshold"
        ))
    }
}

/// `len(pw) * log2(pool)` with the fixed per-class pool weights.
pub fn password_entropy(pw: &str) -> f64 {
    let mut digits = false;
    let mut lower = false;
    let mut upper = false;
    let mut special = false;
    for c in pw.chars() {
        if c.is_ascii_digit() {
            digits = true;
        } else if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else {
            special = true;
        }
    }
    let pool = [(digits, 10u32), (lower, 26), (upper, 26), (special, 20)]
        .iter()
        .filter(|(seen, _)| *seen)
        .map(|(_, weight)| weight)
        .sum::<u32>();
    if pool == 0 {
        return 0.0;
    }
    pw.chars().count() as f64 * f64::from(pool).log2()
}

/// Shape check for a client-side sha512-crypt hash (`$6$...`).
fn validate_password_hash(hash: &str) -> Result<(), String> {
    if hash.is_empty() {
        return Err("must not be empty".to_string());
    }
    if !hash.starts_with("$6$") {
        return Err("must be a sha512-crypt hash (hash client-side, never send plaintext)".to_string());
    }
    Ok(())
}

/// Validate the network section, returning a normalized copy.
///
/// DHCP is always valid and comes back with the static fields cleared.
/// A static config requires cidr, gateway, and dns; the gateway must lie
/// in the network defined by the CIDR under its prefix mask.
pub fn validate_network(cfg: &NetworkConfig) -> Result<NetworkConfig, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if cfg.source == NetworkSource::Dhcp {
        let mut cleared = NetworkConfig::dhcp();
        cleared.mac_filter = cfg.mac_filter.clone();
        return Ok(cleared);
    }

    let parsed_cidr = match cfg.cidr.as_deref() {
        None | Some("") => {
            errors.push("cidr", "required when source is from-answer");
            None
        }
        Some(cidr) => match parse_cidr(cidr) {
            Ok(parsed) => Some(parsed),
            Err(msg) => {
                errors.push("cidr", msg);
                None
            }
        },
    };

    let gateway = match cfg.gateway.as_deref() {
        None | Some("") => {
            errors.push("gateway", "required when source is from-answer");
            None
        }
        Some(gw) => match gw.parse::<Ipv4Addr>() {
            Ok(addr) => Some(addr),
            Err(_) => {
                errors.push("gateway", format!("invalid IPv4 address '{gw}'"));
                None
            }
        },
    };

    if let (Some((network, prefix)), Some(gw)) = (parsed_cidr, gateway) {
        let mask = prefix_mask(prefix);
        if u32::from(network) & mask != u32::from(gw) & mask {
            errors.push(
                "gateway",
                format!("{gw} is not in the network defined by the cidr"),
            );
        }
    }

    match cfg.dns.as_deref() {
        None | Some("") => errors.push("dns", "required when source is from-answer"),
        Some(dns) => {
            let mut seen = Vec::new();
            for entry in dns.split(',') {
                let entry = entry.trim();
                if entry.parse::<Ipv4Addr>().is_err() {
                    errors.push("dns", format!("invalid IPv4 address '{entry}'"));
                    break;
                }
                if seen.contains(&entry) {
                    errors.push("dns", format!("duplicate address '{entry}'"));
                    break;
                }
                seen.push(entry);
            }
        }
    }

    if errors.is_empty() {
        Ok(cfg.clone())
    } else {
        Err(errors)
    }
}

/// Parse `a.b.c.d[/prefix]` into (network address, prefix length).
///
/// A missing prefix defaults to /24; prefixes outside 0..=32 are
/// rejected.
pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, u8), String> {
    let (addr_part, prefix) = match cidr.split_once('/') {
        Some((addr, prefix_str)) => {
            let prefix: u8 = prefix_str
                .parse()
                .map_err(|_| format!("invalid prefix '{prefix_str}'"))?;
            if prefix > 32 {
                return Err(format!("prefix /{prefix} is out of range (0-32)"));
            }
            (addr, prefix)
        }
        None => (cidr, 24),
    };
    let addr = addr_part
        .parse::<Ipv4Addr>()
        .map_err(|_| format!("invalid IPv4 address '{addr_part}'"))?;
    Ok((addr, prefix))
}

/// Netmask for a prefix length, 32-bit unsigned arithmetic.
fn prefix_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        !0u32 << (32 - u32::from(prefix))
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
