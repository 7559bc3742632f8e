// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static tables backing the installer settings page.
//!
//! Countries and timezones are embedded data files; keyboard layouts
//! are the set the target installer accepts. Locale detection is best
//! effort and falls back to US/Eastern defaults.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

/// Keyboard layouts the installer accepts as `global.keyboard`.
pub const KEYBOARDS: &[&str] = &[
    "de", "de-ch", "dk", "en-gb", "en-us", "es", "fi", "fr", "fr-be", "fr-ca", "fr-ch", "hu",
    "is", "it", "jp", "lt", "mk", "nl", "no", "pl", "pt", "pt-br", "se", "si", "tr",
];

static TZ_DATA: &str = include_str!("../data/timezones.txt");
static COUNTRY_DATA: &str = include_str!("../data/countries.txt");

pub fn timezones() -> &'static [&'static str] {
    static CELL: OnceLock<Vec<&'static str>> = OnceLock::new();
    CELL.get_or_init(|| TZ_DATA.split_whitespace().collect())
}

/// ISO 3166 alpha-2 code to display name, from `CODE: Name` lines.
pub fn countries() -> &'static BTreeMap<&'static str, &'static str> {
    static CELL: OnceLock<BTreeMap<&'static str, &'static str>> = OnceLock::new();
    CELL.get_or_init(|| {
        COUNTRY_DATA
            .lines()
            .filter_map(|line| {
                let (code, name) = line.split_once(':')?;
                let code = code.trim();
                let name = name.trim();
                (!code.is_empty() && !name.is_empty()).then_some((code, name))
            })
            .collect()
    })
}

/// Country code from the session locale (`LC_ALL`/`LANG`, e.g.
/// `en_US.UTF-8` -> `us`), defaulting to `us`.
pub fn current_country() -> String {
    locale_country(
        &std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_default(),
    )
    .unwrap_or_else(|| "us".to_string())
}

fn locale_country(locale: &str) -> Option<String> {
    let base = locale.split('.').next()?;
    let (_, country) = base.split_once('_')?;
    let country = country.trim();
    (country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| country.to_ascii_lowercase())
}

/// Host timezone from /etc/timezone, falling back to the locale's
/// country and then to America/New_York.
pub fn current_timezone() -> String {
    if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
        let tz = tz.trim();
        if timezones().contains(&tz) {
            return tz.to_string();
        }
    }
    let country = current_country().to_ascii_uppercase();
    for tz in timezones() {
        if tz.ends_with(&format!("/{country}")) {
            return (*tz).to_string();
        }
    }
    "America/New_York".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerSettings {
    pub countries: &'static BTreeMap<&'static str, &'static str>,
    pub keyboards: &'static [&'static str],
    pub timezones: &'static [&'static str],
    pub current_country: String,
    pub current_timezone: String,
}

pub fn installer_settings() -> InstallerSettings {
    InstallerSettings {
        countries: countries(),
        keyboards: KEYBOARDS,
        timezones: timezones(),
        current_country: current_country(),
        current_timezone: current_timezone(),
    }
}

#[cfg(test)]
#[path = "installer_data_tests.rs"]
mod tests;
