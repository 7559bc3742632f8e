// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no state directory available (set KILN_STATE_DIR or HOME)")]
    NoStateDir,

    #[error("invalid KILN_HTTP_ADDR '{0}'")]
    BadHttpAddr(String),
}

/// Resolve state directory: KILN_STATE_DIR > XDG_STATE_HOME/kiln > ~/.local/state/kiln
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("KILN_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("kiln"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state/kiln"))
}

/// HTTP bind address (default 0.0.0.0:5000, the port the discovery
/// agent's callback targets).
pub fn http_addr() -> Result<SocketAddr, ConfigError> {
    let raw = std::env::var("KILN_HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    raw.parse().map_err(|_| ConfigError::BadHttpAddr(raw))
}

/// External image-construction tool invoked per job.
pub fn iso_tool() -> String {
    std::env::var("KILN_ISO_TOOL")
        .unwrap_or_else(|_| "proxmox-auto-install-assistant".to_string())
}

/// Watchdog for stalled builds (default 1 hour).
pub fn build_timeout() -> Duration {
    std::env::var("KILN_BUILD_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60 * 60))
}

/// Maximum concurrently active (non-terminal) jobs.
pub fn max_jobs() -> usize {
    std::env::var("KILN_MAX_JOBS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(5)
}

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/kiln)
    pub state_dir: PathBuf,
    /// Per-job artifact directories
    pub artifacts_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    pub http_addr: SocketAddr,
    pub iso_tool: String,
    pub build_timeout: Duration,
    pub max_jobs: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = state_dir()?;
        Ok(Self {
            artifacts_dir: state_dir.join("artifacts"),
            lock_path: state_dir.join("kilnd.pid"),
            log_path: state_dir.join("kilnd.log"),
            http_addr: http_addr()?,
            iso_tool: iso_tool(),
            build_timeout: build_timeout(),
            max_jobs: max_jobs(),
            state_dir,
        })
    }

    /// Test config rooted at a scratch directory.
    #[cfg(test)]
    pub fn for_dir(dir: &std::path::Path) -> Self {
        Self {
            state_dir: dir.to_path_buf(),
            artifacts_dir: dir.join("artifacts"),
            lock_path: dir.join("kilnd.pid"),
            log_path: dir.join("kilnd.log"),
            http_addr: ([127, 0, 0, 1], 0).into(),
            iso_tool: "true".to_string(),
            build_timeout: Duration::from_secs(5),
            max_jobs: 5,
        }
    }
}
