// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bootstrap networking for the discovery environment.
//!
//! The installer boots with no network configured; the agent gives the
//! chosen interface a fixed address, default route, and resolver so the
//! single discovery callback can reach the answer server. Command
//! semantics are the kernel's; we only invoke them.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::info;

pub const BOOTSTRAP_CIDR: &str = "192.168.1.100/24";
pub const BOOTSTRAP_GATEWAY: &str = "192.168.1.1";
pub const BOOTSTRAP_DNS: &str = "1.1.1.1";

#[derive(Debug, Error)]
pub enum NetupError {
    #[error("`{cmd}` exited with {status}")]
    CommandFailed { cmd: String, status: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn bring_up(interface: &str) -> Result<(), NetupError> {
    run("ip", &["addr", "add", BOOTSTRAP_CIDR, "dev", interface]).await?;
    run("ip", &["link", "set", interface, "up"]).await?;
    run("ip", &["route", "add", "default", "via", BOOTSTRAP_GATEWAY, "dev", interface]).await?;
    tokio::fs::write("/etc/resolv.conf", format!("nameserver {BOOTSTRAP_DNS}\n")).await?;
    info!(interface, address = BOOTSTRAP_CIDR, "bootstrap network up");
    Ok(())
}

async fn run(program: &str, args: &[&str]) -> Result<(), NetupError> {
    let status = Command::new(program).args(args).stdin(Stdio::null()).status().await?;
    if !status.success() {
        return Err(NetupError::CommandFailed {
            cmd: format!("{program} {}", args.join(" ")),
            status: status.to_string(),
        });
    }
    Ok(())
}
