// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kiln-discover: boot-time hardware discovery.
//!
//! Runs once inside the freshly booted installer environment. A single
//! sequential pass with no retries: enumerate, select, then either
//! report over a bootstrap network link or patch a local answer file.
//! Every failure is terminal with a distinct exit code so the boot
//! scripts can tell what went wrong from the console log.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kiln_core::{select_disk, select_nic, DiscoveredHardware};
use thiserror::Error;
use tracing::{error, info};

mod netup;
mod patch;
mod report;
mod sysfs;

#[derive(Parser)]
#[command(name = "kiln-discover", about = "Boot-time hardware discovery for unattended installs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select hardware, bring up bootstrap networking, report to the
    /// answer server
    Report {
        /// Answer server as host:port
        #[arg(long)]
        server: String,
    },
    /// Self-contained variant: patch a local answer file in place
    Patch {
        /// Answer file to patch
        #[arg(long = "answer-file")]
        answer_file: PathBuf,
    },
}

#[derive(Debug, Error)]
enum AgentError {
    #[error("no disk satisfies the installation criteria")]
    NoDiskFound,

    #[error("no usable management interface found")]
    NoNicFound,

    #[error("network bootstrap failed: {0}")]
    NetworkSetup(netup::NetupError),

    #[error("discovery callback failed: {0}")]
    CallbackRejected(report::ReportError),

    #[error("hardware enumeration failed: {0}")]
    Enumeration(#[from] std::io::Error),
}

impl AgentError {
    fn exit_code(&self) -> u8 {
        match self {
            AgentError::NoDiskFound => 2,
            AgentError::NoNicFound => 3,
            AgentError::NetworkSetup(_) => 4,
            AgentError::CallbackRejected(_) => 5,
            AgentError::Enumeration(_) => 6,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Report { server } => report_strategy(&server).await,
        Command::Patch { answer_file } => patch_strategy(&answer_file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Enumeration root, overridable for fixtures and image debugging.
fn sysfs_root() -> PathBuf {
    std::env::var("KILN_SYSFS_ROOT").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/"))
}

async fn report_strategy(server: &str) -> Result<(), AgentError> {
    let hardware = discover(&sysfs::Sysfs::new(sysfs_root()))?;
    netup::bring_up(&hardware.nic_name).await.map_err(AgentError::NetworkSetup)?;
    report::post_discovery(server, &hardware).await.map_err(AgentError::CallbackRejected)?;
    info!(server, "discovery reported");
    Ok(())
}

fn patch_strategy(answer_file: &Path) -> Result<(), AgentError> {
    let hardware = discover(&sysfs::Sysfs::new(sysfs_root()))?;
    patch::patch_answer_file(answer_file, &hardware)?;
    Ok(())
}

fn discover(sysfs: &sysfs::Sysfs) -> Result<DiscoveredHardware, AgentError> {
    let disks = sysfs.block_devices()?;
    let disk = select_disk(&disks).ok_or(AgentError::NoDiskFound)?;
    let nics = sysfs.net_interfaces()?;
    let nic = select_nic(&nics).ok_or(AgentError::NoNicFound)?;
    info!(disk = %disk.path, nic = %nic.name, mac = %nic.mac, "hardware selected");
    Ok(DiscoveredHardware {
        disk_path: disk.path.clone(),
        nic_name: nic.name.clone(),
        nic_mac: nic.mac.clone(),
    })
}
