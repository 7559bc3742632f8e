// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hardware selection heuristics.
//!
//! Pure functions over structurally enumerated device lists; the agent
//! crate does the actual sysfs/udev enumeration. Keeping selection pure
//! means the heuristics are unit-testable without real hardware.

use serde::{Deserialize, Serialize};

/// Minimum installable disk capacity.
pub const MIN_DISK_BYTES: u64 = 20 * 1_000_000_000;

/// Broad block-device classification from the device name and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Disk,
    Loop,
    Ram,
    Floppy,
    Optical,
}

/// An enumerated block device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDevice {
    /// Kernel name, e.g. `sda` or `nvme0n1`.
    pub name: String,
    /// Device node path, e.g. `/dev/sda`.
    pub path: String,
    pub bytes: u64,
    pub removable: bool,
    pub rotational: bool,
    pub kind: DeviceKind,
}

impl BlockDevice {
    /// Installable: a real disk, fixed, and large enough.
    fn qualifies(&self) -> bool {
        self.kind == DeviceKind::Disk && !self.removable && self.bytes >= MIN_DISK_BYTES
    }
}

/// An enumerated network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInterface {
    pub name: String,
    pub mac: String,
    /// Device path resolves under the kernel's virtual tree.
    pub virtual_dev: bool,
    /// Carries the udev on-board name property (`ID_NET_NAME_ONBOARD`).
    pub onboard_tag: bool,
    /// PCI address of the backing device, e.g. `0000:00:1f.6`.
    pub pci_addr: Option<String>,
    /// Carries a physical-slot descriptor (`ID_NET_NAME_SLOT`), i.e.
    /// sits in a removable card slot.
    pub slot_tag: bool,
}

impl NetInterface {
    fn is_loopback(&self) -> bool {
        self.name == "lo"
    }

    /// Fallback on-board test: device hangs off the chipset root
    /// (domain/bus `0000:00:`) and has no slot descriptor.
    fn chipset_root(&self) -> bool {
        self.pci_addr
            .as_deref()
            .is_some_and(|addr| addr.starts_with("0000:00:"))
            && !self.slot_tag
    }
}

/// What the discovery agent reports once per boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredHardware {
    pub disk_path: String,
    pub nic_name: String,
    pub nic_mac: String,
}

/// Choose the installation disk.
///
/// Loop/ram/floppy/optical devices, removable devices, and anything
/// under 20 GB are excluded. Tiers are tried in order — solid-state,
/// rotational, then any qualifying device — and the first tier with a
/// candidate wins. Within a tier the first enumerated device is taken,
/// so callers control priority via enumeration order.
pub fn select_disk(devices: &[BlockDevice]) -> Option<&BlockDevice> {
    let qualifying: Vec<&BlockDevice> = devices.iter().filter(|d| d.qualifies()).collect();

    qualifying
        .iter()
        .find(|d| !d.rotational)
        .or_else(|| qualifying.iter().find(|d| d.rotational))
        .or_else(|| qualifying.first())
        .copied()
}

/// Choose the management NIC.
///
/// Loopback and virtual interfaces are excluded. The primary method
/// collects interfaces carrying the udev on-board tag; only when that
/// yields nothing does the chipset-root fallback apply. The first
/// entry of whichever list is non-empty wins.
pub fn select_nic(interfaces: &[NetInterface]) -> Option<&NetInterface> {
    let physical: Vec<&NetInterface> = interfaces
        .iter()
        .filter(|i| !i.is_loopback() && !i.virtual_dev)
        .collect();

    let onboard: Vec<&&NetInterface> = physical.iter().filter(|i| i.onboard_tag).collect();
    if let Some(first) = onboard.first() {
        return Some(**first);
    }

    physical.iter().find(|i| i.chipset_root()).copied()
}

#[cfg(test)]
#[path = "hardware_tests.rs"]
mod tests;
