// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Device enumeration from sysfs and udev.
//!
//! The root directory is injectable so tests can run against a fixture
//! tree instead of `/`. Enumeration order is sorted by device name,
//! which is what gives the selection heuristics their deterministic
//! first-match behavior.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use kiln_core::{BlockDevice, DeviceKind, NetInterface};

pub struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Enumerate block devices from `<root>/sys/block`.
    pub fn block_devices(&self) -> io::Result<Vec<BlockDevice>> {
        let dir = self.root.join("sys/block");
        let mut devices = Vec::new();
        for entry in sorted_entries(&dir)? {
            let name = entry.to_string_lossy().into_owned();
            let sys = dir.join(&entry);
            // size is in 512-byte sectors regardless of block size
            let bytes = read_number(&sys.join("size")) * 512;
            devices.push(BlockDevice {
                path: format!("/dev/{name}"),
                bytes,
                removable: read_flag(&sys.join("removable")),
                rotational: read_flag(&sys.join("queue/rotational")),
                kind: classify(&name),
                name,
            });
        }
        Ok(devices)
    }

    /// Enumerate network interfaces from `<root>/sys/class/net`,
    /// consulting udev for naming properties.
    pub fn net_interfaces(&self) -> io::Result<Vec<NetInterface>> {
        self.net_interfaces_with(udevadm_properties)
    }

    fn net_interfaces_with(
        &self,
        properties: impl Fn(&str) -> String,
    ) -> io::Result<Vec<NetInterface>> {
        let dir = self.root.join("sys/class/net");
        let mut interfaces = Vec::new();
        for entry in sorted_entries(&dir)? {
            let name = entry.to_string_lossy().into_owned();
            let sys = dir.join(&entry);

            let class_target = std::fs::read_link(&sys)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let device_link = std::fs::read_link(sys.join("device")).ok();
            let virtual_dev = class_target.contains("/virtual/") || !sys.join("device").exists();

            let pci_addr = device_link.as_deref().and_then(pci_address);
            let props = properties(&name);

            interfaces.push(NetInterface {
                mac: read_trimmed(&sys.join("address")),
                virtual_dev,
                onboard_tag: has_property(&props, "ID_NET_NAME_ONBOARD"),
                slot_tag: has_property(&props, "ID_NET_NAME_SLOT"),
                pci_addr,
                name,
            });
        }
        Ok(interfaces)
    }
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<std::ffi::OsString>> {
    let mut names: Vec<_> =
        std::fs::read_dir(dir)?.filter_map(|e| e.ok().map(|e| e.file_name())).collect();
    names.sort();
    Ok(names)
}

fn classify(name: &str) -> DeviceKind {
    if name.starts_with("loop") {
        DeviceKind::Loop
    } else if name.starts_with("ram") {
        DeviceKind::Ram
    } else if name.starts_with("fd") {
        DeviceKind::Floppy
    } else if name.starts_with("sr") {
        DeviceKind::Optical
    } else {
        DeviceKind::Disk
    }
}

fn read_trimmed(path: &Path) -> String {
    std::fs::read_to_string(path).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn read_number(path: &Path) -> u64 {
    read_trimmed(path).parse().unwrap_or(0)
}

fn read_flag(path: &Path) -> bool {
    read_trimmed(path) == "1"
}

/// Last component of the device symlink target, when it looks like a
/// PCI address.
fn pci_address(target: &Path) -> Option<String> {
    let last = target.file_name()?.to_string_lossy().into_owned();
    last.contains(':').then_some(last)
}

fn has_property(properties: &str, key: &str) -> bool {
    properties
        .lines()
        .any(|line| line.strip_prefix(key).is_some_and(|rest| rest.starts_with('=')))
}

/// `udevadm info -q property` output for an interface; empty when udev
/// is unavailable, which leaves the chipset-root fallback in charge.
fn udevadm_properties(name: &str) -> String {
    Command::new("udevadm")
        .args(["info", "-q", "property", &format!("/sys/class/net/{name}")])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "sysfs_tests.rs"]
mod tests;
