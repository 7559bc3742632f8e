// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the black-box specs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

/// An invocation of the `kiln-discover` binary under construction.
pub fn discover() -> Spec {
    Spec { cmd: assert_cmd::Command::cargo_bin("kiln-discover").unwrap() }
}

pub struct Spec {
    cmd: assert_cmd::Command,
}

impl Spec {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and assert a zero exit.
    pub fn passes(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "expected success, got {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        Run { output }
    }

    /// Run and assert the given exit code.
    pub fn fails_with(mut self, code: i32) -> Run {
        let output = self.cmd.output().unwrap();
        assert_eq!(
            output.status.code(),
            Some(code),
            "expected exit code {code}\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        Run { output }
    }
}

pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {needle:?}:\n{}", self.stdout());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {needle:?}:\n{}", self.stderr());
        self
    }
}

/// A throwaway sysfs tree the agent enumerates via `KILN_SYSFS_ROOT`.
pub struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    /// Empty but well-formed: both enumeration directories exist.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sys/block")).unwrap();
        std::fs::create_dir_all(dir.path().join("sys/class/net")).unwrap();
        Fixture { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// A fixed, non-rotational disk of the given size.
    pub fn disk(&self, name: &str, bytes: u64) {
        let dev = format!("sys/block/{name}");
        self.file(&format!("{dev}/size"), &format!("{}\n", bytes / 512));
        self.file(&format!("{dev}/removable"), "0\n");
        self.file(&format!("{dev}/queue/rotational"), "0\n");
    }

    /// A physical interface backed by the given PCI address.
    pub fn nic(&self, name: &str, mac: &str, pci: &str) {
        let backing = self.dir.path().join("sys/devices/pci0000:00").join(pci);
        std::fs::create_dir_all(&backing).unwrap();
        let iface = format!("sys/class/net/{name}");
        self.file(&format!("{iface}/address"), &format!("{mac}\n"));
        std::os::unix::fs::symlink(&backing, self.dir.path().join(iface).join("device")).unwrap();
    }
}
