// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-code specs for failed hardware selection.
//!
//! Boot scripts branch on these codes, so each failure mode has to be
//! distinguishable from the others.

use crate::prelude::*;

fn patch_args(fixture: &Fixture) -> Vec<String> {
    let answer = fixture.file("answer.toml", "disk-list = []\n");
    vec!["patch".into(), "--answer-file".into(), answer.display().to_string()]
}

#[test]
fn empty_machine_exits_with_no_disk_code() {
    let fixture = Fixture::empty();
    let args = patch_args(&fixture);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    discover()
        .args(&args)
        .env("KILN_SYSFS_ROOT", fixture.path())
        .fails_with(2)
        .stderr_has("no disk");
}

#[test]
fn undersized_disk_exits_with_no_disk_code() {
    let fixture = Fixture::empty();
    fixture.disk("sda", 8_000_000_000);
    let args = patch_args(&fixture);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    discover().args(&args).env("KILN_SYSFS_ROOT", fixture.path()).fails_with(2);
}

#[test]
fn disk_without_nic_exits_with_no_nic_code() {
    let fixture = Fixture::empty();
    fixture.disk("sda", 64_000_000_000);
    let args = patch_args(&fixture);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    discover()
        .args(&args)
        .env("KILN_SYSFS_ROOT", fixture.path())
        .fails_with(3)
        .stderr_has("management interface");
}

#[test]
fn missing_sysfs_tree_exits_with_enumeration_code() {
    let fixture = Fixture::empty();
    let args = patch_args(&fixture);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    discover()
        .args(&args)
        .env("KILN_SYSFS_ROOT", fixture.path().join("not-a-root"))
        .fails_with(6);
}
