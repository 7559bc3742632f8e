// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Patch-strategy specs.
//!
//! Fixture sysfs trees stand in for real hardware; the agent selects
//! from them and rewrites the answer file in place.

use crate::prelude::*;

const ANSWER: &str = r#"[global]
keyboard = "en-us"
fqdn = "node.kiln.internal"

[network]
source = "from-dhcp"
filter.ID_NET_NAME_MAC = "*000000000000"

[disk-setup]
filesystem = "ext4"
disk-list = ["/dev/placeholder"]
"#;

#[test]
fn patch_substitutes_the_selected_hardware() {
    let fixture = Fixture::empty();
    fixture.disk("sda", 64_000_000_000);
    fixture.nic("enkiln0", "aa:bb:cc:dd:ee:ff", "0000:00:1f.6");
    let answer = fixture.file("answer.toml", ANSWER);

    discover()
        .args(&["patch", "--answer-file", &answer.display().to_string()])
        .env("KILN_SYSFS_ROOT", fixture.path())
        .passes();

    let patched = std::fs::read_to_string(&answer).unwrap();
    assert!(patched.contains("filter.ID_NET_NAME_MAC = \"*aabbccddeeff\""), "{patched}");
    assert!(patched.contains("disk-list = [\"/dev/sda\"]"), "{patched}");
    // Everything else survives untouched.
    assert!(patched.contains("fqdn = \"node.kiln.internal\""), "{patched}");
    assert!(patched.contains("source = \"from-dhcp\""), "{patched}");
}

#[test]
fn missing_answer_file_is_a_warning_not_a_failure() {
    let fixture = Fixture::empty();
    fixture.disk("nvme0n1", 256_000_000_000);
    fixture.nic("enkiln1", "aa:bb:cc:00:11:22", "0000:00:1f.6");
    let absent = fixture.path().join("no-such-answer.toml");

    discover()
        .args(&["patch", "--answer-file", &absent.display().to_string()])
        .env("KILN_SYSFS_ROOT", fixture.path())
        .passes();

    assert!(!absent.exists());
}
