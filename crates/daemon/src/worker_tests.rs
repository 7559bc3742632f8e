// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use yare::parameterized;

use super::parse_progress_line;

#[parameterized(
    plain = {"progress: 42", Some(42)},
    percent = {"progress: 7%", Some(7)},
    no_space = {"progress:99", Some(99)},
    padded = {"  progress: 3  ", Some(3)},
    other = {"unpacking squashfs", None},
    not_a_number = {"progress: soon", None},
)]
fn progress_lines(line: &str, expected: Option<u8>) {
    assert_eq!(parse_progress_line(line), expected);
}
