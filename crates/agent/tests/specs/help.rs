// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface specs for kiln-discover.

use crate::prelude::*;

#[test]
fn no_args_prints_usage_and_fails() {
    discover().fails_with(2).stderr_has("Usage:");
}

#[test]
fn help_lists_both_strategies() {
    discover().args(&["--help"]).passes().stdout_has("report").stdout_has("patch");
}

#[test]
fn report_help_shows_the_server_flag() {
    discover().args(&["report", "--help"]).passes().stdout_has("--server");
}

#[test]
fn patch_help_shows_the_answer_file_flag() {
    discover().args(&["patch", "--help"]).passes().stdout_has("--answer-file");
}
