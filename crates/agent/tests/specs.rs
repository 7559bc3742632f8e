// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `kiln-discover` binary.
//!
//! These drive the built binary end to end, the way the boot scripts
//! do. Unit behavior lives next to the code in src/; only
//! cross-process behavior belongs here.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

#[path = "specs/prelude.rs"]
mod prelude;

mod specs {
    mod help;
    mod patch;
    mod selection;
}
