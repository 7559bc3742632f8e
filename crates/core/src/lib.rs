// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiln-core: domain types for the kiln unattended-install pipeline.
//!
//! Everything in this crate is pure: configuration validation, answer-file
//! rendering, the build-job state machine, progress events, and the
//! hardware selection heuristics. OS and network access live in the
//! daemon and agent crates.

pub mod macros;

pub mod answer;
pub mod clock;
pub mod config;
pub mod event;
pub mod hardware;
pub mod id;
pub mod job;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use answer::{render_answer, RenderError};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    mac_filter_expression, DiskSelection, IdentityConfig, InstallConfig, NetworkConfig,
    NetworkSource, ValidConfig,
};
pub use event::{EventKind, ProgressEvent};
pub use hardware::{select_disk, select_nic, BlockDevice, DeviceKind, DiscoveredHardware, NetInterface};
pub use id::JobId;
pub use job::{BuildJob, JobStatus, TransitionError};
pub use validate::{validate, ValidationErrors};
