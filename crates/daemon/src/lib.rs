// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kiln daemon: HTTP/WS front end plus the build-job orchestrator.
//!
//! One process owns every build job: the orchestrator keeps the job
//! registry, a worker task per job does the rendering and image
//! construction, the progress hub fans events out to websocket viewers,
//! and the artifact store holds the outputs keyed by job id.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod discovery;
pub mod env;
pub mod http;
pub mod installer_data;
pub mod orchestrator;
pub mod progress;
pub mod store;
pub mod worker;

pub use env::Config;
pub use orchestrator::{CreateError, Orchestrator};
pub use progress::ProgressHub;
pub use store::ArtifactStore;
