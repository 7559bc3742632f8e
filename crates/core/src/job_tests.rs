// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;

fn job() -> BuildJob {
    BuildJob::new(JobId::from_string("job-test"), &FakeClock::new())
}

#[test]
fn new_job_is_pending_at_zero() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(42_000);
    let job = BuildJob::new(JobId::from_string("job-a"), &clock);
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.progress, 0);
    assert_eq!(job.created_at_ms, 42_000);
    assert!(job.error_detail.is_none());
}

#[test]
fn forward_path_advances() {
    let mut job = job();
    job.advance(JobStatus::Rendering).unwrap();
    job.advance(JobStatus::Building).unwrap();
    job.advance(JobStatus::Complete).unwrap();
    assert!(job.is_terminal());
}

#[yare::parameterized(
    complete  = { JobStatus::Complete },
    failed    = { JobStatus::Failed },
    cancelled = { JobStatus::Cancelled },
)]
fn terminal_states_absorb(terminal: JobStatus) {
    let mut job = job();
    job.advance(terminal).unwrap();
    for next in [
        JobStatus::Pending,
        JobStatus::Rendering,
        JobStatus::Building,
        JobStatus::Complete,
        JobStatus::Failed,
        JobStatus::Cancelled,
    ] {
        assert!(matches!(
            job.advance(next),
            Err(TransitionError::Terminal { .. })
        ));
    }
}

#[test]
fn no_reentry_to_prior_state() {
    let mut job = job();
    job.advance(JobStatus::Building).unwrap();
    assert!(matches!(
        job.advance(JobStatus::Rendering),
        Err(TransitionError::Backwards { .. })
    ));
    assert!(matches!(
        job.advance(JobStatus::Building),
        Err(TransitionError::Backwards { .. })
    ));
}

#[test]
fn cancel_reachable_from_any_non_terminal() {
    for setup in [JobStatus::Rendering, JobStatus::Building] {
        let mut job = job();
        job.advance(setup).unwrap();
        job.cancel().unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
    }
    let mut job = job();
    job.cancel().unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
}

#[test]
fn progress_is_monotonic_and_clamped() {
    let mut job = job();
    job.set_progress(10).unwrap();
    job.set_progress(10).unwrap();
    assert!(matches!(
        job.set_progress(9),
        Err(TransitionError::ProgressDecreased { .. })
    ));
    job.set_progress(200).unwrap();
    assert_eq!(job.progress, 100);
}

#[test]
fn fail_records_detail() {
    let mut job = job();
    job.advance(JobStatus::Building).unwrap();
    job.fail("tool exit 1").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_detail.as_deref(), Some("tool exit 1"));
}

#[test]
fn status_serde_is_snake_case() {
    assert_eq!(serde_json::to_string(&JobStatus::Building).unwrap(), "\"building\"");
    let parsed: JobStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(parsed, JobStatus::Cancelled);
}
