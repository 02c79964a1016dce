//! Work-report protocol
//!
//! Long-running sub-operations of a deposit (file ingestion, submission) are
//! observed through the [`WorkReporter`] capability: the driving component
//! signals a single start, a per-item exception for every recoverable failure,
//! and a single end. The orchestrator never watches the work itself; it calls
//! [`WorkReporter::check_ok`] afterwards and classifies the outcome from the
//! recorded signals. A report is OK iff it was started, ended, and recorded no
//! failures. A missing end signal means the driver exited without completing,
//! which is surfaced, not swallowed.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::error::DepositError;

/// A single recoverable failure captured during a driven sub-operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkFailure {
    /// Which sub-operation recorded the failure ("ingest", "submit")
    pub stage: String,
    pub message: String,
}

impl WorkFailure {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for WorkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Observation protocol for a batched sub-operation
///
/// Implementations must tolerate concurrent `on_exception` calls: a driver may
/// parallelize per-item work, but the start/end pair still brackets the whole
/// batch exactly once.
pub trait WorkReporter: Send + Sync {
    /// Invoked exactly once before the first unit of work
    fn on_work_start(&self);

    /// Invoked for every recoverable per-item failure; does not abort the batch
    fn on_exception(&self, failure: WorkFailure);

    /// Invoked exactly once after the last unit of work, success or not
    fn on_work_end(&self);

    /// Verdict over the recorded signals; fails with
    /// [`DepositError::IncompleteWork`] iff any failure was recorded or the
    /// start/end pair is incomplete
    fn check_ok(&self) -> Result<(), DepositError>;
}

/// Standard [`WorkReporter`] implementation
///
/// The failure list is append-only and safe under concurrent `on_exception`
/// calls. The client message given at construction identifies the observed
/// sub-operation in the error reported back to the depositor.
pub struct WorkReport {
    client_message: String,
    started: AtomicBool,
    ended: AtomicBool,
    failures: Mutex<Vec<WorkFailure>>,
}

impl WorkReport {
    pub fn new(client_message: impl Into<String>) -> Self {
        Self {
            client_message: client_message.into(),
            started: AtomicBool::new(false),
            ended: AtomicBool::new(false),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    /// Snapshot of the failures recorded so far, in arrival order
    pub fn failures(&self) -> Vec<WorkFailure> {
        // A poisoned lock still holds a usable list; the report must stay
        // readable after a panicking driver.
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl WorkReporter for WorkReport {
    fn on_work_start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    fn on_exception(&self, failure: WorkFailure) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(failure);
    }

    fn on_work_end(&self) {
        self.ended.store(true, Ordering::SeqCst);
    }

    fn check_ok(&self) -> Result<(), DepositError> {
        let failures = self.failures();
        if !failures.is_empty() || !self.started() || !self.ended() {
            return Err(DepositError::IncompleteWork {
                failures,
                client_message: self.client_message.clone(),
            });
        }
        Ok(())
    }
}
