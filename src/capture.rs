//! Failure capture at the point of failure.
//!
//! A [`Failure`] is the transportable record of one failed check: the
//! original fault, a backtrace captured where the failure happened, and
//! whether the failure was detected in a delegated operation or asserted
//! directly. The entry points return `Err(Failure)` immediately, so `?`
//! carries the record through intermediate frames untouched until the
//! handler at the top of the chain consumes it.
//!
//! The backtrace is captured eagerly, inside the entry point, never at the
//! recovery point: the recorded trace reflects the call stack that failed,
//! not the one that recovered.

use std::backtrace::Backtrace;
use std::fmt;

use crate::fault::Fault;

/// The record of a single captured failure.
///
/// Not clonable: a failure is created once at the failure point and consumed
/// exactly once by the handler that recovers it.
#[derive(Debug)]
pub struct Failure {
    fault: Fault,
    trace: Backtrace,
    detected: bool,
}

impl Failure {
    /// Builds a record for a violated assertion (`detected == false`).
    pub fn assertion(fault: Fault) -> Self {
        Self {
            fault,
            trace: Backtrace::force_capture(),
            detected: false,
        }
    }

    /// Builds a record for an error reported by a delegated operation
    /// (`detected == true`).
    pub fn delegated(fault: Fault) -> Self {
        Self {
            fault,
            trace: Backtrace::force_capture(),
            detected: true,
        }
    }

    /// Returns the original fault, before classification.
    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    /// Returns the backtrace captured at the failure point.
    pub fn trace(&self) -> &Backtrace {
        &self.trace
    }

    /// Returns true if the failure came from a delegated operation rather
    /// than a violated assertion.
    pub fn detected(&self) -> bool {
        self.detected
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fault)
    }
}

impl std::error::Error for Failure {}

/// Checks that an invariant holds; on violation, captures a failure record
/// carrying `fault` and returns it as an error.
///
/// ```
/// use triage::{ensure, Fault};
///
/// fn positive(n: i32) -> Result<(), triage::Failure> {
///     ensure(n > 0, Fault::new("expected a positive number"))?;
///     Ok(())
/// }
///
/// assert!(positive(1).is_ok());
/// assert!(positive(-1).is_err());
/// ```
pub fn ensure(condition: bool, fault: Fault) -> Result<(), Failure> {
    if condition {
        Ok(())
    } else {
        Err(Failure::assertion(fault))
    }
}

/// Wraps a delegated operation's result: `Ok` passes through untouched,
/// `Err` is captured as a detected failure.
pub fn check<T>(result: Result<T, Fault>) -> Result<T, Failure> {
    result.map_err(Failure::delegated)
}

/// Trailing-error form of [`check`] for operations that report failure as an
/// optional error. `None` is the normal success path and a no-op.
pub fn check_error(error: Option<Fault>) -> Result<(), Failure> {
    match error {
        Some(fault) => Err(Failure::delegated(fault)),
        None => Ok(()),
    }
}
