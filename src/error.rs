//! Engine error taxonomy.
//!
//! Every host-facing operation returns a status; nothing in this core panics
//! across the boundary. The host protocol's tri-state convention maps onto
//! Rust as:
//! - Success        -> `Ok(value)`
//! - SoftNegative   -> `Ok(None)` on operations typed `EngineResult<Option<T>>`
//! - NotSupported   -> `Err(EngineError::NotSupported(..))`
//! - Hard failure   -> any other `EngineError` variant

use crate::breakpoint::PendingBreakpointId;
use crate::debuggee::DebuggeeError;
use std::fmt;
use thiserror::Error;

/// Optional capabilities this engine deliberately omits.
///
/// Surfacing these as a typed value lets the host disable the matching UI
/// affordance instead of guessing from an opaque failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Per-breakpoint hit counting
    HitCount,
    /// Conditional-break expressions
    Condition,
    /// Pass-count break conditions
    PassCount,
    /// Just-in-time attach by program id
    JitAttach,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::HitCount => "breakpoint hit counts",
            Capability::Condition => "breakpoint conditions",
            Capability::PassCount => "breakpoint pass counts",
            Capability::JitAttach => "attach by program id",
        };
        f.write_str(name)
    }
}

/// Engine-level errors crossing the host boundary
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("this engine does not support {0}")]
    NotSupported(Capability),

    #[error("no pending breakpoint with id {0}")]
    UnknownPendingBreakpoint(PendingBreakpointId),

    #[error("breakpoint executor is no longer running")]
    ExecutorStopped,

    #[error(transparent)]
    Debuggee(#[from] DebuggeeError),
}

pub type EngineResult<T> = Result<T, EngineError>;
