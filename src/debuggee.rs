//! Debuggee process collaborator.
//!
//! The debuggee process owns the target address space and knows how to plant
//! and restore machine-level breakpoints there. This core only drives it
//! through the narrow [`DebuggeeProcess`] trait; the actual instruction
//! patch/restore logic lives behind it.

use std::collections::HashSet;
use thiserror::Error;

/// Errors reported by the debuggee process collaborator
#[derive(Error, Debug)]
pub enum DebuggeeError {
    #[error("failed to plant breakpoint at {address:#x}: {reason}")]
    AddFailed { address: u64, reason: String },

    #[error("failed to remove breakpoint at {address:#x}: {reason}")]
    RemoveFailed { address: u64, reason: String },
}

/// Address-space breakpoint operations on the process being debugged.
///
/// The engine calls these from its coordination thread only, so implementors
/// need `Send` but never see concurrent calls.
pub trait DebuggeeProcess: Send {
    /// Plant a breakpoint at the given address
    fn add_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError>;

    /// Restore the original instruction at the given address
    fn remove_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError>;
}

/// Debuggee stand-in that tracks planted addresses without touching a real
/// process. Used by the harness; tests bring their own recording double.
#[derive(Debug, Default)]
pub struct NullDebuggee {
    planted: HashSet<u64>,
}

impl NullDebuggee {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DebuggeeProcess for NullDebuggee {
    fn add_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError> {
        log::debug!("Planting breakpoint at {:#x}", address);
        self.planted.insert(address);
        Ok(())
    }

    fn remove_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError> {
        log::debug!("Removing breakpoint at {:#x}", address);
        if !self.planted.remove(&address) {
            return Err(DebuggeeError::RemoveFailed {
                address,
                reason: "no breakpoint planted here".into(),
            });
        }
        Ok(())
    }
}
