//! Breakpoint value types and host-facing handles.
//!
//! A pending breakpoint is the user's logical request; each successful bind
//! produces a bound breakpoint at one concrete debuggee address. Handles here
//! are cheap clones that talk to the engine's executor thread for mutations
//! and read immutable or atomically-published data directly.

mod bound;
mod pending;

pub use bound::BoundBreakpoint;
pub use pending::PendingBreakpoint;

pub(crate) use bound::BoundShared;

use std::fmt;

/// Identity of a pending breakpoint, assigned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingBreakpointId(pub(crate) u32);

/// Identity of a bound breakpoint, assigned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundBreakpointId(pub(crate) u32);

impl fmt::Display for PendingBreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BoundBreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable state of a bound breakpoint.
///
/// Computed by strict priority: deleted beats enabled beats disabled, so the
/// answer is never ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointState {
    Deleted,
    Enabled,
    Disabled,
}

/// Where and how a breakpoint bound in the debuggee. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointResolution {
    /// Concrete address the breakpoint bound to
    pub address: u64,
    /// Module the address falls in, when known
    pub module: Option<String>,
}

impl BreakpointResolution {
    pub fn at(address: u64) -> Self {
        Self {
            address,
            module: None,
        }
    }

    pub fn in_module(address: u64, module: impl Into<String>) -> Self {
        Self {
            address,
            module: Some(module.into()),
        }
    }
}

/// Conditional-break expression, part of the host protocol.
/// This engine refuses it with a typed NotSupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointCondition {
    pub expression: String,
}

/// Pass-count break condition, part of the host protocol.
/// This engine refuses it with a typed NotSupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassCount(pub u32);
