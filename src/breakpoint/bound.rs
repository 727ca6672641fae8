//! Bound breakpoint handle.

use super::{
    BoundBreakpointId, BreakpointCondition, BreakpointResolution, BreakpointState, PassCount,
    PendingBreakpoint, PendingBreakpointId,
};
use crate::engine::executor::{Command, CommandSender};
use crate::error::{Capability, EngineError, EngineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-breakpoint record shared between the executor (sole writer) and any
/// number of handles (readers). Everything except the two flags is immutable
/// after construction.
#[derive(Debug)]
pub(crate) struct BoundShared {
    pub(crate) address: u64,
    pub(crate) resolution: BreakpointResolution,
    pub(crate) parent: PendingBreakpointId,
    pub(crate) enabled: AtomicBool,
    pub(crate) deleted: AtomicBool,
}

impl BoundShared {
    pub(crate) fn new(resolution: BreakpointResolution, parent: PendingBreakpointId) -> Self {
        Self {
            address: resolution.address,
            resolution,
            parent,
            enabled: AtomicBool::new(true),
            deleted: AtomicBool::new(false),
        }
    }
}

/// One concrete binding of a pending breakpoint to a debuggee address.
///
/// Mutations (`delete`, `enable`) are forwarded to the engine's executor
/// thread; the read accessors work from any thread without blocking on it.
#[derive(Clone)]
pub struct BoundBreakpoint {
    pub(crate) id: BoundBreakpointId,
    pub(crate) shared: Arc<BoundShared>,
    pub(crate) commands: CommandSender,
}

impl BoundBreakpoint {
    pub fn id(&self) -> BoundBreakpointId {
        self.id
    }

    /// Address this breakpoint bound to
    pub fn address(&self) -> u64 {
        self.shared.address
    }

    /// Delete the breakpoint: removes the address-space patch and detaches
    /// from the parent pending breakpoint. Idempotent; repeat calls are no-op
    /// success.
    pub fn delete(&self) -> EngineResult<()> {
        self.commands.request(|reply| Command::DeleteBound {
            id: self.id,
            reply,
        })?
    }

    /// Record the enabled flag. A production engine would toggle the
    /// underlying patch when the flag changes; this minimal engine records
    /// the flag only.
    pub fn enable(&self, enable: bool) -> EngineResult<()> {
        self.commands.request(|reply| Command::EnableBound {
            id: self.id,
            enable,
            reply,
        })?
    }

    /// How and where this breakpoint bound. Callable from any thread.
    pub fn resolution(&self) -> &BreakpointResolution {
        &self.shared.resolution
    }

    /// Parent pending breakpoint. Callable from any thread.
    pub fn pending_breakpoint(&self) -> PendingBreakpoint {
        PendingBreakpoint {
            id: self.shared.parent,
            commands: self.commands.clone(),
        }
    }

    /// Current state by strict priority: Deleted, else Enabled, else Disabled.
    /// Callable from any thread.
    pub fn state(&self) -> BreakpointState {
        if self.shared.deleted.load(Ordering::Acquire) {
            BreakpointState::Deleted
        } else if self.shared.enabled.load(Ordering::Acquire) {
            BreakpointState::Enabled
        } else {
            BreakpointState::Disabled
        }
    }

    /// Hit counting is not implemented by this engine
    pub fn hit_count(&self) -> EngineResult<u32> {
        Err(EngineError::NotSupported(Capability::HitCount))
    }

    /// Break conditions are not implemented by this engine
    pub fn set_condition(&self, _condition: BreakpointCondition) -> EngineResult<()> {
        Err(EngineError::NotSupported(Capability::Condition))
    }

    /// Hit counting is not implemented by this engine
    pub fn set_hit_count(&self, _count: u32) -> EngineResult<()> {
        Err(EngineError::NotSupported(Capability::HitCount))
    }

    /// Pass counts are not implemented by this engine
    pub fn set_pass_count(&self, _pass_count: PassCount) -> EngineResult<()> {
        Err(EngineError::NotSupported(Capability::PassCount))
    }
}
