//! Pending breakpoint handle.

use super::{BoundBreakpoint, PendingBreakpointId};
use crate::engine::executor::{Command, CommandSender};
use crate::error::EngineResult;

/// The user's logical breakpoint request.
///
/// Owns (through the engine's arena) the bound breakpoints the engine has
/// produced for it. Deleting the pending breakpoint cascades to every
/// remaining child.
#[derive(Clone)]
pub struct PendingBreakpoint {
    pub(crate) id: PendingBreakpointId,
    pub(crate) commands: CommandSender,
}

impl PendingBreakpoint {
    pub fn id(&self) -> PendingBreakpointId {
        self.id
    }

    /// Snapshot of the live bound breakpoints this request currently owns.
    /// Children that were deleted no longer appear.
    pub fn bound_breakpoints(&self) -> EngineResult<Vec<BoundBreakpoint>> {
        let children = self
            .commands
            .request(|reply| Command::BoundOf { id: self.id, reply })?;
        Ok(children
            .into_iter()
            .map(|(id, shared)| BoundBreakpoint {
                id,
                shared,
                commands: self.commands.clone(),
            })
            .collect())
    }

    /// Request-level enabled flag. Fails once the request has been deleted.
    pub fn is_enabled(&self) -> EngineResult<bool> {
        self.commands
            .request(|reply| Command::PendingEnabled { id: self.id, reply })?
    }

    /// Record the request-level enabled flag
    pub fn enable(&self, enable: bool) -> EngineResult<()> {
        self.commands.request(|reply| Command::EnablePending {
            id: self.id,
            enable,
            reply,
        })?
    }

    /// Delete the request, cascading to every remaining bound breakpoint.
    /// Idempotent; deleting an already-removed request is no-op success.
    pub fn delete(&self) -> EngineResult<()> {
        self.commands
            .request(|reply| Command::DeletePending { id: self.id, reply })?
    }
}
