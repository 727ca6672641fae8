//! Single-threaded breakpoint executor.
//!
//! All breakpoint mutations funnel through one thread that exclusively owns
//! the arena and the debuggee collaborator. Call sites anywhere in the
//! process submit a [`Command`] with a reply channel and block until the
//! executor answers, which replaces a "must run on the coordination thread"
//! precondition with a structural guarantee.

use super::arena::BreakpointArena;
use crate::breakpoint::{
    BoundBreakpointId, BoundShared, BreakpointResolution, PendingBreakpointId,
};
use crate::debuggee::DebuggeeProcess;
use crate::error::{EngineError, EngineResult};
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

pub(crate) enum Command {
    CreatePending {
        reply: Sender<PendingBreakpointId>,
    },
    EnablePending {
        id: PendingBreakpointId,
        enable: bool,
        reply: Sender<EngineResult<()>>,
    },
    PendingEnabled {
        id: PendingBreakpointId,
        reply: Sender<EngineResult<bool>>,
    },
    DeletePending {
        id: PendingBreakpointId,
        reply: Sender<EngineResult<()>>,
    },
    Bind {
        pending: PendingBreakpointId,
        resolution: BreakpointResolution,
        reply: Sender<EngineResult<(BoundBreakpointId, Arc<BoundShared>)>>,
    },
    EnableBound {
        id: BoundBreakpointId,
        enable: bool,
        reply: Sender<EngineResult<()>>,
    },
    DeleteBound {
        id: BoundBreakpointId,
        reply: Sender<EngineResult<()>>,
    },
    BoundOf {
        id: PendingBreakpointId,
        reply: Sender<Vec<(BoundBreakpointId, Arc<BoundShared>)>>,
    },
    Shutdown,
}

/// Cloneable handle for submitting commands to the executor thread
#[derive(Clone)]
pub(crate) struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    pub(crate) fn new(tx: Sender<Command>) -> Self {
        Self { tx }
    }

    /// Submit a command and block until the executor replies. Fails with
    /// `ExecutorStopped` once the engine has shut down.
    pub(crate) fn request<R>(
        &self,
        build: impl FnOnce(Sender<R>) -> Command,
    ) -> EngineResult<R> {
        let (reply_tx, reply_rx) = std::sync::mpsc::channel();
        self.tx
            .send(build(reply_tx))
            .map_err(|_| EngineError::ExecutorStopped)?;
        reply_rx.recv().map_err(|_| EngineError::ExecutorStopped)
    }

    pub(crate) fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);
    }
}

/// Executor loop. Runs until Shutdown or until every sender is gone.
pub(crate) fn run(rx: Receiver<Command>, debuggee: Box<dyn DebuggeeProcess>) {
    let mut executor = Executor {
        arena: BreakpointArena::default(),
        debuggee,
    };

    while let Ok(command) = rx.recv() {
        // A dropped reply receiver just means the caller gave up waiting;
        // the mutation itself has already happened.
        match command {
            Command::CreatePending { reply } => {
                let _ = reply.send(executor.create_pending());
            }
            Command::EnablePending { id, enable, reply } => {
                let _ = reply.send(executor.enable_pending(id, enable));
            }
            Command::PendingEnabled { id, reply } => {
                let _ = reply.send(
                    executor
                        .arena
                        .pending_enabled(id)
                        .ok_or(EngineError::UnknownPendingBreakpoint(id)),
                );
            }
            Command::DeletePending { id, reply } => {
                let _ = reply.send(executor.delete_pending(id));
            }
            Command::Bind {
                pending,
                resolution,
                reply,
            } => {
                let _ = reply.send(executor.bind(pending, resolution));
            }
            Command::EnableBound { id, enable, reply } => {
                let _ = reply.send(executor.enable_bound(id, enable));
            }
            Command::DeleteBound { id, reply } => {
                let _ = reply.send(executor.delete_bound(id));
            }
            Command::BoundOf { id, reply } => {
                let _ = reply.send(executor.arena.children_of(id));
            }
            Command::Shutdown => break,
        }
    }

    log::info!("Breakpoint executor stopped");
}

struct Executor {
    arena: BreakpointArena,
    debuggee: Box<dyn DebuggeeProcess>,
}

impl Executor {
    fn create_pending(&mut self) -> PendingBreakpointId {
        let id = self.arena.create_pending();
        log::debug!("Created pending breakpoint {}", id);
        id
    }

    fn enable_pending(&mut self, id: PendingBreakpointId, enable: bool) -> EngineResult<()> {
        self.arena.set_pending_enabled(id, enable);
        Ok(())
    }

    /// Cascade delete: every remaining child goes through the same path as a
    /// direct child delete. Already-removed requests are no-op success.
    fn delete_pending(&mut self, id: PendingBreakpointId) -> EngineResult<()> {
        let Some(record) = self.arena.remove_pending(id) else {
            return Ok(());
        };
        log::debug!(
            "Deleting pending breakpoint {} with {} bound child(ren)",
            id,
            record.children.len()
        );

        let mut first_error = None;
        for child in record.children {
            if let Err(e) = self.delete_bound(child) {
                log::warn!("Failed to delete bound breakpoint {}: {}", child, e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn bind(
        &mut self,
        pending: PendingBreakpointId,
        resolution: BreakpointResolution,
    ) -> EngineResult<(BoundBreakpointId, Arc<BoundShared>)> {
        if !self.arena.contains_pending(pending) {
            return Err(EngineError::UnknownPendingBreakpoint(pending));
        }

        self.debuggee.add_breakpoint(resolution.address)?;
        let shared = Arc::new(BoundShared::new(resolution, pending));
        let id = self.arena.insert_bound(pending, shared.clone());
        log::debug!(
            "Bound breakpoint {} at {:#x} under pending {}",
            id,
            shared.address,
            pending
        );
        Ok((id, shared))
    }

    fn enable_bound(&mut self, id: BoundBreakpointId, enable: bool) -> EngineResult<()> {
        // Extension point: a production engine would add or remove the
        // underlying address-space patch when the flag actually changes.
        // This minimal engine records the flag only.
        if let Some(shared) = self.arena.bound(id) {
            shared.enabled.store(enable, Ordering::Release);
        }
        Ok(())
    }

    /// First call removes the address-space breakpoint and detaches from the
    /// parent exactly once; every later call is no-op success.
    fn delete_bound(&mut self, id: BoundBreakpointId) -> EngineResult<()> {
        let Some(shared) = self.arena.bound(id).cloned() else {
            return Ok(());
        };
        if shared.deleted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let removed = self.debuggee.remove_breakpoint(shared.address);
        self.arena.detach_child(shared.parent, id);
        log::debug!("Deleted bound breakpoint {} at {:#x}", id, shared.address);
        removed.map_err(Into::into)
    }
}
