//! Engine - top-level breakpoint coordinator.
//!
//! The engine owns the debuggee process collaborator and the executor thread
//! that serializes every breakpoint mutation. Handles returned from here can
//! be cloned and used from any thread.

mod arena;
pub(crate) mod executor;

use crate::breakpoint::{BoundBreakpoint, BreakpointResolution, PendingBreakpoint};
use crate::debuggee::DebuggeeProcess;
use crate::error::EngineResult;

use executor::{Command, CommandSender};
use std::sync::mpsc;
use std::thread;

/// Top-level coordinator for the breakpoint subsystem
pub struct Engine {
    commands: CommandSender,
    worker: Option<thread::JoinHandle<()>>,
}

impl Engine {
    /// Start the engine. The executor thread takes ownership of the debuggee
    /// collaborator and becomes the only thread that ever touches it or the
    /// shared breakpoint collections.
    pub fn new(debuggee: Box<dyn DebuggeeProcess>) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || executor::run(rx, debuggee));
        log::info!("Breakpoint executor started");

        Self {
            commands: CommandSender::new(tx),
            worker: Some(worker),
        }
    }

    /// Register a new logical breakpoint request
    pub fn create_pending_breakpoint(&self) -> EngineResult<PendingBreakpoint> {
        let id = self
            .commands
            .request(|reply| Command::CreatePending { reply })?;
        Ok(PendingBreakpoint {
            id,
            commands: self.commands.clone(),
        })
    }

    /// Bind a pending breakpoint at a resolved location. Plants the
    /// address-space breakpoint in the debuggee, then registers the new bound
    /// breakpoint as a child of the request.
    pub fn bind_breakpoint(
        &self,
        pending: &PendingBreakpoint,
        resolution: BreakpointResolution,
    ) -> EngineResult<BoundBreakpoint> {
        let (id, shared) = self.commands.request(|reply| Command::Bind {
            pending: pending.id,
            resolution,
            reply,
        })??;
        Ok(BoundBreakpoint {
            id,
            shared,
            commands: self.commands.clone(),
        })
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.commands.shutdown();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
