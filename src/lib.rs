//! Fulcrum - breakpoint binding and program discovery core for a native
//! debug engine.
//!
//! The crate covers two responsibilities of a host-driven debug engine:
//! - turning a user-requested pending breakpoint into bound breakpoints at
//!   concrete debuggee addresses, with idempotent deletion and all mutations
//!   serialized on one executor thread;
//! - answering host discovery queries about which processes and program
//!   units are debuggable.
//!
//! The machinery that actually patches debuggee memory stays behind the
//! [`debuggee::DebuggeeProcess`] trait.

pub mod breakpoint;
pub mod cli;
pub mod debuggee;
pub mod engine;
pub mod error;
pub mod provider;

pub use breakpoint::{
    BoundBreakpoint, BoundBreakpointId, BreakpointCondition, BreakpointResolution,
    BreakpointState, PassCount, PendingBreakpoint, PendingBreakpointId,
};
pub use debuggee::{DebuggeeError, DebuggeeProcess, NullDebuggee};
pub use engine::Engine;
pub use error::{Capability, EngineError, EngineResult};
pub use provider::types::{
    DebugPort, EngineId, ProcessId, ProgramNode, ProviderEventCallback, ProviderFlags,
    ProviderProcessData, NATIVE_ENGINE_ID,
};
pub use provider::ProgramProvider;
