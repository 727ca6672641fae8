//! Program provider - answers host discovery queries.
//!
//! The session coordinator asks the provider which processes and program
//! units this engine can debug. A native engine can always answer directly:
//! it claims every process and produces exactly one program node per query.
//!
//! Return convention: `Ok(Some(..))` carries data, `Ok(None)` is the legal
//! "no data produced, try another enumeration strategy" answer, and
//! `Err(NotSupported(..))` marks a capability this provider omits.

pub mod types;

use crate::error::{Capability, EngineError, EngineResult};
use types::{
    DebugPort, EngineId, ProcessId, ProgramNode, ProviderEventCallback, ProviderFlags,
    ProviderProcessData,
};

/// Answers program discovery queries from the session coordinator
#[derive(Debug, Default)]
pub struct ProgramProvider;

impl ProgramProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtain information about a process, filtered by the query flags.
    ///
    /// With `get_program_nodes` set, claims the process is debuggable and
    /// returns exactly one program node for it; ownership of the returned
    /// data passes to the caller. A full-featured engine would examine the
    /// target process and decide whether it understands how to debug it.
    /// Without the flag, produces no data (`Ok(None)`) so the caller falls
    /// back to an enumeration strategy this provider does not implement.
    pub fn provider_process_data(
        &self,
        flags: ProviderFlags,
        _port: &DebugPort,
        process_id: ProcessId,
        _engine_filter: &[EngineId],
    ) -> EngineResult<Option<ProviderProcessData>> {
        if !flags.get_program_nodes {
            return Ok(None);
        }

        log::debug!("Producing program node for process {}", process_id);
        Ok(Some(ProviderProcessData {
            program_nodes: vec![ProgramNode::new(process_id)],
        }))
    }

    /// Just-in-time attach by program id. This provider does not support it.
    pub fn provider_program_node(
        &self,
        _flags: ProviderFlags,
        _port: &DebugPort,
        _process_id: ProcessId,
        _engine: EngineId,
        _program_id: u64,
    ) -> EngineResult<ProgramNode> {
        Err(EngineError::NotSupported(Capability::JitAttach))
    }

    /// Establish a locale for language-specific resources. Any id is
    /// accepted; only one locale is actually supported, so the input has no
    /// observable effect.
    pub fn set_locale(&mut self, lang_id: u16) -> EngineResult<()> {
        log::debug!("Locale {:#06x} requested; only the default locale ships", lang_id);
        Ok(())
    }

    /// Register or unregister a monitoring request for a kind of process.
    ///
    /// A native engine can always answer discovery queries directly, so this
    /// is a no-op. Extension point: a non-native provider would watch the
    /// target process here and call the callback's `add_program_node` once
    /// its runtime starts running debuggable code, using
    /// `flags.attached_to_debuggee` to tell start from stop requests. The
    /// callback is borrowed for the duration of the call only; nothing is
    /// retained.
    pub fn watch_for_provider_events(
        &self,
        _flags: ProviderFlags,
        _port: &DebugPort,
        _process_id: ProcessId,
        _engine_filter: &[EngineId],
        _launching_engine: Option<EngineId>,
        _callback: &dyn ProviderEventCallback,
    ) -> EngineResult<()> {
        Ok(())
    }
}
