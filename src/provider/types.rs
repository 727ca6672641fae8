//! Types crossing the program discovery boundary.

use uuid::Uuid;

/// Identifies a debug engine across the host boundary
pub type EngineId = Uuid;

/// GUID this native engine is registered under at the host
pub const NATIVE_ENGINE_ID: EngineId = uuid::uuid!("3d1f3680-5e8c-47b4-9f2e-8a2b61c0d9aa");

/// Process identity as the host port reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-side port a discovery query is scoped to
#[derive(Debug, Clone, Default)]
pub struct DebugPort {
    pub name: String,
}

/// Discovery query flags passed by the session coordinator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderFlags {
    /// Caller wants the program nodes this engine can produce for the process
    pub get_program_nodes: bool,
    /// The watch request is to stop monitoring rather than start
    pub attached_to_debuggee: bool,
}

impl ProviderFlags {
    pub const PROGRAM_NODES: Self = Self {
        get_program_nodes: true,
        attached_to_debuggee: false,
    };
}

/// A debuggable unit discovered inside a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramNode {
    process_id: ProcessId,
}

impl ProgramNode {
    pub fn new(process_id: ProcessId) -> Self {
        Self { process_id }
    }

    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }
}

/// Program nodes produced for one process. Ownership passes to the caller on
/// return; the provider keeps nothing behind.
#[derive(Debug, Clone, Default)]
pub struct ProviderProcessData {
    /// A populated vec is the marker that the record carries program-node data
    pub program_nodes: Vec<ProgramNode>,
}

/// Callback a monitoring provider would use to publish a program node once a
/// watched process becomes debuggable
pub trait ProviderEventCallback: Send + Sync {
    fn add_program_node(&self, node: ProgramNode);
}
