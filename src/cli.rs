//! CLI - reedline-based harness REPL.
//!
//! Stands in for the external debugging host: drives the breakpoint binding
//! protocol and the discovery protocol by hand so every engine operation is
//! exercisable end to end, including the NotSupported degradation paths.

use anyhow::Result;
use colored::Colorize;
use reedline::{
    Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::breakpoint::{BoundBreakpoint, BreakpointCondition, BreakpointResolution, PendingBreakpoint};
use crate::debuggee::NullDebuggee;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::provider::types::{DebugPort, ProcessId, ProviderFlags};
use crate::provider::ProgramProvider;

/// Custom prompt showing how many breakpoints the harness is holding
struct HarnessPrompt {
    pending: usize,
    bound: usize,
}

impl Prompt for HarnessPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("[pb:{} bb:{}]", self.pending, self.bound))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Command parsing result
#[derive(Debug)]
enum ParsedCommand {
    /// Create a pending breakpoint: pb
    CreatePending,
    /// Bind a pending breakpoint: bind <pb> <addr>
    Bind(String, u64),
    /// List breakpoints: bl
    List,
    /// Enable/disable a bound breakpoint: en <bb> / dis <bb>
    Enable(String, bool),
    /// Delete a bound breakpoint: del <bb>
    DeleteBound(String),
    /// Delete a pending breakpoint and its children: delp <pb>
    DeletePending(String),
    /// Try to set a condition (engine refuses): cond <bb> <expr>
    Condition(String, String),
    /// Try to read the hit count (engine refuses): hits <bb>
    HitCount(String),
    /// Discovery query with the program-nodes flag: dp <pid>
    Discover(u32),
    /// Discovery query without the flag (soft-negative path): dp- <pid>
    DiscoverBare(u32),
    /// JIT attach by program id (engine refuses): jit <pid> <program>
    JitAttach(u32, u64),
    /// Help: ? or help
    Help,
    /// Quit: q or exit
    Quit,
    /// Unknown command
    Unknown(String),
}

/// Parse a command string into a structured command
fn parse_command(input: &str) -> ParsedCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.split_whitespace().collect();
    let cmd = parts.first().copied().unwrap_or("");

    match cmd {
        "pb" => ParsedCommand::CreatePending,
        "bind" => {
            if let (Some(pb), Some(addr)) = (parts.get(1), parts.get(2)) {
                if let Ok(addr) = parse_address(addr) {
                    return ParsedCommand::Bind(pb.to_string(), addr);
                }
            }
            ParsedCommand::Unknown(input.to_string())
        }
        "bl" | "list" => ParsedCommand::List,
        "en" | "enable" => match parts.get(1) {
            Some(bb) => ParsedCommand::Enable(bb.to_string(), true),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "dis" | "disable" => match parts.get(1) {
            Some(bb) => ParsedCommand::Enable(bb.to_string(), false),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "del" => match parts.get(1) {
            Some(bb) => ParsedCommand::DeleteBound(bb.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "delp" => match parts.get(1) {
            Some(pb) => ParsedCommand::DeletePending(pb.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "cond" => {
            if let Some(bb) = parts.get(1) {
                let expr = parts[2..].join(" ");
                return ParsedCommand::Condition(bb.to_string(), expr);
            }
            ParsedCommand::Unknown(input.to_string())
        }
        "hits" => match parts.get(1) {
            Some(bb) => ParsedCommand::HitCount(bb.to_string()),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "dp" => match parts.get(1).and_then(|p| p.parse().ok()) {
            Some(pid) => ParsedCommand::Discover(pid),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "dp-" => match parts.get(1).and_then(|p| p.parse().ok()) {
            Some(pid) => ParsedCommand::DiscoverBare(pid),
            None => ParsedCommand::Unknown(input.to_string()),
        },
        "jit" => {
            if let (Some(pid), Some(prog)) = (
                parts.get(1).and_then(|p| p.parse().ok()),
                parts.get(2).and_then(|p| parse_address(p).ok()),
            ) {
                return ParsedCommand::JitAttach(pid, prog);
            }
            ParsedCommand::Unknown(input.to_string())
        }
        "?" | "help" => ParsedCommand::Help,
        "q" | "quit" | "exit" => ParsedCommand::Quit,
        _ => ParsedCommand::Unknown(input.to_string()),
    }
}

/// Parse an address string (supports 0x prefix and decimal)
fn parse_address(s: &str) -> Result<u64, std::num::ParseIntError> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

/// Print the help message
fn print_help() {
    println!("{}", "Fulcrum Harness Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    println!("\n{}", "Breakpoints:".bold().yellow());
    println!("  {}              New pending breakpoint", "pb".green());
    println!("  {}  Bind at address", "bind <pb> <addr>".green());
    println!("  {}              List breakpoints", "bl".green());
    println!("  {}         Enable bound breakpoint", "en <bb>".green());
    println!("  {}        Disable bound breakpoint", "dis <bb>".green());
    println!("  {}        Delete bound breakpoint", "del <bb>".green());
    println!("  {}       Delete pending + children", "delp <pb>".green());

    println!("\n{}", "Unsupported capabilities (engine refuses):".bold().yellow());
    println!("  {}  Set a break condition", "cond <bb> <expr>".green());
    println!("  {}       Read the hit count", "hits <bb>".green());

    println!("\n{}", "Discovery:".bold().yellow());
    println!("  {}        Query program nodes for pid", "dp <pid>".green());
    println!("  {}       Query without the nodes flag", "dp- <pid>".green());
    println!("  {}  JIT attach by program id", "jit <pid> <prog>".green());

    println!("\n{}", "Other:".bold().yellow());
    println!("  {}               Show this help", "?".green());
    println!("  {}               Quit", "q".green());
}

/// Harness-side view of the engine under test
struct Harness {
    engine: Engine,
    provider: ProgramProvider,
    port: DebugPort,
    pending: HashMap<String, PendingBreakpoint>,
    bound: HashMap<String, BoundBreakpoint>,
}

impl Harness {
    fn new() -> Self {
        Self {
            engine: Engine::new(Box::new(NullDebuggee::new())),
            provider: ProgramProvider::new(),
            port: DebugPort {
                name: "local".into(),
            },
            pending: HashMap::new(),
            bound: HashMap::new(),
        }
    }

    fn pending_by_key(&self, key: &str) -> Option<&PendingBreakpoint> {
        self.pending.get(key)
    }

    fn bound_by_key(&self, key: &str) -> Option<&BoundBreakpoint> {
        self.bound.get(key)
    }
}

fn report(result: Result<(), EngineError>) {
    match result {
        Ok(()) => println!("[*] ok"),
        Err(e) => println!("{} {}", "[!]".red(), e),
    }
}

/// Execute a parsed command against the harness
fn execute_command(harness: &mut Harness, cmd: ParsedCommand) -> bool {
    match cmd {
        ParsedCommand::CreatePending => match harness.engine.create_pending_breakpoint() {
            Ok(pb) => {
                let key = pb.id().to_string();
                println!("[*] Pending breakpoint {}", key);
                harness.pending.insert(key, pb);
            }
            Err(e) => println!("{} {}", "[!]".red(), e),
        },
        ParsedCommand::Bind(pb_key, addr) => {
            let Some(pb) = harness.pending_by_key(&pb_key) else {
                println!("{} No pending breakpoint '{}'", "[!]".red(), pb_key);
                return true;
            };
            match harness
                .engine
                .bind_breakpoint(pb, BreakpointResolution::at(addr))
            {
                Ok(bb) => {
                    let key = bb.id().to_string();
                    println!("[*] Bound breakpoint {} at {:#x}", key, bb.address());
                    harness.bound.insert(key, bb);
                }
                Err(e) => println!("{} {}", "[!]".red(), e),
            }
        }
        ParsedCommand::List => {
            for (key, pb) in &harness.pending {
                match pb.bound_breakpoints() {
                    Ok(children) => {
                        let flag = match pb.is_enabled() {
                            Ok(true) => "enabled",
                            Ok(false) => "disabled",
                            Err(_) => "gone",
                        };
                        println!("[*] pb {} ({}, {} bound)", key, flag, children.len());
                        for bb in children {
                            println!(
                                "      bb {} at {:#x} [{:?}]",
                                bb.id(),
                                bb.address(),
                                bb.state()
                            );
                        }
                    }
                    Err(e) => println!("{} pb {}: {}", "[!]".red(), key, e),
                }
            }
        }
        ParsedCommand::Enable(bb_key, enable) => {
            match harness.bound_by_key(&bb_key) {
                Some(bb) => {
                    let result = bb.enable(enable);
                    if result.is_ok() {
                        println!("[*] bb {} -> {:?}", bb_key, bb.state());
                    } else {
                        report(result);
                    }
                }
                None => println!("{} No bound breakpoint '{}'", "[!]".red(), bb_key),
            }
        }
        ParsedCommand::DeleteBound(bb_key) => match harness.bound_by_key(&bb_key) {
            Some(bb) => report(bb.delete()),
            None => println!("{} No bound breakpoint '{}'", "[!]".red(), bb_key),
        },
        ParsedCommand::DeletePending(pb_key) => match harness.pending_by_key(&pb_key) {
            Some(pb) => {
                report(pb.delete());
                harness.pending.remove(&pb_key);
            }
            None => println!("{} No pending breakpoint '{}'", "[!]".red(), pb_key),
        },
        ParsedCommand::Condition(bb_key, expression) => match harness.bound_by_key(&bb_key) {
            Some(bb) => report(bb.set_condition(BreakpointCondition { expression })),
            None => println!("{} No bound breakpoint '{}'", "[!]".red(), bb_key),
        },
        ParsedCommand::HitCount(bb_key) => match harness.bound_by_key(&bb_key) {
            Some(bb) => match bb.hit_count() {
                Ok(count) => println!("[*] {} hits", count),
                Err(e) => println!("{} {}", "[!]".red(), e),
            },
            None => println!("{} No bound breakpoint '{}'", "[!]".red(), bb_key),
        },
        ParsedCommand::Discover(pid) => {
            match harness.provider.provider_process_data(
                ProviderFlags::PROGRAM_NODES,
                &harness.port,
                ProcessId(pid),
                &[],
            ) {
                Ok(Some(data)) => {
                    for node in &data.program_nodes {
                        println!("[*] Program node for process {}", node.process_id());
                    }
                }
                Ok(None) => println!("[*] No data (soft negative)"),
                Err(e) => println!("{} {}", "[!]".red(), e),
            }
        }
        ParsedCommand::DiscoverBare(pid) => {
            match harness.provider.provider_process_data(
                ProviderFlags::default(),
                &harness.port,
                ProcessId(pid),
                &[],
            ) {
                Ok(Some(_)) => println!("[*] Unexpected data"),
                Ok(None) => println!("[*] No data (soft negative) - caller should enumerate another way"),
                Err(e) => println!("{} {}", "[!]".red(), e),
            }
        }
        ParsedCommand::JitAttach(pid, program_id) => {
            match harness.provider.provider_program_node(
                ProviderFlags::default(),
                &harness.port,
                ProcessId(pid),
                crate::provider::types::NATIVE_ENGINE_ID,
                program_id,
            ) {
                Ok(node) => println!("[*] Program node for process {}", node.process_id()),
                Err(e) => println!("{} {}", "[!]".red(), e),
            }
        }
        ParsedCommand::Help => print_help(),
        ParsedCommand::Quit => {
            println!("[*] Shutting down...");
            return false;
        }
        ParsedCommand::Unknown(input) => {
            println!("{} Unknown command: '{}'", "[!]".red(), input);
            println!("    Type '?' for help");
        }
    }
    true
}

/// Run the harness REPL
pub fn run_cli() -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut harness = Harness::new();

    println!("{}", "Fulcrum harness - type '?' for help, 'q' to quit".cyan());

    loop {
        let prompt = HarnessPrompt {
            pending: harness.pending.len(),
            bound: harness.bound.len(),
        };
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                if !execute_command(&mut harness, cmd) {
                    break;
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}
