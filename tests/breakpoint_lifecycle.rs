//! Integration tests for the bound/pending breakpoint lifecycle.

use fulcrum::{
    BreakpointCondition, BreakpointResolution, BreakpointState, DebuggeeError, DebuggeeProcess,
    Engine, EngineError, PassCount,
};
use std::sync::{Arc, Mutex};
use std::thread;

/// Debuggee double that records every add/remove so tests can assert how the
/// engine drove the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add(u64),
    Remove(u64),
}

#[derive(Default)]
struct RecordingDebuggee {
    ops: Arc<Mutex<Vec<Op>>>,
}

impl RecordingDebuggee {
    fn with_log() -> (Self, Arc<Mutex<Vec<Op>>>) {
        let debuggee = Self::default();
        let log = debuggee.ops.clone();
        (debuggee, log)
    }
}

impl DebuggeeProcess for RecordingDebuggee {
    fn add_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError> {
        self.ops.lock().unwrap().push(Op::Add(address));
        Ok(())
    }

    fn remove_breakpoint(&mut self, address: u64) -> Result<(), DebuggeeError> {
        self.ops.lock().unwrap().push(Op::Remove(address));
        Ok(())
    }
}

fn removals(log: &Arc<Mutex<Vec<Op>>>, address: u64) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|op| **op == Op::Remove(address))
        .count()
}

#[test]
fn bind_delete_scenario() {
    let (debuggee, log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));

    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();

    assert_eq!(bb.pending_breakpoint().id(), pb.id());
    assert_eq!(bb.state(), BreakpointState::Enabled);
    assert_eq!(log.lock().unwrap().as_slice(), &[Op::Add(0x1000)]);

    bb.delete().unwrap();
    assert_eq!(bb.state(), BreakpointState::Deleted);
    assert!(pb.bound_breakpoints().unwrap().is_empty());

    // Second delete is a no-op success, with no second notification or
    // debuggee call
    bb.delete().unwrap();
    assert_eq!(bb.state(), BreakpointState::Deleted);
    assert_eq!(removals(&log, 0x1000), 1);
}

#[test]
fn state_priority_is_exhaustive() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();

    // enabled, not deleted
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x10))
        .unwrap();
    assert_eq!(bb.state(), BreakpointState::Enabled);

    // disabled, not deleted
    bb.enable(false).unwrap();
    assert_eq!(bb.state(), BreakpointState::Disabled);

    // deleted wins over disabled
    bb.delete().unwrap();
    assert_eq!(bb.state(), BreakpointState::Deleted);

    // deleted wins over enabled: enable after delete is accepted but the
    // observable state stays Deleted
    let bb2 = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x20))
        .unwrap();
    bb2.delete().unwrap();
    bb2.enable(true).unwrap();
    assert_eq!(bb2.state(), BreakpointState::Deleted);
}

#[test]
fn enable_round_trip() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();

    bb.enable(false).unwrap();
    bb.enable(true).unwrap();
    assert_eq!(bb.state(), BreakpointState::Enabled);
}

#[test]
fn pending_enable_round_trip() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();

    assert!(pb.is_enabled().unwrap());
    pb.enable(false).unwrap();
    assert!(!pb.is_enabled().unwrap());
    pb.enable(true).unwrap();
    assert!(pb.is_enabled().unwrap());

    pb.delete().unwrap();
    assert!(matches!(
        pb.is_enabled(),
        Err(EngineError::UnknownPendingBreakpoint(_))
    ));
}

#[test]
fn resolution_is_preserved() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::in_module(0x4018a0, "target.exe"))
        .unwrap();

    assert_eq!(bb.resolution().address, 0x4018a0);
    assert_eq!(bb.resolution().module.as_deref(), Some("target.exe"));
    assert_eq!(bb.address(), 0x4018a0);
}

#[test]
fn capability_stubs_always_refuse() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();

    assert!(matches!(
        bb.hit_count(),
        Err(EngineError::NotSupported(_))
    ));
    assert!(matches!(
        bb.set_condition(BreakpointCondition {
            expression: "x == 3".into()
        }),
        Err(EngineError::NotSupported(_))
    ));
    assert!(matches!(
        bb.set_hit_count(7),
        Err(EngineError::NotSupported(_))
    ));
    assert!(matches!(
        bb.set_pass_count(PassCount(2)),
        Err(EngineError::NotSupported(_))
    ));

    // Refusal never disturbs the breakpoint itself
    assert_eq!(bb.state(), BreakpointState::Enabled);
}

#[test]
fn pending_delete_cascades_to_children() {
    let (debuggee, log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb1 = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();
    let bb2 = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x2000))
        .unwrap();

    pb.delete().unwrap();
    assert_eq!(bb1.state(), BreakpointState::Deleted);
    assert_eq!(bb2.state(), BreakpointState::Deleted);
    assert_eq!(removals(&log, 0x1000), 1);
    assert_eq!(removals(&log, 0x2000), 1);

    // Cascade is idempotent too
    pb.delete().unwrap();
    assert_eq!(removals(&log, 0x1000), 1);

    // Binding against the removed request is refused
    assert!(matches!(
        engine.bind_breakpoint(&pb, BreakpointResolution::at(0x3000)),
        Err(EngineError::UnknownPendingBreakpoint(_))
    ));
}

#[test]
fn concurrent_deletes_remove_exactly_once() {
    let (debuggee, log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bb = bb.clone();
            thread::spawn(move || bb.delete())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(bb.state(), BreakpointState::Deleted);
    assert_eq!(removals(&log, 0x1000), 1);
}

#[test]
fn calls_after_engine_drop_fail_cleanly() {
    let (debuggee, _log) = RecordingDebuggee::with_log();
    let engine = Engine::new(Box::new(debuggee));
    let pb = engine.create_pending_breakpoint().unwrap();
    let bb = engine
        .bind_breakpoint(&pb, BreakpointResolution::at(0x1000))
        .unwrap();
    drop(engine);

    assert!(matches!(bb.delete(), Err(EngineError::ExecutorStopped)));
    assert!(matches!(
        pb.bound_breakpoints(),
        Err(EngineError::ExecutorStopped)
    ));

    // Read accessors stay available: they never depend on the executor
    assert_eq!(bb.state(), BreakpointState::Enabled);
    assert_eq!(bb.address(), 0x1000);
}
