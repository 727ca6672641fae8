//! Id-indexed breakpoint storage.
//!
//! The arena is the sole owner of breakpoint records. Pending records hold
//! child ids and bound records hold a parent id, so the parent/child
//! relationship never forms an ownership cycle. Only the executor thread
//! touches this structure.

use crate::breakpoint::{BoundBreakpointId, BoundShared, PendingBreakpointId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
pub(crate) struct PendingRecord {
    pub(crate) enabled: bool,
    pub(crate) children: Vec<BoundBreakpointId>,
}

#[derive(Debug, Default)]
pub(crate) struct BreakpointArena {
    next_pending: u32,
    next_bound: u32,
    pending: HashMap<PendingBreakpointId, PendingRecord>,
    bound: HashMap<BoundBreakpointId, Arc<BoundShared>>,
}

impl BreakpointArena {
    pub(crate) fn create_pending(&mut self) -> PendingBreakpointId {
        let id = PendingBreakpointId(self.next_pending);
        self.next_pending += 1;
        self.pending.insert(
            id,
            PendingRecord {
                enabled: true,
                children: Vec::new(),
            },
        );
        id
    }

    pub(crate) fn contains_pending(&self, id: PendingBreakpointId) -> bool {
        self.pending.contains_key(&id)
    }

    pub(crate) fn set_pending_enabled(&mut self, id: PendingBreakpointId, enable: bool) {
        if let Some(record) = self.pending.get_mut(&id) {
            record.enabled = enable;
        }
    }

    pub(crate) fn pending_enabled(&self, id: PendingBreakpointId) -> Option<bool> {
        self.pending.get(&id).map(|record| record.enabled)
    }

    /// Register a new bound record under its parent. The caller must have
    /// checked that the parent exists.
    pub(crate) fn insert_bound(
        &mut self,
        parent: PendingBreakpointId,
        shared: Arc<BoundShared>,
    ) -> BoundBreakpointId {
        let id = BoundBreakpointId(self.next_bound);
        self.next_bound += 1;
        self.bound.insert(id, shared);
        if let Some(record) = self.pending.get_mut(&parent) {
            record.children.push(id);
        }
        id
    }

    pub(crate) fn bound(&self, id: BoundBreakpointId) -> Option<&Arc<BoundShared>> {
        self.bound.get(&id)
    }

    /// Drop a bound record and unlist it from its parent. The parent may
    /// already be gone when a cascade is in progress.
    pub(crate) fn detach_child(&mut self, parent: PendingBreakpointId, child: BoundBreakpointId) {
        self.bound.remove(&child);
        if let Some(record) = self.pending.get_mut(&parent) {
            record.children.retain(|c| *c != child);
        }
    }

    pub(crate) fn remove_pending(&mut self, id: PendingBreakpointId) -> Option<PendingRecord> {
        self.pending.remove(&id)
    }

    /// Live children of a pending breakpoint, with their shared records
    pub(crate) fn children_of(
        &self,
        id: PendingBreakpointId,
    ) -> Vec<(BoundBreakpointId, Arc<BoundShared>)> {
        let Some(record) = self.pending.get(&id) else {
            return Vec::new();
        };
        record
            .children
            .iter()
            .filter_map(|child| self.bound.get(child).map(|shared| (*child, shared.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::BreakpointResolution;

    fn shared_at(arena: &mut BreakpointArena, parent: PendingBreakpointId, address: u64) -> BoundBreakpointId {
        let shared = Arc::new(BoundShared::new(BreakpointResolution::at(address), parent));
        arena.insert_bound(parent, shared)
    }

    #[test]
    fn children_track_inserts_and_detaches() {
        let mut arena = BreakpointArena::default();
        let pb = arena.create_pending();
        let a = shared_at(&mut arena, pb, 0x1000);
        let b = shared_at(&mut arena, pb, 0x2000);
        assert_eq!(arena.children_of(pb).len(), 2);

        arena.detach_child(pb, a);
        let rest = arena.children_of(pb);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].0, b);
        assert!(arena.bound(a).is_none());
    }

    #[test]
    fn detach_tolerates_missing_parent() {
        let mut arena = BreakpointArena::default();
        let pb = arena.create_pending();
        let child = shared_at(&mut arena, pb, 0x1000);
        arena.remove_pending(pb);

        // Cascade path: parent record is already gone
        arena.detach_child(pb, child);
        assert!(arena.bound(child).is_none());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut arena = BreakpointArena::default();
        let first = arena.create_pending();
        arena.remove_pending(first);
        let second = arena.create_pending();
        assert_ne!(first, second);
    }
}
