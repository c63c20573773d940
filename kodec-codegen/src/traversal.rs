//! Worklist driving the fixed-point type traversal.

use std::collections::HashSet;

use indexmap::IndexSet;
use kodec_ir::TypeId;

/// Pending/seen bookkeeping for the type traversal.
///
/// A type is never pending and seen at the same time, and once seen it is
/// never enqueued again. Pending types are popped last-in-first-out. The
/// order only affects where codecs land in the output, never which ones are
/// generated.
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    pending: IndexSet<TypeId>,
    seen: HashSet<TypeId>,
    top_level: HashSet<TypeId>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a type unless it was already seen or is pending.
    ///
    /// Returns true if the type was newly enqueued.
    pub fn request(&mut self, id: TypeId) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.pending.insert(id)
    }

    /// Enqueue a type and mark it as needing entry points.
    pub fn request_top_level(&mut self, id: TypeId) {
        self.request(id);
        self.top_level.insert(id);
    }

    /// Take the next pending type and mark it seen.
    pub fn pop(&mut self) -> Option<TypeId> {
        let id = self.pending.pop()?;
        self.seen.insert(id);
        Some(id)
    }

    /// Returns true if entry points were requested for this type.
    pub fn is_top_level(&self, id: TypeId) -> bool {
        self.top_level.contains(&id)
    }

    pub fn is_seen(&self, id: TypeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn is_pending(&self, id: TypeId) -> bool {
        self.pending.contains(&id)
    }

    /// Returns true once no pending types remain.
    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
