//! Identifiers and simple allocators for core entities.

use serde::{Deserialize, Serialize};

/// Handle to a node in the animation tree arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle to an externally-owned script resource.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ScriptId(pub u32);

/// Monotonic allocator for NodeId. Dense indices improve cache locality;
/// IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_node: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
