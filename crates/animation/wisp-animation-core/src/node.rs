//! Animation tree nodes.
//!
//! One struct carries the identity every node shares (name, parent link,
//! state); a closed enum carries the five variant payloads. Traversals
//! dispatch through a single exhaustive `match` per site, so adding a
//! variant is a compile error everywhere it matters.

use crate::grid::GridAnimation;
use crate::ids::NodeId;
use crate::property::PropertyAnimation;
use crate::script::ScriptAnimation;

/// Play state shared by every node and by script resources.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Variant tag, used for UI display and the persistence boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    ParallelGroup,
    SequentialGroup,
    Property,
    Grid,
    Script,
}

impl NodeKind {
    /// Stable lowercase name used by the persistence boundary.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::ParallelGroup => "parallel_group",
            NodeKind::SequentialGroup => "sequential_group",
            NodeKind::Property => "property_animation",
            NodeKind::Grid => "grid_animation",
            NodeKind::Script => "script_animation",
        }
    }

    /// Parse a stored name; unknown strings fall back to `ParallelGroup`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "parallel_group" => NodeKind::ParallelGroup,
            "sequential_group" => NodeKind::SequentialGroup,
            "property_animation" => NodeKind::Property,
            "grid_animation" => NodeKind::Grid,
            "script_animation" => NodeKind::Script,
            _ => {
                log::warn!("unknown animation type \"{name}\", defaulting to parallel_group");
                NodeKind::ParallelGroup
            }
        }
    }
}

/// Ordered child collection of a parallel group. Insertion order is the
/// iteration order.
#[derive(Clone, Debug, Default)]
pub struct ParallelGroup {
    pub children: Vec<NodeId>,
}

/// Ordered child collection of a sequential group plus the active index.
/// Exactly one child runs at a time; order = insertion order.
#[derive(Clone, Debug, Default)]
pub struct SequentialGroup {
    pub children: Vec<NodeId>,
    pub current: usize,
}

/// Variant payloads.
#[derive(Debug)]
pub enum AnimationKind {
    ParallelGroup(ParallelGroup),
    SequentialGroup(SequentialGroup),
    Property(PropertyAnimation),
    Grid(GridAnimation),
    Script(ScriptAnimation),
}

/// A node of the animation tree.
#[derive(Debug)]
pub struct Animation {
    pub name: String,
    /// Non-owning back-reference; `None` only for the tree root.
    pub(crate) parent: Option<NodeId>,
    pub(crate) state: State,
    pub(crate) kind: AnimationKind,
}

impl Animation {
    pub fn parallel_group(name: &str) -> Self {
        Self::with_kind(name, AnimationKind::ParallelGroup(ParallelGroup::default()))
    }

    pub fn sequential_group(name: &str) -> Self {
        Self::with_kind(
            name,
            AnimationKind::SequentialGroup(SequentialGroup::default()),
        )
    }

    pub fn property(name: &str, anim: PropertyAnimation) -> Self {
        Self::with_kind(name, AnimationKind::Property(anim))
    }

    pub fn grid(name: &str, anim: GridAnimation) -> Self {
        Self::with_kind(name, AnimationKind::Grid(anim))
    }

    pub fn script(name: &str, anim: ScriptAnimation) -> Self {
        Self::with_kind(name, AnimationKind::Script(anim))
    }

    fn with_kind(name: &str, kind: AnimationKind) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            state: State::Stopped,
            kind,
        }
    }

    #[inline]
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            AnimationKind::ParallelGroup(_) => NodeKind::ParallelGroup,
            AnimationKind::SequentialGroup(_) => NodeKind::SequentialGroup,
            AnimationKind::Property(_) => NodeKind::Property,
            AnimationKind::Grid(_) => NodeKind::Grid,
            AnimationKind::Script(_) => NodeKind::Script,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut AnimationKind {
        &mut self.kind
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(
            self.kind,
            AnimationKind::ParallelGroup(_) | AnimationKind::SequentialGroup(_)
        )
    }

    /// Children of a group node; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            AnimationKind::ParallelGroup(g) => &g.children,
            AnimationKind::SequentialGroup(g) => &g.children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            AnimationKind::ParallelGroup(g) => Some(&mut g.children),
            AnimationKind::SequentialGroup(g) => Some(&mut g.children),
            _ => None,
        }
    }
}
