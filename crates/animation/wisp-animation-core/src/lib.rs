//! Wisp Animation Core (renderer-agnostic)
//!
//! A tree of time-driven animation nodes that mutate sprite properties
//! frame by frame: easing curves, parallel/sequential composition, named
//! property mutators, parametric grid deformations, script delegation, and
//! a manager exposing the tree-wide lifecycle operations.
//!
//! Single-threaded by design: every operation runs to completion on the
//! caller's thread and structure mutation never interleaves with traversal.

pub mod easing;
pub mod grid;
pub mod grid_function;
pub mod ids;
pub mod manager;
pub mod node;
pub mod property;
pub mod script;
pub mod stored;

// Re-exports for consumers (host application / UI)
pub use easing::{Direction, Easing, EasingCurve, LoopMode};
pub use grid::GridAnimation;
pub use grid_function::{
    catalog, AnchorBinding, DeformFn, GridFunction, GridFunctionCatalog, ParameterInfo,
    ParameterType, ParameterValue,
};
pub use ids::{IdAllocator, NodeId, ScriptId};
pub use manager::AnimationManager;
pub use node::{Animation, AnimationKind, NodeKind, ParallelGroup, SequentialGroup, State};
pub use property::PropertyAnimation;
pub use script::{Script, ScriptAnimation, Scripts};
pub use stored::{
    load_tree, parse_stored_tree_json, serialize_tree, stored_tree_to_json, DeserializeContext,
    SerializeContext, StoredCurve, StoredError, StoredNode, StoredParamValue, StoredParameter,
    StoredTree,
};
pub use wisp_api_core::{Colorf, PropertyError, Recti, Sprite, SpriteId, Sprites, Vec2};
