//! Stored tree model: the serde-facing records the persistence boundary
//! reads and writes, plus conversion to and from a live manager tree.
//!
//! Notes:
//! - Nodes are listed in pre-order, so a parent's list index always precedes
//!   its children; `parent: None` means "attach under the root group".
//! - Sprite and script references go through caller-supplied id maps; the
//!   engine never assumes its handles are stable across sessions.
//! - Unknown enum strings (node type, easing, direction, loop mode) fall
//!   back to documented defaults instead of failing the load. A missing
//!   grid function leaves the animation unbound for deformation but keeps
//!   the parameter values that were on disk.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wisp_api_core::SpriteId;

use crate::easing::{Direction, Easing, EasingCurve, LoopMode};
use crate::grid::GridAnimation;
use crate::grid_function::{catalog, ParameterType, ParameterValue};
use crate::ids::{NodeId, ScriptId};
use crate::manager::AnimationManager;
use crate::node::{Animation, AnimationKind, NodeKind};
use crate::property::PropertyAnimation;
use crate::script::ScriptAnimation;

#[derive(Error, Debug)]
pub enum StoredError {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Curve fields as persisted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredCurve {
    #[serde(rename = "type")]
    pub kind: String,
    pub direction: String,
    pub loop_mode: String,
    pub start_time: f32,
    pub end_time: f32,
    pub scale: f32,
    pub shift: f32,
}

impl StoredCurve {
    pub fn from_curve(curve: &EasingCurve) -> Self {
        Self {
            kind: curve.kind().name().to_string(),
            direction: curve.direction().name().to_string(),
            loop_mode: curve.loop_mode().name().to_string(),
            start_time: curve.start(),
            end_time: curve.end(),
            scale: curve.scale(),
            shift: curve.shift(),
        }
    }

    pub fn to_curve(&self) -> EasingCurve {
        let mut curve = EasingCurve::new(
            Easing::from_name(&self.kind),
            LoopMode::from_name(&self.loop_mode),
        );
        curve.set_direction(Direction::from_name(&self.direction));
        curve.set_start(self.start_time);
        curve.set_end(self.end_time);
        curve.set_scale(self.scale);
        curve.set_shift(self.shift);
        curve.reset();
        curve
    }
}

/// Scalar or 2-D parameter value as persisted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StoredParamValue {
    Float(f32),
    Vector([f32; 2]),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredParameter {
    pub name: String,
    pub value: StoredParamValue,
}

/// One node of the persisted tree. Variant-specific fields are optional and
/// omitted for the variants that do not carry them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<StoredCurve>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<StoredParameter>>,
}

/// The persisted tree: every node below the root, pre-order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredTree {
    pub animations: Vec<StoredNode>,
}

/// Caller-supplied object→identifier maps used while serializing.
#[derive(Default, Debug)]
pub struct SerializeContext {
    pub sprite_keys: HashMap<SpriteId, u32>,
    pub script_keys: HashMap<ScriptId, u32>,
}

/// Caller-supplied identifier→object maps used while loading.
#[derive(Default, Debug)]
pub struct DeserializeContext {
    pub sprites: HashMap<u32, SpriteId>,
    pub scripts: HashMap<u32, ScriptId>,
}

/// Flatten the manager's tree into its stored form.
pub fn serialize_tree(manager: &AnimationManager, ctx: &SerializeContext) -> StoredTree {
    let order = manager.descendants_of(manager.root());
    let index_of: HashMap<NodeId, usize> =
        order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut animations = Vec::with_capacity(order.len());
    for id in &order {
        let node = manager.node(*id);
        let mut stored = StoredNode {
            name: node.name.clone(),
            kind: node.node_kind().name().to_string(),
            parent: node
                .parent()
                .filter(|p| *p != manager.root())
                .map(|p| index_of[&p]),
            ..Default::default()
        };

        match node.kind() {
            AnimationKind::ParallelGroup(_) | AnimationKind::SequentialGroup(_) => {}
            AnimationKind::Property(anim) => {
                stored.sprite = anim.sprite().and_then(|s| ctx.sprite_keys.get(&s).copied());
                stored.speed = Some(anim.speed());
                stored.curve = Some(StoredCurve::from_curve(anim.curve()));
                stored.property_name = anim.property_name().map(str::to_string);
            }
            AnimationKind::Grid(anim) => {
                stored.sprite = anim.sprite().and_then(|s| ctx.sprite_keys.get(&s).copied());
                stored.speed = Some(anim.speed());
                stored.curve = Some(StoredCurve::from_curve(anim.curve()));
                if let Some(function) = anim.function() {
                    stored.function_name = Some(function.name().to_string());
                    let parameters = function
                        .parameters()
                        .iter()
                        .zip(anim.parameters())
                        .map(|(info, value)| StoredParameter {
                            name: info.name.to_string(),
                            value: match info.ty {
                                ParameterType::Float => StoredParamValue::Float(value.value0),
                                ParameterType::Vector2f => {
                                    StoredParamValue::Vector([value.value0, value.value1])
                                }
                            },
                        })
                        .collect();
                    stored.parameters = Some(parameters);
                }
            }
            AnimationKind::Script(anim) => {
                stored.sprite = anim.sprite().and_then(|s| ctx.sprite_keys.get(&s).copied());
                stored.script = anim.script().and_then(|s| ctx.script_keys.get(&s).copied());
                stored.speed = Some(anim.speed());
            }
        }
        animations.push(stored);
    }
    StoredTree { animations }
}

/// Rebuild a stored tree under the manager's root group. Returns the created
/// node ids in stored order.
pub fn load_tree(
    manager: &mut AnimationManager,
    tree: &StoredTree,
    ctx: &DeserializeContext,
) -> Vec<NodeId> {
    let mut created: Vec<NodeId> = Vec::with_capacity(tree.animations.len());
    for stored in &tree.animations {
        let anim = build_node(stored, ctx);
        let parent = stored
            .parent
            .and_then(|idx| created.get(idx).copied())
            .unwrap_or_else(|| manager.root());
        // A corrupt parent reference (index pointing at a leaf) falls back
        // to the root instead of breaking a tree invariant.
        let parent = if manager.node(parent).is_group() {
            parent
        } else {
            log::warn!(
                "stored animation \"{}\" points at a non-group parent, attaching to root",
                stored.name
            );
            manager.root()
        };
        let id = manager.add(parent, anim);
        created.push(id);
    }
    created
}

fn build_node(stored: &StoredNode, ctx: &DeserializeContext) -> Animation {
    let sprite = stored.sprite.and_then(|key| ctx.sprites.get(&key).copied());
    let speed = stored.speed.unwrap_or(1.0);
    let curve = stored
        .curve
        .as_ref()
        .map(StoredCurve::to_curve)
        .unwrap_or_default();

    match NodeKind::from_name(&stored.kind) {
        NodeKind::ParallelGroup => Animation::parallel_group(&stored.name),
        NodeKind::SequentialGroup => Animation::sequential_group(&stored.name),
        NodeKind::Property => {
            let mut anim = PropertyAnimation::new(curve);
            anim.set_sprite(sprite);
            anim.set_speed(speed);
            if let Some(property_name) = &stored.property_name {
                if anim.set_property(property_name).is_err() {
                    log::warn!(
                        "unknown sprite property \"{property_name}\" in \"{}\", animation left unbound",
                        stored.name
                    );
                }
            }
            Animation::property(&stored.name, anim)
        }
        NodeKind::Grid => {
            let mut anim = GridAnimation::new(curve);
            anim.set_sprite(sprite);
            anim.set_speed(speed);
            let stored_params = stored.parameters.as_deref().unwrap_or(&[]);
            if let Some(function_name) = stored.function_name.as_deref() {
                match catalog().get(function_name) {
                    Some(function) => {
                        anim.set_function(Some(function));
                        for (i, stored_param) in stored_params.iter().enumerate() {
                            if i >= function.num_parameters()
                                || function.parameter_info(i).name != stored_param.name
                            {
                                continue;
                            }
                            let slot = &mut anim.parameters_mut()[i];
                            match stored_param.value {
                                StoredParamValue::Float(v) => slot.value0 = v,
                                StoredParamValue::Vector([x, y]) => {
                                    slot.value0 = x;
                                    slot.value1 = y;
                                }
                            }
                        }
                    }
                    None => {
                        log::warn!(
                            "grid function \"{function_name}\" not registered, \"{}\" kept unbound",
                            stored.name
                        );
                        anim.set_parameters(
                            stored_params
                                .iter()
                                .map(|p| match p.value {
                                    StoredParamValue::Float(v) => ParameterValue::scalar(v),
                                    StoredParamValue::Vector([x, y]) => {
                                        ParameterValue::vector(x, y)
                                    }
                                })
                                .collect(),
                        );
                    }
                }
            }
            Animation::grid(&stored.name, anim)
        }
        NodeKind::Script => {
            let mut anim = ScriptAnimation::new();
            anim.set_sprite(sprite);
            anim.set_script(stored.script.and_then(|key| ctx.scripts.get(&key).copied()));
            anim.set_speed(speed);
            Animation::script(&stored.name, anim)
        }
    }
}

/// Parse a stored tree from its JSON encoding.
pub fn parse_stored_tree_json(s: &str) -> Result<StoredTree, StoredError> {
    Ok(serde_json::from_str(s)?)
}

/// Encode a stored tree as JSON.
pub fn stored_tree_to_json(tree: &StoredTree) -> Result<String, StoredError> {
    Ok(serde_json::to_string_pretty(tree)?)
}
