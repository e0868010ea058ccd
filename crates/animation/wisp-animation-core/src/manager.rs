//! AnimationManager: tree ownership and the tree-wide recursive operations.
//!
//! The manager owns every node in an arena and exposes the only mutation
//! surface for tree structure; groups never append or remove their own
//! children. All operations run to completion on the caller's thread —
//! structure mutation and `update` must never interleave (single-writer
//! discipline, enforced by the host).
//!
//! Leaves reference sprites and scripts by id; the host passes its stores
//! into the calls that need them. External owners must call
//! `remove_sprite`/`remove_script` before destroying a resource, or the
//! affected leaves keep a stale id and go inert.

use wisp_api_core::{SpriteId, Sprites};

use crate::grid_function::AnchorBinding;
use crate::ids::{IdAllocator, NodeId, ScriptId};
use crate::node::{Animation, AnimationKind, NodeKind, State};
use crate::script::Scripts;

/// Node storage. Dense vector with linear lookup; trees in this tool are
/// tens of nodes, not thousands.
#[derive(Default, Debug)]
struct NodeArena {
    items: Vec<(NodeId, Animation)>,
}

impl NodeArena {
    fn insert(&mut self, id: NodeId, node: Animation) {
        self.items.push((id, node));
    }

    fn get(&self, id: NodeId) -> Option<&Animation> {
        self.items
            .iter()
            .find_map(|(nid, n)| if *nid == id { Some(n) } else { None })
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Animation> {
        self.items
            .iter_mut()
            .find_map(|(nid, n)| if *nid == id { Some(n) } else { None })
    }

    fn remove(&mut self, id: NodeId) -> Option<Animation> {
        let idx = self.items.iter().position(|(nid, _)| *nid == id)?;
        Some(self.items.remove(idx).1)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// The animation subsystem's sole entry point.
pub struct AnimationManager {
    arena: NodeArena,
    ids: IdAllocator,
    root: NodeId,
}

impl AnimationManager {
    pub fn new() -> Self {
        let mut ids = IdAllocator::new();
        let mut arena = NodeArena::default();
        let root = ids.alloc_node();
        arena.insert(root, Animation::parallel_group("root"));
        Self { arena, ids, root }
    }

    /// The root parallel group. Never removed.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn state(&self) -> State {
        self.node(self.root).state()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists.
        self.arena.len() <= 1
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some()
    }

    /// Read access to a node. Panics on an unknown id: ids are only handed
    /// out by this manager, so a miss is a tree-invariant breach.
    pub fn node(&self, id: NodeId) -> &Animation {
        self.arena.get(id).expect("unknown animation node")
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Animation {
        self.arena.get_mut(id).expect("unknown animation node")
    }

    /// Children of a group node (empty for leaves), for enumeration/UI.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Pre-order depth-first listing of the subtree below `id`, excluding
    /// `id` itself. Parents precede their children.
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.node(id).children() {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Append a node under a group and hand back its id. The parent must be
    /// a group; inserting under a leaf is a caller error.
    pub fn add(&mut self, parent: NodeId, mut anim: Animation) -> NodeId {
        assert!(
            self.node(parent).is_group(),
            "parent of a new animation must be a group"
        );
        let id = self.ids.alloc_node();
        anim.parent = Some(parent);
        self.arena.insert(id, anim);
        self.node_mut(parent)
            .children_mut()
            .expect("parent is a group")
            .push(id);
        id
    }

    // ----- tree-wide playback -----

    /// Advance the whole tree by `delta_time`. Leaves mutate their bound
    /// sprites directly; completion signaling flows back up through group
    /// state aggregation.
    pub fn update(&mut self, delta_time: f32, sprites: &mut Sprites, scripts: &mut Scripts) {
        self.update_node(self.root, delta_time, sprites, scripts);
    }

    /// Reset every node's time/position without changing play states.
    pub fn reset(&mut self) {
        self.reset_node(self.root);
    }

    pub fn play(&mut self, sprites: &mut Sprites, scripts: &mut Scripts) {
        self.play_node(self.root, sprites, scripts);
    }

    pub fn pause(&mut self) {
        self.pause_node(self.root);
    }

    pub fn stop(&mut self, scripts: &mut Scripts) {
        self.stop_node(self.root, scripts);
    }

    /// Play a single node (and, for groups, its subtree). The UI drives
    /// individual nodes through these; group aggregation picks the states
    /// up on the next `update`.
    pub fn play_animation(&mut self, id: NodeId, sprites: &mut Sprites, scripts: &mut Scripts) {
        self.play_node(id, sprites, scripts);
    }

    pub fn pause_animation(&mut self, id: NodeId) {
        self.pause_node(id);
    }

    pub fn stop_animation(&mut self, id: NodeId, scripts: &mut Scripts) {
        self.stop_node(id, scripts);
    }

    // ----- structure mutation -----

    /// Detach a node from its parent and drop its whole subtree. Bound
    /// resources are released child-before-parent: every descendant is
    /// stopped and unbound before its parent, so no partially-released node
    /// is ever reachable.
    pub fn remove_animation(&mut self, id: NodeId, scripts: &mut Scripts) {
        assert!(id != self.root, "the root group cannot be removed");
        let parent = self.node(id).parent().expect("non-root node has a parent");
        self.release_node(id, scripts);

        let children = self
            .node_mut(parent)
            .children_mut()
            .expect("parent is a group");
        let pos = children
            .iter()
            .position(|c| *c == id)
            .expect("node listed in its parent's children");
        children.remove(pos);

        self.node_mut(id).parent = None;
        self.arena.remove(id).expect("node present in the arena");
    }

    /// Empty the root group, releasing every subtree.
    pub fn clear(&mut self, scripts: &mut Scripts) {
        let top: Vec<NodeId> = self.node(self.root).children().to_vec();
        for id in top.into_iter().rev() {
            self.remove_animation(id, scripts);
        }
    }

    /// Remove every Property/Grid/Script leaf bound to `sprite`, anywhere in
    /// the tree. Groups are never removed, even when emptied. Called by the
    /// host before it destroys the sprite.
    pub fn remove_sprite(&mut self, sprite: SpriteId, scripts: &mut Scripts) {
        self.prune_group(self.root, scripts, &|kind| match kind {
            AnimationKind::Property(a) => a.sprite() == Some(sprite),
            AnimationKind::Grid(a) => a.sprite() == Some(sprite),
            AnimationKind::Script(a) => a.sprite() == Some(sprite),
            _ => false,
        });
    }

    /// Remove every ScriptAnimation bound to `script`. Called by the host
    /// before it destroys the script resource.
    pub fn remove_script(&mut self, script: ScriptId, scripts: &mut Scripts) {
        self.prune_group(self.root, scripts, &|kind| {
            matches!(kind, AnimationKind::Script(a) if a.script() == Some(script))
        });
    }

    /// Re-run the init entry point of every ScriptAnimation bound to
    /// `script`, preserving each node's externally visible state.
    pub fn reload_script(
        &mut self,
        script: ScriptId,
        sprites: &mut Sprites,
        scripts: &mut Scripts,
    ) {
        self.replay_matching(sprites, scripts, &|kind| {
            matches!(kind, AnimationKind::Script(a) if a.script() == Some(script))
        });
    }

    /// Same play/restore pattern as [`reload_script`], selecting script
    /// nodes by bound sprite. Called when a sprite is newly attached so its
    /// scripts run their init path once.
    pub fn init_scripts_for_sprite(
        &mut self,
        sprite: SpriteId,
        sprites: &mut Sprites,
        scripts: &mut Scripts,
    ) {
        self.replay_matching(sprites, scripts, &|kind| {
            matches!(kind, AnimationKind::Script(a) if a.sprite() == Some(sprite))
        });
    }

    /// Rebind every leaf under `group` (inclusive) whose bound sprite
    /// differs from `sprite`. Used when duplicating or retargeting a
    /// subtree onto a new sprite.
    pub fn override_sprite(&mut self, group: NodeId, sprite: SpriteId) {
        let mut nodes = vec![group];
        nodes.extend(self.descendants_of(group));
        for id in nodes {
            match self.node_mut(id).kind_mut() {
                AnimationKind::Property(a) if a.sprite() != Some(sprite) => {
                    a.set_sprite(Some(sprite));
                }
                AnimationKind::Grid(a) if a.sprite() != Some(sprite) => {
                    a.set_sprite(Some(sprite));
                }
                AnimationKind::Script(a) if a.sprite() != Some(sprite) => {
                    a.set_sprite(Some(sprite));
                }
                _ => {}
            }
        }
    }

    /// One-shot synchronization of anchor-bound grid parameters: for every
    /// GridAnimation bound to `sprite`, parameters whose descriptors declare
    /// an anchor binding are overwritten with the sprite's current grid
    /// anchor coordinates. Later anchor changes do not propagate until this
    /// is called again.
    pub fn assign_grid_anchor_to_parameters(&mut self, sprite: SpriteId, sprites: &Sprites) {
        let Some(anchor) = sprites.get(sprite).map(|s| s.grid_anchor_point) else {
            return;
        };
        for id in self.descendants_of(self.root) {
            if let AnimationKind::Grid(anim) = self.node_mut(id).kind_mut() {
                if anim.sprite() != Some(sprite) {
                    continue;
                }
                let Some(function) = anim.function() else {
                    continue;
                };
                for (i, info) in function.parameters().iter().enumerate() {
                    let param = &mut anim.parameters_mut()[i];
                    match info.anchor {
                        AnchorBinding::None => {}
                        AnchorBinding::X => param.value0 = anchor.x,
                        AnchorBinding::Y => param.value0 = anchor.y,
                        AnchorBinding::Xy => {
                            param.value0 = anchor.x;
                            param.value1 = anchor.y;
                        }
                    }
                }
            }
        }
    }

    // ----- recursive traversal (one closed match per site) -----

    fn update_node(&mut self, id: NodeId, dt: f32, sprites: &mut Sprites, scripts: &mut Scripts) {
        match self.node(id).node_kind() {
            NodeKind::ParallelGroup => {
                let children: Vec<NodeId> = self.node(id).children().to_vec();
                let mut all_stopped = true;
                for child in children {
                    self.update_node(child, dt, sprites, scripts);
                    if self.node(child).state() != State::Stopped {
                        all_stopped = false;
                    }
                }
                if all_stopped {
                    self.node_mut(id).state = State::Stopped;
                }
            }
            NodeKind::SequentialGroup => {
                if self.node(id).state() != State::Playing {
                    return;
                }
                let (children, current) = {
                    let AnimationKind::SequentialGroup(g) = self.node(id).kind() else {
                        unreachable!()
                    };
                    (g.children.clone(), g.current)
                };
                if children.is_empty() {
                    self.node_mut(id).state = State::Stopped;
                    return;
                }
                let current = current.min(children.len() - 1);
                let active = children[current];
                self.update_node(active, dt, sprites, scripts);
                if self.node(active).state() == State::Stopped {
                    let next = current + 1;
                    if next < children.len() {
                        if let AnimationKind::SequentialGroup(g) = self.node_mut(id).kind_mut() {
                            g.current = next;
                        }
                        self.play_node(children[next], sprites, scripts);
                    } else {
                        let node = self.node_mut(id);
                        node.state = State::Stopped;
                        if let AnimationKind::SequentialGroup(g) = node.kind_mut() {
                            g.current = 0;
                        }
                    }
                }
            }
            NodeKind::Property => {
                let node = self.node_mut(id);
                if node.state != State::Playing {
                    return;
                }
                let AnimationKind::Property(anim) = node.kind_mut() else {
                    unreachable!()
                };
                if let Some(sprite) = anim.sprite().and_then(|sid| sprites.get_mut(sid)) {
                    anim.update(sprite, dt);
                }
            }
            NodeKind::Grid => {
                let node = self.node_mut(id);
                if node.state != State::Playing {
                    return;
                }
                let AnimationKind::Grid(anim) = node.kind_mut() else {
                    unreachable!()
                };
                if let Some(sprite) = anim.sprite().and_then(|sid| sprites.get_mut(sid)) {
                    anim.update(sprite, dt);
                }
            }
            NodeKind::Script => {
                if self.node(id).state() != State::Playing {
                    return;
                }
                let (script_id, sprite_id, speed) = {
                    let AnimationKind::Script(anim) = self.node(id).kind() else {
                        unreachable!()
                    };
                    (anim.script(), anim.sprite(), anim.speed())
                };
                let (Some(script_id), Some(sprite_id)) = (script_id, sprite_id) else {
                    return;
                };
                let Some(sprite) = sprites.get_mut(sprite_id) else {
                    return;
                };
                let Some(script) = scripts.get_mut(script_id) else {
                    return;
                };
                script.update(sprite, speed * dt);
                // The script owns its transitions; adopt a reported stop so
                // sequential parents can advance.
                let stopped = script.state() == State::Stopped;
                if stopped {
                    self.node_mut(id).state = State::Stopped;
                }
            }
        }
    }

    fn play_node(&mut self, id: NodeId, sprites: &mut Sprites, scripts: &mut Scripts) {
        match self.node(id).node_kind() {
            NodeKind::ParallelGroup => {
                let children: Vec<NodeId> = self.node(id).children().to_vec();
                for child in children {
                    self.play_node(child, sprites, scripts);
                }
                self.node_mut(id).state = State::Playing;
            }
            NodeKind::SequentialGroup => {
                let (children, current) = {
                    let AnimationKind::SequentialGroup(g) = self.node(id).kind() else {
                        unreachable!()
                    };
                    (g.children.clone(), g.current)
                };
                if self.node(id).state() == State::Paused {
                    // Resume mid-sequence.
                    if let Some(&active) = children.get(current) {
                        self.play_node(active, sprites, scripts);
                    }
                } else {
                    if let AnimationKind::SequentialGroup(g) = self.node_mut(id).kind_mut() {
                        g.current = 0;
                    }
                    if let Some(&first) = children.first() {
                        self.play_node(first, sprites, scripts);
                    }
                }
                self.node_mut(id).state = State::Playing;
            }
            NodeKind::Property | NodeKind::Grid => {
                self.node_mut(id).state = State::Playing;
            }
            NodeKind::Script => {
                // Init re-runs on every play by design; reload and
                // re-attachment depend on it.
                let (script_id, sprite_id) = {
                    let AnimationKind::Script(anim) = self.node(id).kind() else {
                        unreachable!()
                    };
                    (anim.script(), anim.sprite())
                };
                if let (Some(script_id), Some(sprite_id)) = (script_id, sprite_id) {
                    if let Some(sprite) = sprites.get_mut(sprite_id) {
                        if let Some(script) = scripts.get_mut(script_id) {
                            script.play(sprite);
                        }
                    }
                }
                self.node_mut(id).state = State::Playing;
            }
        }
    }

    fn pause_node(&mut self, id: NodeId) {
        match self.node(id).node_kind() {
            NodeKind::ParallelGroup => {
                let children: Vec<NodeId> = self.node(id).children().to_vec();
                for child in children {
                    self.pause_node(child);
                }
            }
            NodeKind::SequentialGroup => {
                let active = {
                    let AnimationKind::SequentialGroup(g) = self.node(id).kind() else {
                        unreachable!()
                    };
                    g.children.get(g.current).copied()
                };
                if let Some(active) = active {
                    self.pause_node(active);
                }
            }
            _ => {}
        }
        let node = self.node_mut(id);
        if node.state == State::Playing {
            node.state = State::Paused;
        }
    }

    fn stop_node(&mut self, id: NodeId, scripts: &mut Scripts) {
        let children: Vec<NodeId> = self.node(id).children().to_vec();
        for child in children {
            self.stop_node(child, scripts);
        }
        let node = self.node_mut(id);
        match node.kind_mut() {
            AnimationKind::ParallelGroup(_) => {}
            AnimationKind::SequentialGroup(g) => g.current = 0,
            AnimationKind::Property(a) => a.curve_mut().reset(),
            AnimationKind::Grid(a) => a.curve_mut().reset(),
            AnimationKind::Script(a) => {
                if let Some(script_id) = a.script() {
                    if let Some(script) = scripts.get_mut(script_id) {
                        script.stop();
                    }
                }
            }
        }
        node.state = State::Stopped;
    }

    fn reset_node(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.node(id).children().to_vec();
        for child in children {
            self.reset_node(child);
        }
        match self.node_mut(id).kind_mut() {
            AnimationKind::SequentialGroup(g) => g.current = 0,
            AnimationKind::Property(a) => a.curve_mut().reset(),
            AnimationKind::Grid(a) => a.curve_mut().reset(),
            _ => {}
        }
    }

    /// Stop and unbind a subtree, children before parents, clearing group
    /// child lists. The nodes stay in the arena; callers drop them.
    fn release_node(&mut self, id: NodeId, scripts: &mut Scripts) {
        let children: Vec<NodeId> = self.node(id).children().to_vec();
        for child in children {
            self.release_node(child, scripts);
            self.node_mut(child).parent = None;
            self.arena.remove(child).expect("child present in the arena");
        }
        if let Some(kids) = self.node_mut(id).children_mut() {
            kids.clear();
        }

        let node = self.node_mut(id);
        match node.kind_mut() {
            AnimationKind::ParallelGroup(_) => {}
            AnimationKind::SequentialGroup(g) => g.current = 0,
            AnimationKind::Property(a) => {
                a.curve_mut().reset();
                a.set_sprite(None);
                a.clear_property();
            }
            AnimationKind::Grid(a) => {
                a.curve_mut().reset();
                a.set_sprite(None);
                a.set_function(None);
            }
            AnimationKind::Script(a) => {
                if let Some(script_id) = a.script() {
                    if let Some(script) = scripts.get_mut(script_id) {
                        script.stop();
                    }
                }
                a.set_script(None);
                a.set_sprite(None);
            }
        }
        node.state = State::Stopped;
    }

    /// Backward scan removal: iterate a group's children from the last
    /// index to the first so removing the current element never perturbs a
    /// not-yet-visited index. Nested groups are recursed into, never
    /// removed.
    fn prune_group(
        &mut self,
        group: NodeId,
        scripts: &mut Scripts,
        matches: &dyn Fn(&AnimationKind) -> bool,
    ) {
        let mut i = self.node(group).children().len();
        while i > 0 {
            i -= 1;
            let child = self.node(group).children()[i];
            if self.node(child).is_group() {
                self.prune_group(child, scripts, matches);
            } else if matches(self.node(child).kind()) {
                self.release_node(child, scripts);
                let children = self
                    .node_mut(group)
                    .children_mut()
                    .expect("group has children");
                children.remove(i);
                self.node_mut(child).parent = None;
                self.arena.remove(child).expect("child present in the arena");
            }
        }
    }

    /// Play/restore pattern shared by script reload and sprite attachment:
    /// run every matching node's init path once, then put its externally
    /// visible state back unless it was already playing.
    fn replay_matching(
        &mut self,
        sprites: &mut Sprites,
        scripts: &mut Scripts,
        matches: &dyn Fn(&AnimationKind) -> bool,
    ) {
        for id in self.descendants_of(self.root) {
            if !matches(self.node(id).kind()) {
                continue;
            }
            let prev = self.node(id).state();
            self.play_node(id, sprites, scripts);
            if prev != State::Playing {
                self.node_mut(id).state = prev;
            }
        }
    }
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}
