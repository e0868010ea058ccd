//! Script boundary: the external resource a script animation delegates to,
//! plus the id-keyed store the host owns.
//!
//! The scripting host itself is out of scope; the engine only needs
//! play/stop/update forwarding and a state query. Scripts are
//! identity-compared through their `ScriptId`.

use wisp_api_core::{Sprite, SpriteId};

use crate::ids::ScriptId;
use crate::node::State;

/// An externally-implemented script resource.
///
/// `play` runs the script's initialization entry point and resumes it; it is
/// invoked on every play, not just the first, so reload-from-disk and
/// re-attachment replay initial conditions.
pub trait Script {
    fn play(&mut self, sprite: &mut Sprite);
    fn stop(&mut self);
    fn update(&mut self, sprite: &mut Sprite, delta_time: f32);
    /// The script decides its own transitions; the owning node adopts
    /// `Stopped` when reported.
    fn state(&self) -> State;
}

/// Script storage owned by the host application.
#[derive(Default)]
pub struct Scripts {
    items: Vec<(ScriptId, Box<dyn Script>)>,
    next: u32,
}

impl Scripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, script: Box<dyn Script>) -> ScriptId {
        let id = ScriptId(self.next);
        self.next = self.next.wrapping_add(1);
        self.items.push((id, script));
        id
    }

    pub fn get_mut(&mut self, id: ScriptId) -> Option<&mut (dyn Script + '_)> {
        self.items.iter_mut().find_map(|(sid, s)| {
            if *sid == id {
                Some(s.as_mut() as &mut dyn Script)
            } else {
                None
            }
        })
    }

    /// Remove a script from the store. The caller is responsible for having
    /// called the manager's remove-by-script first.
    pub fn remove(&mut self, id: ScriptId) -> bool {
        let before = self.items.len();
        self.items.retain(|(sid, _)| *sid != id);
        self.items.len() != before
    }

    pub fn ids(&self) -> impl Iterator<Item = ScriptId> + '_ {
        self.items.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Debug for Scripts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scripts").field("len", &self.items.len()).finish()
    }
}

/// Leaf animation delegating play/stop/update to a script resource bound to
/// a sprite.
#[derive(Clone, Debug)]
pub struct ScriptAnimation {
    sprite: Option<SpriteId>,
    script: Option<ScriptId>,
    speed: f32,
}

impl ScriptAnimation {
    pub fn new() -> Self {
        Self {
            sprite: None,
            script: None,
            speed: 1.0,
        }
    }

    #[inline]
    pub fn sprite(&self) -> Option<SpriteId> {
        self.sprite
    }

    /// Rebind the target; `None` detaches and the animation becomes inert.
    pub fn set_sprite(&mut self, sprite: Option<SpriteId>) {
        self.sprite = sprite;
    }

    #[inline]
    pub fn script(&self) -> Option<ScriptId> {
        self.script
    }

    pub fn set_script(&mut self, script: Option<ScriptId>) {
        self.script = script;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}

impl Default for ScriptAnimation {
    fn default() -> Self {
        Self::new()
    }
}
