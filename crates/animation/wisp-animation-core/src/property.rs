//! Property animations: easing output written into one named sprite scalar.

use wisp_api_core::{properties, PropertyAccessor, PropertyError, Sprite, SpriteId};

use crate::easing::EasingCurve;

/// Leaf animation binding an easing curve to a named sprite property.
/// The accessor is resolved once at bind time, not per tick.
#[derive(Debug)]
pub struct PropertyAnimation {
    sprite: Option<SpriteId>,
    speed: f32,
    curve: EasingCurve,
    property: Option<&'static PropertyAccessor>,
}

impl PropertyAnimation {
    pub fn new(curve: EasingCurve) -> Self {
        Self {
            sprite: None,
            speed: 1.0,
            curve,
            property: None,
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
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    #[inline]
    pub fn curve(&self) -> &EasingCurve {
        &self.curve
    }

    #[inline]
    pub fn curve_mut(&mut self) -> &mut EasingCurve {
        &mut self.curve
    }

    pub fn property_name(&self) -> Option<&'static str> {
        self.property.map(|p| p.name)
    }

    /// Resolve and bind an accessor by name. Unknown names detach the
    /// current accessor and surface the error to the caller.
    pub fn set_property(&mut self, name: &str) -> Result<(), PropertyError> {
        match properties::find(name) {
            Ok(accessor) => {
                self.property = Some(accessor);
                Ok(())
            }
            Err(err) => {
                self.property = None;
                Err(err)
            }
        }
    }

    pub fn clear_property(&mut self) {
        self.property = None;
    }

    /// Advance the curve and write the value through the bound accessor.
    /// Only called while the owning node is playing and a sprite is bound.
    pub(crate) fn update(&mut self, sprite: &mut Sprite, delta_time: f32) {
        let value = self.curve.next(self.speed * delta_time);
        if let Some(accessor) = self.property {
            (accessor.set)(sprite, value);
        }
    }
}

impl Default for PropertyAnimation {
    fn default() -> Self {
        Self::new(EasingCurve::default())
    }
}
