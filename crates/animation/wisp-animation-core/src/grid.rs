//! Grid animations: easing output driving a parametric mesh deformation.

use wisp_api_core::{Sprite, SpriteId};

use crate::easing::EasingCurve;
use crate::grid_function::{GridFunction, ParameterValue};

/// Leaf animation binding an easing curve, through a catalog grid function,
/// to the per-vertex deformation grid of a sprite.
#[derive(Debug)]
pub struct GridAnimation {
    sprite: Option<SpriteId>,
    speed: f32,
    curve: EasingCurve,
    function: Option<&'static GridFunction>,
    parameters: Vec<ParameterValue>,
}

impl GridAnimation {
    pub fn new(curve: EasingCurve) -> Self {
        Self {
            sprite: None,
            speed: 1.0,
            curve,
            function: None,
            parameters: Vec::new(),
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

    #[inline]
    pub fn function(&self) -> Option<&'static GridFunction> {
        self.function
    }

    /// Rebind the deformation. The parameter array is re-sized to the new
    /// function's arity and re-seeded from its declared initial values;
    /// prior values are discarded (no remap by name).
    pub fn set_function(&mut self, function: Option<&'static GridFunction>) {
        self.function = function;
        self.parameters = match function {
            Some(f) => f.parameters().iter().map(|info| info.initial).collect(),
            None => Vec::new(),
        };
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterValue] {
        &self.parameters
    }

    #[inline]
    pub fn parameters_mut(&mut self) -> &mut [ParameterValue] {
        &mut self.parameters
    }

    /// Used by deserialization: a save file may carry parameter values for a
    /// function that is no longer registered, and those values survive.
    pub(crate) fn set_parameters(&mut self, parameters: Vec<ParameterValue>) {
        self.parameters = parameters;
    }

    /// Advance the curve and run the bound deformation with the current
    /// parameter values. Only called while the owning node is playing and a
    /// sprite is bound.
    pub(crate) fn update(&mut self, sprite: &mut Sprite, delta_time: f32) {
        let value = self.curve.next(self.speed * delta_time);
        if let Some(function) = self.function {
            function.execute(sprite, &self.parameters, value);
        }
    }
}

impl Default for GridAnimation {
    fn default() -> Self {
        Self::new(EasingCurve::default())
    }
}
