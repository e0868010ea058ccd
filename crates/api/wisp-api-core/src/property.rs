//! Name-keyed accessors over the sprite's scalar surface.
//!
//! Property animations resolve a name to an accessor once at bind time and
//! write through it every tick. Unknown names fail loudly at bind time so a
//! typo detaches the animation instead of silently doing nothing.

use std::sync::OnceLock;

use hashbrown::HashMap;
use thiserror::Error;

use crate::sprite::Sprite;

pub type Getter = fn(&Sprite) -> f32;
pub type Setter = fn(&mut Sprite, f32);

/// A resolved accessor for one named scalar property.
#[derive(Copy, Clone)]
pub struct PropertyAccessor {
    pub name: &'static str,
    pub get: Getter,
    pub set: Setter,
}

impl std::fmt::Debug for PropertyAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("unknown sprite property \"{0}\"")]
    Unknown(String),
}

#[inline]
fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

static ACCESSORS: &[PropertyAccessor] = &[
    PropertyAccessor {
        name: "position_x",
        get: |s| s.x,
        set: |s, v| s.x = v,
    },
    PropertyAccessor {
        name: "position_y",
        get: |s| s.y,
        set: |s, v| s.y = v,
    },
    PropertyAccessor {
        name: "rotation",
        get: |s| s.rotation,
        set: |s, v| s.rotation = v,
    },
    PropertyAccessor {
        name: "scale_x",
        get: |s| s.scale_factor.x,
        set: |s, v| s.scale_factor.x = v,
    },
    PropertyAccessor {
        name: "scale_y",
        get: |s| s.scale_factor.y,
        set: |s, v| s.scale_factor.y = v,
    },
    PropertyAccessor {
        name: "anchor_x",
        get: |s| s.anchor_point.x,
        set: |s, v| s.anchor_point.x = v,
    },
    PropertyAccessor {
        name: "anchor_y",
        get: |s| s.anchor_point.y,
        set: |s, v| s.anchor_point.y = v,
    },
    // Color channels are clamped; easing curves with scale/shift can
    // otherwise push them out of range.
    PropertyAccessor {
        name: "opacity",
        get: |s| s.color.a,
        set: |s, v| s.color.a = clamp01(v),
    },
    PropertyAccessor {
        name: "color_r",
        get: |s| s.color.r,
        set: |s, v| s.color.r = clamp01(v),
    },
    PropertyAccessor {
        name: "color_g",
        get: |s| s.color.g,
        set: |s, v| s.color.g = clamp01(v),
    },
    PropertyAccessor {
        name: "color_b",
        get: |s| s.color.b,
        set: |s, v| s.color.b = clamp01(v),
    },
];

fn registry() -> &'static HashMap<&'static str, &'static PropertyAccessor> {
    static REGISTRY: OnceLock<HashMap<&'static str, &'static PropertyAccessor>> = OnceLock::new();
    REGISTRY.get_or_init(|| ACCESSORS.iter().map(|a| (a.name, a)).collect())
}

/// The property registry.
pub mod properties {
    use super::*;

    /// Resolve a property name to its accessor.
    pub fn find(name: &str) -> Result<&'static PropertyAccessor, PropertyError> {
        registry()
            .get(name)
            .copied()
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))
    }

    /// All registered property names, in declaration order (UI combo order).
    pub fn names() -> impl Iterator<Item = &'static str> {
        ACCESSORS.iter().map(|a| a.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_resolves_every_declared_name() {
        for name in properties::names() {
            assert!(properties::find(name).is_ok(), "missing accessor {name}");
        }
    }

    #[test]
    fn unknown_name_fails_loudly() {
        let err = properties::find("positon_x").unwrap_err();
        assert_eq!(err, PropertyError::Unknown("positon_x".to_string()));
    }

    #[test]
    fn setter_writes_through_and_getter_reads_back() {
        let mut sprite = Sprite::new("s", 4, 4);
        let rot = properties::find("rotation").unwrap();
        (rot.set)(&mut sprite, 42.5);
        assert_eq!((rot.get)(&sprite), 42.5);

        let opacity = properties::find("opacity").unwrap();
        (opacity.set)(&mut sprite, 2.0);
        assert_eq!((opacity.get)(&sprite), 1.0);
    }
}
