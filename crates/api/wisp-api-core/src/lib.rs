//! wisp-api-core: sprite target surface & property API (core, renderer-agnostic)

pub mod math;
pub mod property;
pub mod sprite;
pub mod stored_sprite;

pub use math::{Colorf, Recti, Vec2};
pub use property::{properties, PropertyAccessor, PropertyError};
pub use sprite::{BlendingPreset, Sprite, SpriteId, Sprites, Vertex};
pub use stored_sprite::StoredSprite;
