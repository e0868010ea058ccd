//! Sprite: the externally-owned visual object that animations mutate.
//!
//! The sprite exposes three surfaces to the animation subsystem:
//! - typed transform/color fields written through the property registry
//!   (see `property.rs`),
//! - a per-vertex deformation grid for mesh deformations,
//! - the 2D grid anchor point read by on-demand anchor synchronization.
//!
//! Rendering, textures and GL resources are out of scope; a sprite is
//! constructed from a source size instead of a texture.

use serde::{Deserialize, Serialize};

use crate::math::{Colorf, Recti, Vec2};

/// Blending preset applied when the sprite is composited.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlendingPreset {
    Disabled,
    #[default]
    Alpha,
    PremultipliedAlpha,
    Additive,
    Multiply,
}

impl BlendingPreset {
    /// Stable lowercase name used by the persistence boundary.
    pub fn name(self) -> &'static str {
        match self {
            BlendingPreset::Disabled => "disabled",
            BlendingPreset::Alpha => "alpha",
            BlendingPreset::PremultipliedAlpha => "premultiplied_alpha",
            BlendingPreset::Additive => "additive",
            BlendingPreset::Multiply => "multiply",
        }
    }

    /// Parse a stored name; unknown strings fall back to `Disabled`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "disabled" => BlendingPreset::Disabled,
            "alpha" => BlendingPreset::Alpha,
            "premultiplied_alpha" => BlendingPreset::PremultipliedAlpha,
            "additive" => BlendingPreset::Additive,
            "multiply" => BlendingPreset::Multiply,
            _ => BlendingPreset::Disabled,
        }
    }
}

/// One vertex of the deformation grid. `u`/`v` are the rest coordinates in
/// [0,1] over the texrect; `x`/`y` are the deformed positions in the unit
/// quad centered on the sprite origin.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

/// The sprite to animate.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub name: String,
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale_factor: Vec2,
    pub anchor_point: Vec2,
    pub color: Colorf,
    /// Anchor read by grid-deformation parameter synchronization.
    pub grid_anchor_point: Vec2,

    width: i32,
    height: i32,
    texrect: Recti,
    flipped_x: bool,
    flipped_y: bool,
    blending: BlendingPreset,

    grid_cols: i32,
    grid_rows: i32,
    vertices: Vec<Vertex>,
}

impl Sprite {
    /// Grid resolution cap per side. Deformations do not need texel-dense
    /// meshes; a capped grid keeps per-frame work bounded.
    const MAX_GRID_SIDE: i32 = 65;

    pub fn new(name: &str, width: i32, height: i32) -> Self {
        let mut sprite = Self {
            name: name.to_string(),
            visible: true,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_factor: Vec2::splat(1.0),
            anchor_point: Vec2::ZERO,
            color: Colorf::WHITE,
            grid_anchor_point: Vec2::ZERO,
            width,
            height,
            texrect: Recti::new(0, 0, width, height),
            flipped_x: false,
            flipped_y: false,
            blending: BlendingPreset::default(),
            grid_cols: 0,
            grid_rows: 0,
            vertices: Vec::new(),
        };
        sprite.rebuild_grid();
        sprite
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn texrect(&self) -> Recti {
        self.texrect
    }

    /// Changing the texrect rebuilds the deformation grid at the new size.
    pub fn set_texrect(&mut self, texrect: Recti) {
        if self.texrect != texrect {
            self.texrect = texrect;
            self.rebuild_grid();
        }
    }

    #[inline]
    pub fn is_flipped_x(&self) -> bool {
        self.flipped_x
    }

    pub fn set_flipped_x(&mut self, flipped: bool) {
        self.flipped_x = flipped;
    }

    #[inline]
    pub fn is_flipped_y(&self) -> bool {
        self.flipped_y
    }

    pub fn set_flipped_y(&mut self, flipped: bool) {
        self.flipped_y = flipped;
    }

    #[inline]
    pub fn blending(&self) -> BlendingPreset {
        self.blending
    }

    pub fn set_blending(&mut self, blending: BlendingPreset) {
        self.blending = blending;
    }

    /// Grid vertices per row.
    #[inline]
    pub fn grid_cols(&self) -> i32 {
        self.grid_cols
    }

    /// Grid vertices per column.
    #[inline]
    pub fn grid_rows(&self) -> i32 {
        self.grid_rows
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    /// Restore every vertex to its rest position. The host calls this once
    /// per frame before the animation pass so grid deformations start from
    /// an undeformed mesh and can stack within the frame.
    pub fn reset_grid(&mut self) {
        let cols = self.grid_cols;
        let rows = self.grid_rows;
        for j in 0..rows {
            for i in 0..cols {
                let u = i as f32 / (cols - 1) as f32;
                let v = j as f32 / (rows - 1) as f32;
                let vertex = &mut self.vertices[(j * cols + i) as usize];
                vertex.x = u - 0.5;
                vertex.y = v - 0.5;
                vertex.u = u;
                vertex.v = v;
            }
        }
    }

    fn rebuild_grid(&mut self) {
        self.grid_cols = (self.texrect.w + 1).clamp(2, Self::MAX_GRID_SIDE);
        self.grid_rows = (self.texrect.h + 1).clamp(2, Self::MAX_GRID_SIDE);
        self.vertices = vec![Vertex::default(); (self.grid_cols * self.grid_rows) as usize];
        self.reset_grid();
    }
}

/// Opaque sprite handle. Animations store these instead of references; the
/// host owns sprite lifetime and must detach animations before removal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Sprite storage owned by the host application.
#[derive(Default, Debug)]
pub struct Sprites {
    items: Vec<(SpriteId, Sprite)>,
    next: u32,
}

impl Sprites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.next);
        self.next = self.next.wrapping_add(1);
        self.items.push((id, sprite));
        id
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.items
            .iter()
            .find_map(|(sid, s)| if *sid == id { Some(s) } else { None })
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.items
            .iter_mut()
            .find_map(|(sid, s)| if *sid == id { Some(s) } else { None })
    }

    /// Remove a sprite from the store. The caller is responsible for having
    /// detached every animation bound to it first.
    pub fn remove(&mut self, id: SpriteId) -> Option<Sprite> {
        let idx = self.items.iter().position(|(sid, _)| *sid == id)?;
        Some(self.items.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SpriteId, Sprite)> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (SpriteId, Sprite)> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
