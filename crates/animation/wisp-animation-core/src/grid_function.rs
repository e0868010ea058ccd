//! Grid deformation functions and their process-wide catalog.
//!
//! A grid function is an immutable catalog entry: a name, an ordered list of
//! typed parameter descriptors and the deformation procedure itself. The
//! catalog is initialized once with the built-ins and read-only afterwards,
//! so every grid animation can hold a plain `&'static` reference without
//! synchronization.

use std::f32::consts::TAU;
use std::sync::OnceLock;

use hashbrown::HashMap;
use wisp_api_core::Sprite;

/// Value slot for one function parameter. `value1` is used only by
/// two-dimensional parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParameterValue {
    pub value0: f32,
    pub value1: f32,
}

impl ParameterValue {
    pub fn scalar(v: f32) -> Self {
        Self {
            value0: v,
            value1: 0.0,
        }
    }

    pub fn vector(x: f32, y: f32) -> Self {
        Self {
            value0: x,
            value1: y,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParameterType {
    Float,
    Vector2f,
}

/// A parameter's declared dependency on the sprite's grid anchor point,
/// synchronized on demand by the manager (never continuously).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AnchorBinding {
    #[default]
    None,
    X,
    Y,
    Xy,
}

/// Descriptor for one function parameter.
#[derive(Clone, Debug)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub ty: ParameterType,
    pub anchor: AnchorBinding,
    /// Seed for freshly sized parameter arrays.
    pub initial: ParameterValue,
    /// UI slider range; not enforced by the engine.
    pub min: f32,
    pub max: f32,
}

pub type DeformFn = fn(&mut Sprite, &[ParameterValue], f32);

/// Immutable catalog entry describing one deformation.
pub struct GridFunction {
    name: &'static str,
    parameters: &'static [ParameterInfo],
    deform: DeformFn,
}

impl GridFunction {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn parameters(&self) -> &'static [ParameterInfo] {
        self.parameters
    }

    pub fn parameter_info(&self, index: usize) -> &'static ParameterInfo {
        &self.parameters[index]
    }

    /// Run the deformation with the current parameter values and the easing
    /// curve's output for this tick.
    pub fn execute(&self, sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
        (self.deform)(sprite, params, value)
    }
}

impl std::fmt::Debug for GridFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFunction")
            .field("name", &self.name)
            .field("parameters", &self.parameters.len())
            .finish()
    }
}

// ----- built-in deformations -----

/// Horizontal sine wave: vertices shift along x by the sine of their y rest
/// coordinate; the curve value drives the phase.
fn wave_x(sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
    let amplitude = params[0].value0;
    let frequency = params[1].value0;
    for vertex in sprite.vertices_mut() {
        vertex.x += amplitude * (TAU * frequency * vertex.v + value).sin();
    }
}

/// Vertical sine wave over the x rest coordinate.
fn wave_y(sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
    let amplitude = params[0].value0;
    let frequency = params[1].value0;
    for vertex in sprite.vertices_mut() {
        vertex.y += amplitude * (TAU * frequency * vertex.u + value).sin();
    }
}

/// Shear along x proportional to the distance from a pivot row. The pivot
/// follows the sprite's grid anchor y on demand.
fn skew_x(sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
    let amplitude = params[0].value0;
    let pivot = params[1].value0 / sprite.texrect().h.max(1) as f32;
    for vertex in sprite.vertices_mut() {
        vertex.x += amplitude * value * (vertex.v - 0.5 - pivot);
    }
}

/// Shear along y proportional to the distance from a pivot column.
fn skew_y(sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
    let amplitude = params[0].value0;
    let pivot = params[1].value0 / sprite.texrect().w.max(1) as f32;
    for vertex in sprite.vertices_mut() {
        vertex.y += amplitude * value * (vertex.u - 0.5 - pivot);
    }
}

/// Scale the grid around a center point. The center follows the sprite's
/// grid anchor on demand; the curve value blends between rest and the full
/// zoom amount.
fn zoom(sprite: &mut Sprite, params: &[ParameterValue], value: f32) {
    let amount = params[0];
    let texrect = sprite.texrect();
    let cx = params[1].value0 / texrect.w.max(1) as f32;
    let cy = params[1].value1 / texrect.h.max(1) as f32;
    let fx = 1.0 + (amount.value0 - 1.0) * value;
    let fy = 1.0 + (amount.value1 - 1.0) * value;
    for vertex in sprite.vertices_mut() {
        vertex.x = cx + (vertex.x - cx) * fx;
        vertex.y = cy + (vertex.y - cy) * fy;
    }
}

static WAVE_X: GridFunction = GridFunction {
    name: "wave_x",
    parameters: &[
        ParameterInfo {
            name: "amplitude",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 0.1,
                value1: 0.0,
            },
            min: 0.0,
            max: 1.0,
        },
        ParameterInfo {
            name: "frequency",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 1.0,
                value1: 0.0,
            },
            min: 0.0,
            max: 10.0,
        },
    ],
    deform: wave_x,
};

static WAVE_Y: GridFunction = GridFunction {
    name: "wave_y",
    parameters: &[
        ParameterInfo {
            name: "amplitude",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 0.1,
                value1: 0.0,
            },
            min: 0.0,
            max: 1.0,
        },
        ParameterInfo {
            name: "frequency",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 1.0,
                value1: 0.0,
            },
            min: 0.0,
            max: 10.0,
        },
    ],
    deform: wave_y,
};

static SKEW_X: GridFunction = GridFunction {
    name: "skew_x",
    parameters: &[
        ParameterInfo {
            name: "amplitude",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 0.5,
                value1: 0.0,
            },
            min: -2.0,
            max: 2.0,
        },
        ParameterInfo {
            name: "pivot_y",
            ty: ParameterType::Float,
            anchor: AnchorBinding::Y,
            initial: ParameterValue {
                value0: 0.0,
                value1: 0.0,
            },
            min: -512.0,
            max: 512.0,
        },
    ],
    deform: skew_x,
};

static SKEW_Y: GridFunction = GridFunction {
    name: "skew_y",
    parameters: &[
        ParameterInfo {
            name: "amplitude",
            ty: ParameterType::Float,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 0.5,
                value1: 0.0,
            },
            min: -2.0,
            max: 2.0,
        },
        ParameterInfo {
            name: "pivot_x",
            ty: ParameterType::Float,
            anchor: AnchorBinding::X,
            initial: ParameterValue {
                value0: 0.0,
                value1: 0.0,
            },
            min: -512.0,
            max: 512.0,
        },
    ],
    deform: skew_y,
};

static ZOOM: GridFunction = GridFunction {
    name: "zoom",
    parameters: &[
        ParameterInfo {
            name: "amount",
            ty: ParameterType::Vector2f,
            anchor: AnchorBinding::None,
            initial: ParameterValue {
                value0: 1.0,
                value1: 1.0,
            },
            min: 0.0,
            max: 8.0,
        },
        ParameterInfo {
            name: "center",
            ty: ParameterType::Vector2f,
            anchor: AnchorBinding::Xy,
            initial: ParameterValue {
                value0: 0.0,
                value1: 0.0,
            },
            min: -512.0,
            max: 512.0,
        },
    ],
    deform: zoom,
};

/// Read-only catalog of every registered grid function.
#[derive(Debug)]
pub struct GridFunctionCatalog {
    entries: Vec<&'static GridFunction>,
    by_name: HashMap<&'static str, &'static GridFunction>,
}

impl GridFunctionCatalog {
    fn with_builtins() -> Self {
        let entries: Vec<&'static GridFunction> = vec![&WAVE_X, &WAVE_Y, &SKEW_X, &SKEW_Y, &ZOOM];
        let by_name = entries.iter().map(|f| (f.name(), *f)).collect();
        Self { entries, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&'static GridFunction> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static GridFunction> + '_ {
        self.entries.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|f| f.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide catalog, initialized on first use.
pub fn catalog() -> &'static GridFunctionCatalog {
    static CATALOG: OnceLock<GridFunctionCatalog> = OnceLock::new();
    CATALOG.get_or_init(GridFunctionCatalog::with_builtins)
}
