//! Easing curves: the per-leaf time state machine.
//!
//! A curve owns its position in `[start, end]` and produces a scalar from a
//! closed-form shape, post-transformed by `scale`/`shift`. `next()` is the
//! sole per-tick entry point and must be called at most once per owning
//! animation per tick to keep time coherent.

use std::f32::consts::PI;

/// Shape of the curve value as a function of time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
}

impl Easing {
    /// Stable lowercase name used by the persistence boundary.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Quad => "quad",
            Easing::Cubic => "cubic",
            Easing::Quart => "quart",
            Easing::Quint => "quint",
            Easing::Sine => "sine",
            Easing::Expo => "expo",
            Easing::Circ => "circ",
        }
    }

    /// Parse a stored name; unknown strings fall back to `Linear`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Easing::Linear,
            "quad" => Easing::Quad,
            "cubic" => Easing::Cubic,
            "quart" => Easing::Quart,
            "quint" => Easing::Quint,
            "sine" => Easing::Sine,
            "expo" => Easing::Expo,
            "circ" => Easing::Circ,
            _ => {
                log::warn!("unknown easing \"{name}\", defaulting to linear");
                Easing::Linear
            }
        }
    }
}

/// What happens when time crosses the end of the domain going forward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Clamp to `end` and stay there; the curve freezes but the owning node
    /// does not self-stop.
    #[default]
    Disabled,
    /// Restart forward carrying the overflow past `end` as an offset from
    /// `start` (sawtooth; never snaps exactly back to `start`).
    Rewind,
    /// Reflect around `end` and run backward.
    PingPong,
}

impl LoopMode {
    pub fn name(self) -> &'static str {
        match self {
            LoopMode::Disabled => "disabled",
            LoopMode::Rewind => "rewind",
            LoopMode::PingPong => "ping_pong",
        }
    }

    /// Parse a stored name; unknown strings fall back to `Disabled`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "disabled" => LoopMode::Disabled,
            "rewind" => LoopMode::Rewind,
            "ping_pong" => LoopMode::PingPong,
            _ => {
                log::warn!("unknown loop mode \"{name}\", defaulting to disabled");
                LoopMode::Disabled
            }
        }
    }
}

/// Initial traversal direction. Affects only the sign `reset()` restores;
/// the live direction flips on reflection regardless.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }

    /// Parse a stored name; unknown strings fall back to `Forward`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "forward" => Direction::Forward,
            "backward" => Direction::Backward,
            _ => {
                log::warn!("unknown direction \"{name}\", defaulting to forward");
                Direction::Forward
            }
        }
    }
}

/// Easing curve state: shape, loop mode, the `[start, end]` time domain and
/// the affine post-transform of the raw value.
#[derive(Clone, Debug, PartialEq)]
pub struct EasingCurve {
    kind: Easing,
    loop_mode: LoopMode,
    direction: Direction,
    forward: bool,
    time: f32,
    start: f32,
    end: f32,
    scale: f32,
    shift: f32,
}

impl EasingCurve {
    pub fn new(kind: Easing, loop_mode: LoopMode) -> Self {
        Self {
            kind,
            loop_mode,
            direction: Direction::Forward,
            forward: true,
            time: 0.0,
            start: 0.0,
            end: 1.0,
            scale: 1.0,
            shift: 0.0,
        }
    }

    #[inline]
    pub fn kind(&self) -> Easing {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Easing) {
        self.kind = kind;
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    #[inline]
    pub fn is_going_forward(&self) -> bool {
        self.forward
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Clamp into the valid domain and store.
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(self.start, self.end);
    }

    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn set_start(&mut self, start: f32) {
        self.start = start;
        self.time = self.time.clamp(self.start, self.end);
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn set_end(&mut self, end: f32) {
        self.end = end;
        self.time = self.time.clamp(self.start, self.end);
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    #[inline]
    pub fn shift(&self) -> f32 {
        self.shift
    }

    pub fn set_shift(&mut self, shift: f32) {
        self.shift = shift;
    }

    /// Rewind to `start` and restore the traversal sign from `direction`.
    pub fn reset(&mut self) {
        self.time = self.start;
        self.forward = self.direction == Direction::Forward;
    }

    /// Pure function of `time` and `kind`. Time is already normalized to the
    /// curve's own domain, so no bounds are re-checked here.
    pub fn value(&self) -> f32 {
        let t = self.time;
        let raw = match self.kind {
            Easing::Linear => t,
            Easing::Quad => t * t,
            Easing::Cubic => t * t * t,
            Easing::Quart => t * t * t * t,
            Easing::Quint => t * t * t * t * t,
            Easing::Sine => (t * PI).sin(),
            Easing::Expo => 2f32.powf(t),
            Easing::Circ => (1.0 - t * t).max(0.0).sqrt(),
        };
        raw * self.scale + self.shift
    }

    /// Advance time by `±delta_time` and return the new value.
    ///
    /// Crossing `start` going backward always reflects and forces forward,
    /// independent of the loop mode. Crossing `end` going forward branches on
    /// the loop mode as documented on [`LoopMode`].
    pub fn next(&mut self, delta_time: f32) -> f32 {
        if self.forward {
            self.time += delta_time;
        } else {
            self.time -= delta_time;
        }

        if self.time < self.start {
            self.time = 2.0 * self.start - self.time;
            self.forward = true;
        } else if self.time > self.end {
            match self.loop_mode {
                LoopMode::Disabled => self.time = self.end,
                LoopMode::Rewind => self.time = self.start + (self.time - self.end),
                LoopMode::PingPong => {
                    self.time = 2.0 * self.end - self.time;
                    self.forward = false;
                }
            }
        }
        // Oversized steps (dt larger than the domain span) would otherwise
        // escape the domain after a single reflection.
        self.time = self.time.clamp(self.start, self.end);

        self.value()
    }
}

impl Default for EasingCurve {
    fn default() -> Self {
        Self::new(Easing::Linear, LoopMode::Disabled)
    }
}
