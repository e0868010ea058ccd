use wisp_animation_core::{Direction, Easing, EasingCurve, LoopMode};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

const ALL_KINDS: [Easing; 8] = [
    Easing::Linear,
    Easing::Quad,
    Easing::Cubic,
    Easing::Quart,
    Easing::Quint,
    Easing::Sine,
    Easing::Expo,
    Easing::Circ,
];

const ALL_LOOPS: [LoopMode; 3] = [LoopMode::Disabled, LoopMode::Rewind, LoopMode::PingPong];

/// Natural value range of a curve kind over the default [0,1] domain with
/// scale=1, shift=0.
fn natural_range(kind: Easing) -> (f32, f32) {
    match kind {
        Easing::Expo => (1.0, 2.0),
        _ => (0.0, 1.0),
    }
}

/// it should produce finite, naturally bounded values for every kind and
/// loop mode over an arbitrary positive dt sequence
#[test]
fn values_finite_and_bounded() {
    for kind in ALL_KINDS {
        for loop_mode in ALL_LOOPS {
            let mut curve = EasingCurve::new(kind, loop_mode);
            let (lo, hi) = natural_range(kind);
            for step in 0..500 {
                // Vary the step size so reflections land off the boundaries.
                let dt = 0.013 + (step % 7) as f32 * 0.011;
                let v = curve.next(dt);
                assert!(v.is_finite(), "{kind:?}/{loop_mode:?} produced {v}");
                assert!(
                    v >= lo - 1e-5 && v <= hi + 1e-5,
                    "{kind:?}/{loop_mode:?} out of range: {v}"
                );
                assert!(curve.time() >= curve.start() && curve.time() <= curve.end());
            }
        }
    }
}

/// it should return to the starting time and direction after a full
/// ping-pong round trip of 2*(end-start)
#[test]
fn ping_pong_round_trip() {
    let mut curve = EasingCurve::new(Easing::Linear, LoopMode::PingPong);
    curve.set_time(0.1);
    assert!(curve.is_going_forward());
    for _ in 0..8 {
        curve.next(0.25); // 8 * 0.25 == 2 * (end - start)
    }
    approx(curve.time(), 0.1, 1e-5);
    assert!(curve.is_going_forward());
}

/// it should continue from start plus the overflow on rewind, never
/// snapping exactly back to start
#[test]
fn rewind_carries_overflow() {
    let mut curve = EasingCurve::new(Easing::Linear, LoopMode::Rewind);
    curve.set_time(0.9);
    curve.next(0.25);
    approx(curve.time(), 0.15, 1e-6);
    assert_ne!(curve.time(), curve.start());
    assert!(curve.is_going_forward());
}

/// it should freeze at end with the disabled loop mode and stay frozen
#[test]
fn disabled_freezes_at_end() {
    let mut curve = EasingCurve::new(Easing::Quad, LoopMode::Disabled);
    curve.next(2.0);
    approx(curve.time(), 1.0, 0.0);
    approx(curve.value(), 1.0, 1e-6);
    curve.next(0.5);
    approx(curve.time(), 1.0, 0.0);
}

/// it should reflect off the low end and force forward regardless of loop
/// mode
#[test]
fn low_end_reflection_forces_forward() {
    for loop_mode in ALL_LOOPS {
        let mut curve = EasingCurve::new(Easing::Linear, loop_mode);
        curve.set_direction(Direction::Backward);
        curve.reset();
        assert!(!curve.is_going_forward());
        curve.next(0.3);
        approx(curve.time(), 0.3, 1e-6);
        assert!(curve.is_going_forward(), "{loop_mode:?}");
    }
}

/// it should evaluate the closed-form shapes with the affine post-transform
#[test]
fn value_shapes_and_affine_transform() {
    let mut curve = EasingCurve::new(Easing::Linear, LoopMode::Disabled);
    curve.set_time(0.5);
    approx(curve.value(), 0.5, 1e-6);

    curve.set_kind(Easing::Quad);
    approx(curve.value(), 0.25, 1e-6);

    curve.set_kind(Easing::Sine);
    approx(curve.value(), 1.0, 1e-6);

    curve.set_kind(Easing::Expo);
    approx(curve.value(), 2f32.sqrt(), 1e-5);

    curve.set_kind(Easing::Circ);
    approx(curve.value(), (0.75f32).sqrt(), 1e-5);

    curve.set_kind(Easing::Linear);
    curve.set_scale(2.0);
    curve.set_shift(-1.0);
    approx(curve.value(), 0.0, 1e-6);
}

/// it should clamp set_time into the [start, end] domain
#[test]
fn set_time_clamps_to_domain() {
    let mut curve = EasingCurve::new(Easing::Linear, LoopMode::Disabled);
    curve.set_time(7.0);
    approx(curve.time(), 1.0, 0.0);
    curve.set_time(-3.0);
    approx(curve.time(), 0.0, 0.0);

    curve.set_time(0.8);
    curve.set_end(0.5);
    approx(curve.time(), 0.5, 0.0);
}

/// it should restore the initial traversal sign on reset
#[test]
fn reset_restores_direction_sign() {
    let mut curve = EasingCurve::new(Easing::Linear, LoopMode::PingPong);
    curve.next(1.2); // reflect, now going backward
    assert!(!curve.is_going_forward());
    curve.reset();
    approx(curve.time(), 0.0, 0.0);
    assert!(curve.is_going_forward());
}
