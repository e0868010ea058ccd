use criterion::{criterion_group, criterion_main, Criterion};
use wisp_animation_core::{
    catalog, Animation, AnimationManager, Easing, EasingCurve, GridAnimation, LoopMode,
    PropertyAnimation, Scripts, Sprite, Sprites,
};

fn build_stage() -> (AnimationManager, Sprites, Scripts) {
    let mut sprites = Sprites::new();
    let mut scripts = Scripts::new();
    let mut mgr = AnimationManager::new();

    for i in 0..8 {
        let sprite = sprites.add(Sprite::new(&format!("sprite{i}"), 64, 64));
        let group = mgr.add(mgr.root(), Animation::parallel_group(&format!("group{i}")));

        let mut prop = PropertyAnimation::new(EasingCurve::new(Easing::Sine, LoopMode::PingPong));
        prop.set_sprite(Some(sprite));
        prop.set_property("position_x").unwrap();
        mgr.add(group, Animation::property("move", prop));

        let mut grid = GridAnimation::new(EasingCurve::new(Easing::Linear, LoopMode::Rewind));
        grid.set_sprite(Some(sprite));
        grid.set_function(catalog().get("wave_x"));
        mgr.add(group, Animation::grid("wave", grid));
    }

    mgr.play(&mut sprites, &mut scripts);
    (mgr, sprites, scripts)
}

fn bench_update(c: &mut Criterion) {
    let (mut mgr, mut sprites, mut scripts) = build_stage();
    c.bench_function("tree_update_60fps_tick", |b| {
        b.iter(|| {
            for (_, sprite) in sprites.iter_mut() {
                sprite.reset_grid();
            }
            mgr.update(1.0 / 60.0, &mut sprites, &mut scripts);
        })
    });
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
