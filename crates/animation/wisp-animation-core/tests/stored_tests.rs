use wisp_animation_core::{
    catalog, load_tree, parse_stored_tree_json, serialize_tree, stored_tree_to_json, Animation,
    AnimationKind, AnimationManager, DeserializeContext, Direction, Easing, EasingCurve,
    GridAnimation, LoopMode, ParameterValue, PropertyAnimation, ScriptAnimation, SerializeContext,
    Sprite, SpriteId, Sprites, StoredNode, StoredParamValue, StoredParameter, StoredTree,
};

fn contexts(sprite: SpriteId) -> (SerializeContext, DeserializeContext) {
    let mut ser = SerializeContext::default();
    ser.sprite_keys.insert(sprite, 0);
    let mut de = DeserializeContext::default();
    de.sprites.insert(0, sprite);
    (ser, de)
}

fn sample_tree(mgr: &mut AnimationManager, sprite: SpriteId) {
    let outer = mgr.add(mgr.root(), Animation::parallel_group("outer"));
    let seq = mgr.add(outer, Animation::sequential_group("seq"));

    let mut curve = EasingCurve::new(Easing::Sine, LoopMode::PingPong);
    curve.set_direction(Direction::Backward);
    curve.set_start(0.1);
    curve.set_end(0.9);
    curve.set_scale(2.0);
    curve.set_shift(-0.5);
    let mut prop = PropertyAnimation::new(curve);
    prop.set_sprite(Some(sprite));
    prop.set_speed(1.5);
    prop.set_property("rotation").unwrap();
    mgr.add(seq, Animation::property("spin", prop));

    let mut grid = GridAnimation::new(EasingCurve::new(Easing::Quad, LoopMode::Rewind));
    grid.set_sprite(Some(sprite));
    grid.set_function(catalog().get("zoom"));
    grid.parameters_mut()[0] = ParameterValue::vector(2.0, 3.0);
    grid.parameters_mut()[1] = ParameterValue::vector(4.0, 5.0);
    mgr.add(seq, Animation::grid("pulse", grid));
}

/// it should reproduce types, names, parent linkage, curve fields and
/// parameter values across a JSON round trip
#[test]
fn round_trip_preserves_structure() {
    let mut sprites = Sprites::new();
    let sprite = sprites.add(Sprite::new("s", 8, 8));
    let (ser, de) = contexts(sprite);

    let mut mgr = AnimationManager::new();
    sample_tree(&mut mgr, sprite);
    let stored = serialize_tree(&mgr, &ser);

    let json = stored_tree_to_json(&stored).unwrap();
    let parsed = parse_stored_tree_json(&json).unwrap();
    assert_eq!(parsed, stored);

    let mut restored_mgr = AnimationManager::new();
    load_tree(&mut restored_mgr, &parsed, &de);
    let restored = serialize_tree(&restored_mgr, &ser);
    assert_eq!(restored, stored);

    // Spot-check the live tree as well.
    let outer = restored_mgr.children_of(restored_mgr.root())[0];
    let seq = restored_mgr.children_of(outer)[0];
    assert_eq!(restored_mgr.node(seq).name, "seq");
    let spin = restored_mgr.children_of(seq)[0];
    match restored_mgr.node(spin).kind() {
        AnimationKind::Property(anim) => {
            assert_eq!(anim.sprite(), Some(sprite));
            assert_eq!(anim.property_name(), Some("rotation"));
            assert_eq!(anim.speed(), 1.5);
            assert_eq!(anim.curve().kind(), Easing::Sine);
            assert_eq!(anim.curve().loop_mode(), LoopMode::PingPong);
            assert_eq!(anim.curve().direction(), Direction::Backward);
            assert_eq!(anim.curve().start(), 0.1);
            assert_eq!(anim.curve().end(), 0.9);
            assert_eq!(anim.curve().scale(), 2.0);
            assert_eq!(anim.curve().shift(), -0.5);
        }
        _ => unreachable!(),
    }
    let pulse = restored_mgr.children_of(seq)[1];
    match restored_mgr.node(pulse).kind() {
        AnimationKind::Grid(anim) => {
            assert_eq!(anim.function().map(|f| f.name()), Some("zoom"));
            assert_eq!(anim.parameters()[0], ParameterValue::vector(2.0, 3.0));
            assert_eq!(anim.parameters()[1], ParameterValue::vector(4.0, 5.0));
        }
        _ => unreachable!(),
    }
}

/// it should fall back to documented defaults on unknown enum strings
/// instead of failing the load
#[test]
fn unknown_enum_strings_fall_back() {
    let json = r#"{
        "animations": [
            {
                "name": "mystery",
                "type": "teleport_animation",
                "parent": null
            },
            {
                "name": "odd_curve",
                "type": "property_animation",
                "parent": 0,
                "speed": 1.0,
                "property_name": "rotation",
                "curve": {
                    "type": "elastic",
                    "direction": "sideways",
                    "loop_mode": "bounce",
                    "start_time": 0.0,
                    "end_time": 1.0,
                    "scale": 1.0,
                    "shift": 0.0
                }
            }
        ]
    }"#;
    let tree = parse_stored_tree_json(json).unwrap();
    let mut mgr = AnimationManager::new();
    let created = load_tree(&mut mgr, &tree, &DeserializeContext::default());
    assert_eq!(created.len(), 2);

    // Unknown node type becomes a parallel group and can hold the child.
    assert!(mgr.node(created[0]).is_group());
    match mgr.node(created[1]).kind() {
        AnimationKind::Property(anim) => {
            assert_eq!(anim.curve().kind(), Easing::Linear);
            assert_eq!(anim.curve().loop_mode(), LoopMode::Disabled);
            assert_eq!(anim.curve().direction(), Direction::Forward);
        }
        _ => unreachable!(),
    }
}

/// it should keep stored parameter values when the grid function is missing
#[test]
fn missing_grid_function_keeps_parameters() {
    let tree = StoredTree {
        animations: vec![StoredNode {
            name: "lost".to_string(),
            kind: "grid_animation".to_string(),
            parameters: Some(vec![
                StoredParameter {
                    name: "strength".to_string(),
                    value: StoredParamValue::Float(0.75),
                },
                StoredParameter {
                    name: "center".to_string(),
                    value: StoredParamValue::Vector([1.0, 2.0]),
                },
            ]),
            function_name: Some("ripple".to_string()),
            ..Default::default()
        }],
    };
    let mut mgr = AnimationManager::new();
    let created = load_tree(&mut mgr, &tree, &DeserializeContext::default());
    match mgr.node(created[0]).kind() {
        AnimationKind::Grid(anim) => {
            assert!(anim.function().is_none());
            assert_eq!(anim.parameters()[0], ParameterValue::scalar(0.75));
            assert_eq!(anim.parameters()[1], ParameterValue::vector(1.0, 2.0));
        }
        _ => unreachable!(),
    }
}

/// it should leave the accessor unbound on an unknown property name without
/// failing the load
#[test]
fn unknown_property_name_loads_unbound() {
    let tree = StoredTree {
        animations: vec![StoredNode {
            name: "typo".to_string(),
            kind: "property_animation".to_string(),
            property_name: Some("positon_x".to_string()),
            ..Default::default()
        }],
    };
    let mut mgr = AnimationManager::new();
    let created = load_tree(&mut mgr, &tree, &DeserializeContext::default());
    match mgr.node(created[0]).kind() {
        AnimationKind::Property(anim) => assert_eq!(anim.property_name(), None),
        _ => unreachable!(),
    }
}

/// it should resolve sprite and script references through the caller maps
#[test]
fn references_resolve_through_context_maps() {
    let mut sprites = Sprites::new();
    let sprite = sprites.add(Sprite::new("s", 8, 8));
    let (ser, mut de) = contexts(sprite);

    let mut mgr = AnimationManager::new();
    let mut anim = ScriptAnimation::new();
    anim.set_sprite(Some(sprite));
    mgr.add(mgr.root(), Animation::script("scripted", anim));
    let stored = serialize_tree(&mgr, &ser);
    assert_eq!(stored.animations[0].sprite, Some(0));

    // Load into a session where the sprite got a different handle.
    let mut other_sprites = Sprites::new();
    let _filler = other_sprites.add(Sprite::new("filler", 2, 2));
    let remapped = other_sprites.add(Sprite::new("s", 8, 8));
    de.sprites.insert(0, remapped);
    let mut restored_mgr = AnimationManager::new();
    let created = load_tree(&mut restored_mgr, &stored, &de);
    match restored_mgr.node(created[0]).kind() {
        AnimationKind::Script(anim) => assert_eq!(anim.sprite(), Some(remapped)),
        _ => unreachable!(),
    }
}

/// it should attach nodes with an out-of-tree parent index under the root
#[test]
fn bad_parent_index_attaches_to_root() {
    let tree = StoredTree {
        animations: vec![StoredNode {
            name: "orphan".to_string(),
            kind: "property_animation".to_string(),
            parent: Some(42),
            ..Default::default()
        }],
    };
    let mut mgr = AnimationManager::new();
    let created = load_tree(&mut mgr, &tree, &DeserializeContext::default());
    assert_eq!(mgr.node(created[0]).parent(), Some(mgr.root()));
}
