use light_cluster::*;

fn point_light(light_index: u16, matrices_offset: u32, range: f32) -> LightInfo {
    LightInfo::new(light_index, LightType::Point, matrices_offset).with_range(range)
}

fn instance_at(center: Vec3) -> Paralgram {
    let local = Obb::from_aabb(&Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
    local.transform(&Mat4::from_translation(center))
}

#[test]
fn single_light_scene_reuses_cached_range() {
    let mut lights = Lights::default();
    let id = lights.add_light_entity();
    lights.prepare_new_frame(0);

    let mut infos = [point_light(id.index(), 0, 5.0)];
    lights.add_lights(&mut infos, &[Mat4::IDENTITY]);

    let first = lights.create_collided_lights_range(&instance_at(Vec3::new(1.0, 1.0, 0.0)));
    assert_eq!(first, LightsIndicesRange::new(0, 1));
    let len_after_first = lights.combinations().len();

    let second = lights.create_collided_lights_range(&instance_at(Vec3::new(1.0, 1.0, 0.0)));
    assert_eq!(second, first);
    assert_eq!(lights.combinations().len(), len_after_first);

    let far = lights.create_collided_lights_range(&instance_at(Vec3::new(100.0, 0.0, 0.0)));
    assert_eq!(far, LightsIndicesRange::EMPTY);

    let stats = lights.stats();
    assert_eq!(stats.collision_queries, 3);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.empty_ranges, 1);
}

#[test]
fn no_lights_always_give_empty_range() {
    let mut lights = Lights::default();
    lights.prepare_new_frame(0);
    lights.add_lights(&mut [], &[]);
    for x in [-10.0, 0.0, 10.0] {
        let range = lights.create_collided_lights_range(&instance_at(Vec3::new(x, 0.0, 0.0)));
        assert_eq!(range, LightsIndicesRange::EMPTY);
    }
    assert!(lights.combinations().is_empty());
}

#[test]
fn distinct_light_sets_get_distinct_ranges() {
    let mut lights = Lights::default();
    let ids: Vec<LightId> = (0..3).map(|_| lights.add_light_entity()).collect();
    lights.prepare_new_frame(0);

    let matrices = [
        Mat4::from_translation(Vec3::new(0.0, 0.0, 0.0)),
        Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0)),
        Mat4::from_translation(Vec3::new(8.0, 0.0, 0.0)),
    ];
    let mut infos: Vec<LightInfo> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| point_light(id.index(), i as u32, 4.5))
        .collect();
    lights.add_lights(&mut infos, &matrices);

    let left = lights.create_collided_lights_range(&instance_at(Vec3::new(2.0, 0.0, 0.0)));
    let right = lights.create_collided_lights_range(&instance_at(Vec3::new(6.0, 0.0, 0.0)));
    let middle = lights.create_collided_lights_range(&instance_at(Vec3::new(4.0, 0.0, 0.0)));

    let combinations = lights.combinations();
    assert_eq!(&combinations[left.as_range()], &[0, 1]);
    assert_eq!(&combinations[right.as_range()], &[1, 2]);
    assert_eq!(&combinations[middle.as_range()], &[0, 1, 2]);
    assert_eq!(combinations.len(), 7);
}

#[test]
fn offsets_stay_valid_within_a_frame() {
    let mut lights = Lights::default();
    let a = lights.add_light_entity();
    let b = lights.add_light_entity();
    lights.prepare_new_frame(0);

    let matrices = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(20.0, 0.0, 0.0))];
    let mut infos = [point_light(a.index(), 0, 3.0), point_light(b.index(), 1, 3.0)];
    lights.add_lights(&mut infos, &matrices);

    let near_a = lights.create_collided_lights_range(&instance_at(Vec3::ZERO));
    let snapshot = lights.combinations()[near_a.as_range()].to_vec();
    lights.create_collided_lights_range(&instance_at(Vec3::new(20.0, 0.0, 0.0)));
    assert_eq!(lights.combinations()[near_a.as_range()], snapshot[..]);
}

#[test]
fn removed_entity_index_is_recycled() {
    let mut lights = Lights::default();
    let a = lights.add_light_entity();
    let b = lights.add_light_entity();
    lights.remove_light_entity_safe(a);
    assert!(!lights.is_light_entity_live(a));

    let c = lights.add_light_entity();
    assert_eq!(c.index(), a.index());
    assert_ne!(c, a);
    assert!(lights.is_light_entity_live(b));
    assert_eq!(lights.light_entity_count(), 2);
}

#[test]
#[should_panic(expected = "not live")]
fn removing_absent_entity_panics() {
    let mut lights = Lights::default();
    let a = lights.add_light_entity();
    lights.remove_light_entity_safe(a);
    lights.remove_light_entity_safe(a);
}

#[test]
#[should_panic(expected = "light combination buffer overflow")]
fn combination_capacity_is_enforced() {
    let config = LightsConfig {
        max_light_combinations_size: 2,
        ..Default::default()
    };
    let mut lights = Lights::new(config).expect("valid config");
    let ids: Vec<LightId> = (0..2).map(|_| lights.add_light_entity()).collect();
    lights.prepare_new_frame(0);

    let matrices = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0))];
    let mut infos = [point_light(ids[0].index(), 0, 2.0), point_light(ids[1].index(), 1, 2.0)];
    lights.add_lights(&mut infos, &matrices);

    lights.create_collided_lights_range(&instance_at(Vec3::ZERO));
    lights.create_collided_lights_range(&instance_at(Vec3::new(3.0, 0.0, 0.0)));
    lights.create_collided_lights_range(&instance_at(Vec3::new(1.5, 0.0, 0.0)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = LightsConfig {
        max_lights: 0,
        ..Default::default()
    };
    assert!(matches!(Lights::new(config), Err(ClusterError::InvalidConfig(_))));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: LightsConfig =
        serde_json::from_str(r#"{ "max_light_combinations_size": 4096 }"#).expect("valid json");
    assert_eq!(config.max_light_combinations_size, 4096);
    assert_eq!(config.max_lights, LightsConfig::default().max_lights);
    assert!(config.validate().is_ok());
}

#[test]
fn frame_output_exposes_gpu_arrays() {
    let mut lights = Lights::default();
    let sun = lights.add_light_entity();
    let lamp = lights.add_light_entity();
    let sky = lights.add_light_entity();
    lights.prepare_new_frame(4);

    let mut infos = [
        LightInfo::new(sun.index(), LightType::Cone, 0).with_luminance(Vec3::splat(3.0)),
        point_light(lamp.index(), 0, 4.0),
        LightInfo::new(sky.index(), LightType::Uniform, 0).with_luminance(Vec3::splat(0.1)),
    ];
    lights.add_lights(&mut infos, &[Mat4::IDENTITY]);
    let cones = lights.create_lights_cones_range();
    let local = lights.create_collided_lights_range(&instance_at(Vec3::ZERO));

    let output = lights.frame_output();
    assert_eq!(output.ring_slot, 1);
    assert_eq!(output.parameters.len(), 2);
    assert_eq!(output.parameters[0].light_type, LightType::Cone as u32);
    assert_eq!(&output.combinations[cones.as_range()], &[0]);
    assert_eq!(&output.combinations[local.as_range()], &[1]);
    assert_eq!(output.uniform_luminance, Vec3::splat(0.1));
    assert_eq!(
        output.parameter_bytes().len(),
        2 * std::mem::size_of::<LightParameters>()
    );
}
