//! Builds one frame of light clustering for a small grid of instances and
//! prints the resulting ranges.
//!
//! Run with `RUST_LOG=debug` to see the per-frame statistics.

use light_cluster::*;

fn main() {
    env_logger::init();

    let mut lights = Lights::default();
    let sun = lights.add_light_entity();
    let sky = lights.add_light_entity();
    let lamps: Vec<LightId> = (0..4).map(|_| lights.add_light_entity()).collect();

    let view = Mat4::look_at_rh(Vec3::new(4.0, 6.0, 14.0), Vec3::new(4.0, 0.0, 4.0), Vec3::Y);
    let projection = Mat4::perspective_rh(60.0f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
    let culling = FrustumCulling::from_view_projection(projection * view);

    let mesh_bounds = Obb::from_triangles(&[
        [Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 0.0, -0.5), Vec3::new(0.0, 1.0, 0.0)],
        [Vec3::new(-0.5, 0.0, 0.5), Vec3::new(0.5, 0.0, 0.5), Vec3::new(0.0, 1.0, 0.0)],
    ]);
    let instances: Vec<Paralgram> = (0..25)
        .map(|i| {
            let position = Vec3::new((i % 5) as f32 * 2.0, 0.0, (i / 5) as f32 * 2.0);
            mesh_bounds.transform(&Mat4::from_translation(position))
        })
        .collect();

    let mut model_matrices = Vec::new();
    let mut infos = vec![
        LightInfo::new(sun.index(), LightType::Cone, 0).with_luminance(Vec3::new(3.0, 2.8, 2.5)),
        LightInfo::new(sky.index(), LightType::Uniform, 0).with_luminance(Vec3::splat(0.05)),
    ];
    for (i, lamp) in lamps.iter().enumerate() {
        model_matrices.push(Mat4::from_translation(Vec3::new(
            (i % 2) as f32 * 8.0,
            1.5,
            (i / 2) as f32 * 8.0,
        )));
        infos.push(
            LightInfo::new(lamp.index(), LightType::Point, i as u32)
                .with_luminance(Vec3::splat(10.0))
                .with_range(3.5),
        );
    }

    for frame in 0..2u64 {
        lights.prepare_new_frame(frame);
        lights.add_lights(&mut infos, &model_matrices);
        let cones = lights.create_lights_cones_range();

        for index in culling.visible_indices(&instances) {
            let range = lights.create_collided_lights_range(&instances[index]);
            println!(
                "frame {frame} instance {index:2}: cones {:?}, local {:?} -> {:?}",
                cones,
                range,
                &lights.combinations()[range.as_range()]
            );
        }

        let output = lights.frame_output();
        println!(
            "frame {frame}: ring slot {}, {} light records, {} index entries, ambient {:?}",
            output.ring_slot,
            output.parameters.len(),
            output.combinations.len(),
            output.uniform_luminance
        );
    }
}
