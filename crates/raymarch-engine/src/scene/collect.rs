use crate::layout::{LightRecord, ShapeRecord};

use super::{LightEntity, SceneProvider, ShapeEntity};

/// Collects the live shapes of `scene` in evaluation order.
///
/// Shapes are stably sorted by combine-mode rank: unions and blends first,
/// then the modes that read the accumulated field. Shapes of equal rank keep
/// their discovery order. Inactive shapes are skipped.
pub fn collect_shapes<S: SceneProvider>(scene: &S) -> Vec<ShapeRecord> {
    let mut live: Vec<&ShapeEntity> = scene.shapes().filter(|s| s.active).collect();
    // `sort_by_key` is stable.
    live.sort_by_key(|s| s.combine_mode.rank());
    live.into_iter().map(shape_record).collect()
}

/// Collects the live lights of `scene` in discovery order.
pub fn collect_lights<S: SceneProvider>(scene: &S) -> Vec<LightRecord> {
    scene
        .lights()
        .filter(|l| l.active)
        .map(light_record)
        .collect()
}

/// Projects one shape into its GPU record. Rotation leaves here in radians.
pub fn shape_record(shape: &ShapeEntity) -> ShapeRecord {
    let t = &shape.transform;
    let m = &shape.material;
    ShapeRecord {
        kind: shape.kind.to_wire(),
        combine_mode: shape.combine_mode.to_wire(),
        position: t.position.to_array(),
        scale: t.scale.to_array(),
        rotation: t.rotation_radians().to_array(),
        normal: t.up().to_array(),
        ambient: m.ambient.to_array(),
        diffuse: m.diffuse.to_array(),
        specular: m.specular.to_array(),
        blend_factor: shape.blend_factor,
        fractal_power: shape.fractal_power,
    }
}

/// Projects one light into its GPU record. Rotation leaves here in radians.
pub fn light_record(light: &LightEntity) -> LightRecord {
    let t = &light.transform;
    LightRecord {
        kind: light.kind.to_wire(),
        position: t.position.to_array(),
        scale: t.scale.to_array(),
        rotation: t.rotation_radians().to_array(),
        color: light.color.to_array(),
        forward: t.forward().to_array(),
        cut_off: light.cut_off,
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scene::{
        Color, CombineMode, DEG_TO_RAD, LightKind, SceneRegistry, ShapeKind, Transform,
    };

    fn tagged(mode: CombineMode, tag: f32) -> ShapeEntity {
        // `blend_factor` doubles as a discovery-order tag.
        ShapeEntity::new(ShapeKind::Sphere)
            .with_combine_mode(mode)
            .with_blend_factor(tag)
    }

    fn modes_and_tags(records: &[ShapeRecord]) -> Vec<(i32, f32)> {
        records.iter().map(|r| (r.combine_mode, r.blend_factor)).collect()
    }

    #[test]
    fn empty_scene_collects_nothing() {
        let reg = SceneRegistry::new();
        assert!(collect_shapes(&reg).is_empty());
        assert!(collect_lights(&reg).is_empty());
    }

    #[test]
    fn shapes_sorted_by_rank_with_stable_ties() {
        let mut reg = SceneRegistry::new();
        reg.add_shape(tagged(CombineMode::Intersection, 0.0));
        reg.add_shape(tagged(CombineMode::Default, 1.0));
        reg.add_shape(tagged(CombineMode::Complement, 2.0));
        reg.add_shape(tagged(CombineMode::Default, 3.0));
        reg.add_shape(tagged(CombineMode::Blend, 4.0));
        reg.add_shape(tagged(CombineMode::Wrap, 5.0));
        reg.add_shape(tagged(CombineMode::Blend, 6.0));

        let got = modes_and_tags(&collect_shapes(&reg));
        assert_eq!(
            got,
            [(0, 1.0), (0, 3.0), (1, 4.0), (1, 6.0), (2, 5.0), (3, 2.0), (4, 0.0)]
        );
    }

    #[test]
    fn resorting_sorted_shapes_is_identity() {
        let mut reg = SceneRegistry::new();
        for (i, mode) in [
            CombineMode::Wrap,
            CombineMode::Default,
            CombineMode::Wrap,
            CombineMode::Blend,
        ]
        .into_iter()
        .enumerate()
        {
            reg.add_shape(tagged(mode, i as f32));
        }
        let once = collect_shapes(&reg);

        // Re-register in the collected order and collect again.
        let mut again = SceneRegistry::new();
        for r in &once {
            again.add_shape(tagged(CombineMode::from_wire(r.combine_mode).unwrap(), r.blend_factor));
        }
        assert_eq!(collect_shapes(&again), once);
    }

    #[test]
    fn lights_keep_discovery_order() {
        let mut reg = SceneRegistry::new();
        for kind in [LightKind::Spot, LightKind::Directional, LightKind::Ambient, LightKind::Point] {
            reg.add_light(LightEntity::new(kind));
        }
        let kinds: Vec<i32> = collect_lights(&reg).iter().map(|l| l.kind).collect();
        assert_eq!(kinds, [2, 0, 3, 1]);
    }

    #[test]
    fn rotation_is_converted_to_radians() {
        let degrees = Vec3::new(90.0, -30.0, 12.5);
        let t = Transform::IDENTITY.with_rotation_degrees(degrees);

        let mut reg = SceneRegistry::new();
        reg.add_shape(ShapeEntity::new(ShapeKind::Cube).with_transform(t));
        reg.add_light(LightEntity::new(LightKind::Spot).with_transform(t));

        let expected = [
            degrees.x * DEG_TO_RAD,
            degrees.y * DEG_TO_RAD,
            degrees.z * DEG_TO_RAD,
        ];
        assert_eq!(collect_shapes(&reg)[0].rotation, expected);
        assert_eq!(collect_lights(&reg)[0].rotation, expected);
    }

    #[test]
    fn inactive_entities_are_skipped() {
        let mut reg = SceneRegistry::new();
        let hidden = reg.add_shape(ShapeEntity::new(ShapeKind::Sphere));
        reg.add_shape(ShapeEntity::new(ShapeKind::Cube));
        let dark = reg.add_light(LightEntity::new(LightKind::Point));
        reg.set_active(hidden, false);
        reg.set_active(dark, false);

        let shapes = collect_shapes(&reg);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].kind, ShapeKind::Cube.to_wire());
        assert!(collect_lights(&reg).is_empty());
    }

    #[test]
    fn derived_directions_come_from_transform() {
        let t = Transform::IDENTITY.with_rotation_degrees(Vec3::new(90.0, 0.0, 0.0));
        let shape = shape_record(&ShapeEntity::new(ShapeKind::Cube).with_transform(t));
        let light = light_record(
            &LightEntity::new(LightKind::Directional)
                .with_transform(t)
                .with_color(Color::rgb(1.0, 0.5, 0.0)),
        );

        assert!((Vec3::from_array(shape.normal) - Vec3::Z).length() < 1e-5);
        assert!((Vec3::from_array(light.forward) - Vec3::Y).length() < 1e-5);
        assert_eq!(light.color, [1.0, 0.5, 0.0, 1.0]);
    }
}
