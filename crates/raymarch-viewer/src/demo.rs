use glam::Vec3;
use raymarch_engine::scene::{
    Camera, Color, CombineMode, LightEntity, LightKind, RenderConfig, SceneRegistry,
    ShapeEntity, ShapeKind, Transform,
};

/// Builds the demo scene: a blended pair of spheres, a cube with a spherical
/// cut, a mandelbulb, a shell wrapped around it, and one light of each kind.
pub fn demo_scene() -> SceneRegistry {
    let mut scene = SceneRegistry::new();

    // Registered out of evaluation order on purpose; collection sorts them.
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Sphere)
            .with_combine_mode(CombineMode::Complement)
            .with_transform(
                Transform::from_position(Vec3::new(-3.0, 0.6, 0.0)).with_uniform_scale(0.9),
            ),
    );
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Cube)
            .with_transform(
                Transform::from_position(Vec3::new(-3.0, 0.0, 0.0))
                    .with_uniform_scale(0.8)
                    .with_rotation_degrees(Vec3::new(0.0, 30.0, 0.0)),
            )
            .with_diffuse(Color::rgb(0.9, 0.6, 0.2)),
    );

    scene.add_shape(
        ShapeEntity::new(ShapeKind::Sphere)
            .with_transform(Transform::from_position(Vec3::new(-0.4, 0.0, 0.0)))
            .with_diffuse(Color::rgb(0.2, 0.5, 0.9)),
    );
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Sphere)
            .with_combine_mode(CombineMode::Blend)
            .with_blend_factor(0.8)
            .with_transform(
                Transform::from_position(Vec3::new(0.6, 0.8, 0.0)).with_uniform_scale(0.7),
            )
            .with_diffuse(Color::rgb(0.9, 0.2, 0.4)),
    );

    scene.add_shape(
        ShapeEntity::new(ShapeKind::Fractal)
            .with_fractal_power(8.0)
            .with_transform(
                Transform::from_position(Vec3::new(3.0, 0.2, 0.0)).with_uniform_scale(1.1),
            )
            .with_diffuse(Color::rgb(0.4, 0.9, 0.5)),
    );
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Cube)
            .with_combine_mode(CombineMode::Wrap)
            .with_blend_factor(0.05)
            .with_transform(
                Transform::from_position(Vec3::new(3.0, 1.0, 0.0)).with_scale(Vec3::new(
                    1.5, 0.4, 1.5,
                )),
            )
            .with_diffuse(Color::rgb(0.95, 0.95, 0.95)),
    );

    // Floor slab, intersected with a large sphere to round its edges.
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Cube)
            .with_transform(
                Transform::from_position(Vec3::new(0.0, -1.6, 0.0))
                    .with_scale(Vec3::new(8.0, 0.1, 8.0)),
            )
            .with_diffuse(Color::rgb(0.5, 0.5, 0.55)),
    );
    scene.add_shape(
        ShapeEntity::new(ShapeKind::Sphere)
            .with_combine_mode(CombineMode::Intersection)
            .with_transform(
                Transform::from_position(Vec3::new(0.0, -1.6, 0.0)).with_uniform_scale(9.0),
            ),
    );

    scene.add_light(
        LightEntity::new(LightKind::Directional)
            .with_transform(
                Transform::IDENTITY.with_rotation_degrees(Vec3::new(-50.0, 30.0, 0.0)),
            )
            .with_color(Color::rgb(1.0, 0.95, 0.85)),
    );
    scene.add_light(
        LightEntity::new(LightKind::Point)
            .with_transform(Transform::from_position(Vec3::new(0.0, 3.0, 3.0)))
            .with_color(Color::rgba(0.6, 0.7, 1.0, 2.0)),
    );
    scene.add_light(
        LightEntity::new(LightKind::Spot)
            .with_transform(
                Transform::from_position(Vec3::new(3.0, 5.0, 0.0))
                    .with_rotation_degrees(Vec3::new(-90.0, 0.0, 0.0)),
            )
            .with_color(Color::rgba(1.0, 0.8, 0.5, 3.0))
            .with_cut_off_degrees(25.0),
    );
    scene.add_light(LightEntity::new(LightKind::Ambient).with_color(Color::rgb(0.3, 0.3, 0.35)));

    scene.set_render_config(RenderConfig {
        ambient_occlusion: true,
        fog: true,
        fog_rate: 0.15,
        glow: false,
    });

    scene
}

/// Camera circling the origin.
#[derive(Debug, Copy, Clone)]
pub struct Orbit {
    pub radius: f32,
    pub height: f32,
    /// Radians per second.
    pub speed: f32,
    pub paused: bool,
    angle: f32,
}

impl Orbit {
    pub fn new(radius: f32, height: f32, speed: f32) -> Self {
        Self {
            radius,
            height,
            speed,
            paused: false,
            angle: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.paused {
            self.angle = (self.angle + self.speed * dt) % std::f32::consts::TAU;
        }
    }

    pub fn camera(&self) -> Camera {
        let eye = Vec3::new(
            self.radius * self.angle.sin(),
            self.height,
            self.radius * self.angle.cos(),
        );
        Camera::looking_at(eye, Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raymarch_engine::scene::{SceneProvider, collect_lights, collect_shapes};

    #[test]
    fn demo_scene_covers_every_mode_and_light() {
        let scene = demo_scene();
        let shapes = collect_shapes(&scene);
        let lights = collect_lights(&scene);

        for mode in CombineMode::ALL {
            assert!(shapes.iter().any(|s| s.combine_mode == mode.to_wire()), "{mode:?}");
        }
        for kind in LightKind::ALL {
            assert!(lights.iter().any(|l| l.kind == kind.to_wire()), "{kind:?}");
        }
        assert!(scene.render_config().ambient_occlusion);

        let fractal = shapes
            .iter()
            .find(|s| s.kind == ShapeKind::Fractal.to_wire())
            .unwrap();
        assert_eq!(fractal.diffuse, Color::rgb(0.4, 0.9, 0.5).to_array());
        assert_eq!(fractal.fractal_power, 8.0);
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut orbit = Orbit::new(9.0, 3.0, 0.5);
        for _ in 0..10 {
            orbit.advance(0.3);
            let cam = orbit.camera();
            let flat = Vec3::new(cam.position.x, 0.0, cam.position.z);
            assert!((flat.length() - 9.0).abs() < 1e-4);
            assert_eq!(cam.position.y, 3.0);
        }
    }

    #[test]
    fn paused_orbit_does_not_move() {
        let mut orbit = Orbit::new(5.0, 1.0, 1.0);
        orbit.paused = true;
        let before = orbit.camera();
        orbit.advance(1.0);
        assert_eq!(orbit.camera(), before);
    }
}
