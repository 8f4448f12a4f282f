use glam::Vec3;

use super::{Color, Transform};

/// SDF selector. The discriminant is the wire value read by the kernel.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ShapeKind {
    Sphere = 0,
    #[default]
    Cube = 1,
    Fractal = 2,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Sphere, Self::Cube, Self::Fractal];

    #[inline]
    pub const fn to_wire(self) -> i32 {
        self as i32
    }

    pub const fn from_wire(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Sphere),
            1 => Some(Self::Cube),
            2 => Some(Self::Fractal),
            _ => None,
        }
    }
}

/// How a shape folds into the distance field accumulated from earlier shapes.
///
/// The wire value doubles as the evaluation rank: shapes are uploaded in
/// ascending rank order, so every mode that reads the accumulated field
/// (`Wrap`, `Complement`, `Intersection`) sees all unions and blends first.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CombineMode {
    /// Plain union.
    #[default]
    Default = 0,
    /// Smooth union using the shape's blend factor.
    Blend = 1,
    /// Shell of the shape hugging the accumulated surface.
    Wrap = 2,
    /// Subtracts the shape from the accumulated field.
    Complement = 3,
    Intersection = 4,
}

impl CombineMode {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Blend,
        Self::Wrap,
        Self::Complement,
        Self::Intersection,
    ];

    #[inline]
    pub const fn to_wire(self) -> i32 {
        self as i32
    }

    #[inline]
    pub const fn rank(self) -> i32 {
        self.to_wire()
    }

    pub const fn from_wire(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Default),
            1 => Some(Self::Blend),
            2 => Some(Self::Wrap),
            3 => Some(Self::Complement),
            4 => Some(Self::Intersection),
            _ => None,
        }
    }
}

/// Phong reflectance of a shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Color,
    pub specular: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.3),
            diffuse: Color::WHITE,
            specular: Vec3::ONE,
        }
    }
}

/// Author-time range for the fractal exponent.
pub const FRACTAL_POWER_RANGE: (f32, f32) = (1.0, 30.0);

/// One implicit surface in the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeEntity {
    pub kind: ShapeKind,
    pub combine_mode: CombineMode,
    pub transform: Transform,
    pub material: Material,
    /// Smoothing radius used by [`CombineMode::Blend`] and [`CombineMode::Wrap`].
    pub blend_factor: f32,
    pub fractal_power: f32,
    /// Inactive shapes stay registered but are not collected.
    pub active: bool,
}

impl ShapeEntity {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_combine_mode(mut self, mode: CombineMode) -> Self {
        self.combine_mode = mode;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.material.diffuse = diffuse;
        self
    }

    pub fn with_blend_factor(mut self, blend: f32) -> Self {
        self.blend_factor = blend.max(0.0);
        self
    }

    /// Sets the fractal exponent, clamped to [`FRACTAL_POWER_RANGE`].
    pub fn with_fractal_power(mut self, power: f32) -> Self {
        let (lo, hi) = FRACTAL_POWER_RANGE;
        self.fractal_power = power.clamp(lo, hi);
        self
    }
}

impl Default for ShapeEntity {
    fn default() -> Self {
        Self {
            kind: ShapeKind::default(),
            combine_mode: CombineMode::default(),
            transform: Transform::IDENTITY,
            material: Material::default(),
            blend_factor: 0.0,
            fractal_power: FRACTAL_POWER_RANGE.0,
            active: true,
        }
    }
}
