use super::{Color, DEG_TO_RAD, Transform};

/// Light type. The discriminant is the wire value read by the kernel.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum LightKind {
    #[default]
    Directional = 0,
    Point = 1,
    Spot = 2,
    Ambient = 3,
}

impl LightKind {
    pub const ALL: [Self; 4] = [Self::Directional, Self::Point, Self::Spot, Self::Ambient];

    #[inline]
    pub const fn to_wire(self) -> i32 {
        self as i32
    }

    pub const fn from_wire(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::Directional),
            1 => Some(Self::Point),
            2 => Some(Self::Spot),
            3 => Some(Self::Ambient),
            _ => None,
        }
    }
}

/// One illumination source in the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightEntity {
    pub kind: LightKind,
    pub transform: Transform,
    pub color: Color,
    /// Spot cone half-angle in radians. Ignored by other kinds.
    pub cut_off: f32,
    pub active: bool,
}

impl LightEntity {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_cut_off(mut self, radians: f32) -> Self {
        self.cut_off = radians;
        self
    }

    pub fn with_cut_off_degrees(self, degrees: f32) -> Self {
        self.with_cut_off(degrees * DEG_TO_RAD)
    }
}

impl Default for LightEntity {
    fn default() -> Self {
        Self {
            kind: LightKind::default(),
            transform: Transform::IDENTITY,
            color: Color::WHITE,
            cut_off: 0.0,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_stable() {
        assert_eq!(LightKind::Directional.to_wire(), 0);
        assert_eq!(LightKind::Point.to_wire(), 1);
        assert_eq!(LightKind::Spot.to_wire(), 2);
        assert_eq!(LightKind::Ambient.to_wire(), 3);
        for k in LightKind::ALL {
            assert_eq!(LightKind::from_wire(k.to_wire()), Some(k));
        }
        assert_eq!(LightKind::from_wire(4), None);
    }

    #[test]
    fn cut_off_degrees_stored_as_radians() {
        let l = LightEntity::new(LightKind::Spot).with_cut_off_degrees(30.0);
        assert_eq!(l.cut_off, 30.0 * DEG_TO_RAD);
    }
}
