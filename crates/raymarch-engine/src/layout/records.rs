use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

use super::schema::FieldType::{F32, I32, Vec3, Vec4};
use super::schema::SchemaVersion::{V1, V2, V3};
use super::schema::{FieldDesc, SchemaVersion, fields_are_packed, layout_stride};

/// A fixed-layout record uploaded into a structured GPU buffer.
///
/// The struct itself always has the latest layout; older versions are
/// produced by [`encode`](super::encode) from `FIELDS`.
pub trait GpuRecord: Pod + Default + PartialEq + std::fmt::Debug {
    /// Struct name declared by the kernel.
    const KERNEL_NAME: &'static str;
    /// Fields in wire order.
    const FIELDS: &'static [FieldDesc];

    #[inline]
    fn stride(version: SchemaVersion) -> u64 {
        layout_stride(Self::FIELDS, version)
    }
}

/// Shape record as read by the kernel (104 bytes at V3).
///
///  offset   0  kind           i32
///  offset   4  combine_mode   i32
///  offset   8  position       [f32; 3]
///  offset  20  scale          [f32; 3]
///  offset  32  rotation       [f32; 3]   radians
///  offset  44  normal         [f32; 3]   V2
///  offset  56  ambient        [f32; 3]   V2
///  offset  68  diffuse        [f32; 4]
///  offset  84  specular       [f32; 3]   V2
///  offset  96  blend_factor   f32
///  offset 100  fractal_power  f32        V3
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeRecord {
    pub kind: i32,
    pub combine_mode: i32,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub normal: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 4],
    pub specular: [f32; 3],
    pub blend_factor: f32,
    pub fractal_power: f32,
}

pub const SHAPE_FIELDS: &[FieldDesc] = &[
    FieldDesc::new("kind", I32, V1, offset_of!(ShapeRecord, kind)),
    FieldDesc::new("combine_mode", I32, V1, offset_of!(ShapeRecord, combine_mode)),
    FieldDesc::new("position", Vec3, V1, offset_of!(ShapeRecord, position)),
    FieldDesc::new("scale", Vec3, V1, offset_of!(ShapeRecord, scale)),
    FieldDesc::new("rotation", Vec3, V1, offset_of!(ShapeRecord, rotation)),
    FieldDesc::new("normal", Vec3, V2, offset_of!(ShapeRecord, normal)),
    FieldDesc::new("ambient", Vec3, V2, offset_of!(ShapeRecord, ambient)),
    FieldDesc::new("diffuse", Vec4, V1, offset_of!(ShapeRecord, diffuse)),
    FieldDesc::new("specular", Vec3, V2, offset_of!(ShapeRecord, specular)),
    FieldDesc::new("blend_factor", F32, V1, offset_of!(ShapeRecord, blend_factor)),
    FieldDesc::new("fractal_power", F32, V3, offset_of!(ShapeRecord, fractal_power)),
];

impl GpuRecord for ShapeRecord {
    const KERNEL_NAME: &'static str = "ShapeRecord";
    const FIELDS: &'static [FieldDesc] = SHAPE_FIELDS;
}

/// Light record as read by the kernel (72 bytes at V3).
///
///  offset  0  kind       i32
///  offset  4  position   [f32; 3]
///  offset 16  scale      [f32; 3]   V2
///  offset 28  rotation   [f32; 3]   V2, radians
///  offset 40  color      [f32; 4]
///  offset 56  forward    [f32; 3]
///  offset 68  cut_off    f32        V2, radians
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LightRecord {
    pub kind: i32,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub color: [f32; 4],
    pub forward: [f32; 3],
    pub cut_off: f32,
}

pub const LIGHT_FIELDS: &[FieldDesc] = &[
    FieldDesc::new("kind", I32, V1, offset_of!(LightRecord, kind)),
    FieldDesc::new("position", Vec3, V1, offset_of!(LightRecord, position)),
    FieldDesc::new("scale", Vec3, V2, offset_of!(LightRecord, scale)),
    FieldDesc::new("rotation", Vec3, V2, offset_of!(LightRecord, rotation)),
    FieldDesc::new("color", Vec4, V1, offset_of!(LightRecord, color)),
    FieldDesc::new("forward", Vec3, V1, offset_of!(LightRecord, forward)),
    FieldDesc::new("cut_off", F32, V2, offset_of!(LightRecord, cut_off)),
];

impl GpuRecord for LightRecord {
    const KERNEL_NAME: &'static str = "LightRecord";
    const FIELDS: &'static [FieldDesc] = LIGHT_FIELDS;
}

// The struct layout and the field tables must agree byte for byte.
const _: () = assert!(fields_are_packed(SHAPE_FIELDS, size_of::<ShapeRecord>()));
const _: () = assert!(fields_are_packed(LIGHT_FIELDS, size_of::<LightRecord>()));
const _: () = assert!(
    size_of::<ShapeRecord>() as u64 == layout_stride(SHAPE_FIELDS, SchemaVersion::LATEST)
);
const _: () = assert!(
    size_of::<LightRecord>() as u64 == layout_stride(LIGHT_FIELDS, SchemaVersion::LATEST)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_strides_match_kernel_contract() {
        assert_eq!(ShapeRecord::stride(SchemaVersion::LATEST), 104);
        assert_eq!(LightRecord::stride(SchemaVersion::LATEST), 72);
    }

    #[test]
    fn older_versions_drop_later_fields() {
        // V1 shape: 2 ints + position/scale/rotation + diffuse + blend.
        assert_eq!(ShapeRecord::stride(SchemaVersion::V1), 8 + 36 + 16 + 4);
        // V2 adds normal, ambient, specular.
        assert_eq!(ShapeRecord::stride(SchemaVersion::V2), 64 + 36);
        // V1 light: kind + position + color + forward.
        assert_eq!(LightRecord::stride(SchemaVersion::V1), 4 + 12 + 16 + 12);
        assert_eq!(LightRecord::stride(SchemaVersion::V2), 72);
    }

    #[test]
    fn field_names_are_unique() {
        for table in [SHAPE_FIELDS, LIGHT_FIELDS] {
            for (i, a) in table.iter().enumerate() {
                assert!(table[i + 1..].iter().all(|b| b.name != a.name), "{}", a.name);
            }
        }
    }
}
