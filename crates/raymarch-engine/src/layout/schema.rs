//! Field tables describing the GPU record layouts.
//!
//! Every record type has exactly one table listing its fields in wire order.
//! A field records the schema version that introduced it, so older layouts are
//! the ordered subset of fields present at that version. The stride of any
//! version is derived from the table by [`layout_stride`] and nowhere else.

/// Record schema revision. Fields are only ever added.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum SchemaVersion {
    /// Transform, color and combine data.
    V1 = 1,
    /// Full Phong material, orientation and spot cut-off.
    V2 = 2,
    /// Fractal exponent and shading feature flags.
    #[default]
    V3 = 3,
}

impl SchemaVersion {
    pub const LATEST: Self = Self::V3;
    pub const ALL: [Self; 3] = [Self::V1, Self::V2, Self::V3];

    /// Whether the AO/fog/glow uniforms exist at this version.
    #[inline]
    pub const fn supports_feature_flags(self) -> bool {
        self as u8 >= Self::V3 as u8
    }
}

/// Scalar shape of a record field. All components are 4 bytes wide.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldType {
    I32,
    F32,
    Vec3,
    Vec4,
}

impl FieldType {
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::I32 | Self::F32 => 4,
            Self::Vec3 => 12,
            Self::Vec4 => 16,
        }
    }
}

/// One field of a record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FieldDesc {
    pub name: &'static str,
    pub ty: FieldType,
    pub since: SchemaVersion,
    /// Byte offset inside the latest-version `#[repr(C)]` struct.
    pub offset: usize,
}

impl FieldDesc {
    pub const fn new(name: &'static str, ty: FieldType, since: SchemaVersion, offset: usize) -> Self {
        Self {
            name,
            ty,
            since,
            offset,
        }
    }

    #[inline]
    pub const fn present_in(&self, version: SchemaVersion) -> bool {
        self.since as u8 <= version as u8
    }
}

/// Byte stride of one record at `version`.
pub const fn layout_stride(fields: &[FieldDesc], version: SchemaVersion) -> u64 {
    let mut total = 0u64;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].present_in(version) {
            total += fields[i].ty.size() as u64;
        }
        i += 1;
    }
    total
}

/// True when the fields tile `0..size` in table order with no gaps.
pub const fn fields_are_packed(fields: &[FieldDesc], size: usize) -> bool {
    let mut expected = 0usize;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].offset != expected {
            return false;
        }
        expected += fields[i].ty.size();
        i += 1;
    }
    expected == size
}
