//! CPU-side mirror of the kernel's memory layout.
//!
//! Responsibilities:
//! - define the fixed-layout shape/light records and the uniform block
//! - derive per-version strides from a single field table per record
//! - encode/decode record buffers for any schema version
//! - verify at startup that the kernel declares the same struct sizes

mod encode;
mod params;
mod records;
mod reflect;
mod schema;

pub use encode::{decode, encode};
pub use params::{KERNEL_PARAMS_SIZE, KernelParams};
pub use records::{GpuRecord, LIGHT_FIELDS, LightRecord, SHAPE_FIELDS, ShapeRecord};
pub use reflect::{KernelLayout, verify_kernel_layout};
pub use schema::{FieldDesc, FieldType, SchemaVersion, fields_are_packed, layout_stride};
