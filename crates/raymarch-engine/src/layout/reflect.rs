use crate::error::{RenderError, RenderResult};

use super::params::{KERNEL_PARAMS_SIZE, KernelParams};
use super::records::{GpuRecord, LightRecord, ShapeRecord};
use super::schema::SchemaVersion;

/// Strides verified against a kernel's own struct declarations.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KernelLayout {
    pub version: SchemaVersion,
    pub shape_stride: u64,
    pub light_stride: u64,
    pub params_size: u64,
}

/// Parses the kernel source and checks that its `ShapeRecord`, `LightRecord`
/// and `KernelParams` structs have the sizes the CPU side writes at `version`.
///
/// Run once at startup, before any pipeline is built.
pub fn verify_kernel_layout(source: &str, version: SchemaVersion) -> RenderResult<KernelLayout> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| RenderError::KernelSource(e.emit_to_string(source)))?;

    let layout = KernelLayout {
        version,
        shape_stride: ShapeRecord::stride(version),
        light_stride: LightRecord::stride(version),
        params_size: KERNEL_PARAMS_SIZE,
    };

    expect_size(&module, ShapeRecord::KERNEL_NAME, layout.shape_stride)?;
    expect_size(&module, LightRecord::KERNEL_NAME, layout.light_stride)?;
    expect_size(&module, KernelParams::KERNEL_NAME, layout.params_size)?;

    log::debug!(
        "kernel layout verified ({version:?}): shape={}B light={}B params={}B",
        layout.shape_stride,
        layout.light_stride,
        layout.params_size
    );

    Ok(layout)
}

fn expect_size(module: &naga::Module, name: &'static str, cpu_stride: u64) -> RenderResult<()> {
    let kernel_stride = struct_span(module, name).ok_or(RenderError::MissingKernelStruct(name))?;
    if kernel_stride != cpu_stride {
        return Err(RenderError::LayoutMismatch {
            record: name,
            cpu_stride,
            kernel_stride,
        });
    }
    Ok(())
}

fn struct_span(module: &naga::Module, name: &str) -> Option<u64> {
    module.types.iter().find_map(|(_, ty)| match &ty.inner {
        naga::TypeInner::Struct { span, .. } if ty.name.as_deref() == Some(name) => {
            Some(u64::from(*span))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RAYMARCH_KERNEL;

    #[test]
    fn shipped_kernel_matches_latest_schema() {
        let layout = verify_kernel_layout(RAYMARCH_KERNEL, SchemaVersion::LATEST).unwrap();
        assert_eq!(layout.shape_stride, 104);
        assert_eq!(layout.light_stride, 72);
        assert_eq!(layout.params_size, 160);
    }

    #[test]
    fn older_schema_is_rejected_by_shipped_kernel() {
        let err = verify_kernel_layout(RAYMARCH_KERNEL, SchemaVersion::V1).unwrap_err();
        assert_eq!(
            err,
            RenderError::LayoutMismatch {
                record: "ShapeRecord",
                cpu_stride: 64,
                kernel_stride: 104,
            }
        );
    }

    #[test]
    fn padded_kernel_struct_is_a_mismatch() {
        // vec3<f32> aligns to 16 bytes in WGSL and silently pads the record.
        let src = r#"
            struct ShapeRecord { kind: i32, position: vec3<f32> }
            struct LightRecord { kind: i32 }
            struct KernelParams { a: mat4x4<f32> }
            @group(0) @binding(0) var<storage, read> shapes: array<ShapeRecord>;
            @group(0) @binding(1) var<storage, read> lights: array<LightRecord>;
            @group(0) @binding(2) var<uniform> params: KernelParams;
            @compute @workgroup_size(1) fn main() {
                _ = shapes[0].kind;
                _ = lights[0].kind;
                _ = params.a;
            }
        "#;
        let err = verify_kernel_layout(src, SchemaVersion::LATEST).unwrap_err();
        assert!(matches!(
            err,
            RenderError::LayoutMismatch { record: "ShapeRecord", kernel_stride: 32, .. }
        ));
    }

    #[test]
    fn missing_struct_is_reported() {
        let src = "@compute @workgroup_size(1) fn main() {}";
        assert_eq!(
            verify_kernel_layout(src, SchemaVersion::LATEST).unwrap_err(),
            RenderError::MissingKernelStruct("ShapeRecord")
        );
    }

    #[test]
    fn unparsable_kernel_is_reported() {
        let err = verify_kernel_layout("struct {", SchemaVersion::LATEST).unwrap_err();
        assert!(matches!(err, RenderError::KernelSource(_)));
    }
}
