/// Shading feature toggles forwarded to the kernel.
///
/// Only uploaded when the active schema version supports feature flags.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RenderConfig {
    pub ambient_occlusion: bool,
    pub fog: bool,
    /// Fog density in `[0, 1]`.
    pub fog_rate: f32,
    pub glow: bool,
}

impl RenderConfig {
    /// Returns a copy with `fog_rate` clamped into `[0, 1]` (NaN becomes 0).
    pub fn sanitized(self) -> Self {
        let fog_rate = if self.fog_rate.is_nan() {
            0.0
        } else {
            self.fog_rate.clamp(0.0, 1.0)
        };
        Self { fog_rate, ..self }
    }
}
