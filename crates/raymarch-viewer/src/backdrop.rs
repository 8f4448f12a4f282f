use raymarch_engine::scene::Color;

const WIDTH: u32 = 4;
const HEIGHT: u32 = 256;

/// Vertical gradient used as the kernel's source image.
///
/// Fixed size; the kernel rescales it to whatever the output extent is.
pub struct Backdrop {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Backdrop {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, top: Color, bottom: Color) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("raymarch backdrop"),
            size: wgpu::Extent3d {
                width: WIDTH,
                height: HEIGHT,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let texels = gradient_texels(top, bottom);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(WIDTH * 4),
                rows_per_image: Some(HEIGHT),
            },
            wgpu::Extent3d {
                width: WIDTH,
                height: HEIGHT,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// sRGB-encoded RGBA8 rows, `top` on row 0.
fn gradient_texels(top: Color, bottom: Color) -> Vec<u8> {
    let mut out = Vec::with_capacity((WIDTH * HEIGHT * 4) as usize);
    for y in 0..HEIGHT {
        let t = y as f32 / (HEIGHT - 1) as f32;
        let px = [
            encode_srgb(lerp(top.r, bottom.r, t)),
            encode_srgb(lerp(top.g, bottom.g, t)),
            encode_srgb(lerp(top.b, bottom.b, t)),
            255,
        ];
        for _ in 0..WIDTH {
            out.extend_from_slice(&px);
        }
    }
    out
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn encode_srgb(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let s = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_runs_top_to_bottom() {
        let texels = gradient_texels(Color::WHITE, Color::BLACK);
        assert_eq!(texels.len(), (WIDTH * HEIGHT * 4) as usize);
        assert_eq!(&texels[..4], &[255, 255, 255, 255]);
        let last_row = ((HEIGHT - 1) * WIDTH * 4) as usize;
        assert_eq!(&texels[last_row..last_row + 4], &[0, 0, 0, 255]);
    }

    #[test]
    fn srgb_encoding_round_trips_through_color() {
        for v in [0u8, 17, 128, 200, 255] {
            let linear = Color::from_srgb_u8(v, v, v, 255).r;
            assert_eq!(encode_srgb(linear), v);
        }
    }
}
