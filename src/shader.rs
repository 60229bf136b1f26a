//! The distortion effect: GLSL sources, the uniform block fed each frame, and a
//! CPU mirror of the fragment math used by host tests.

use crate::distortion::DisplayedDistortion;

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
uniform vec2 u_uv_scale;
uniform vec2 u_uv_offset;
out vec2 v_uv;
out vec2 v_image_uv;

void main() {
    v_uv = a_position * 0.5 + 0.5;
    v_image_uv = v_uv * u_uv_scale + u_uv_offset;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_texture;
uniform float u_time;
uniform float u_distortion;
uniform vec2 u_direction;

in vec2 v_uv;
in vec2 v_image_uv;
out vec4 out_color;

void main() {
    vec2 uv = v_image_uv;

    float wave = sin(uv.y * 10.0 + u_time * 0.5) * u_distortion * 0.5;
    float wave2 = cos(uv.x * 8.0 + u_time * 0.3) * u_distortion * 0.3;
    uv.x += wave * u_direction.x + wave2;
    uv.y += wave * u_direction.y + wave2;

    vec2 shift = vec2(u_distortion * 0.008, 0.0) * u_direction;
    float r = texture(u_texture, uv + shift).r;
    float g = texture(u_texture, uv).g;
    float b = texture(u_texture, uv - shift).b;

    float vignette = 1.0 - length(v_uv - 0.5) * 0.5;
    out_color = vec4(vec3(r, g, b) * vignette, 1.0);
}
"#;

/// Images are uploaded bottom row first (`UNPACK_FLIP_Y_WEBGL`) so that texture
/// `v = 1` is the top of the picture, matching `v_uv.y = 1` at the top of the
/// canvas.
pub const FLIP_Y_ON_UPLOAD: bool = true;

/// Two triangles covering clip space, as a strip.
pub const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Values uploaded to the fragment stage each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uniforms {
    pub time: f32,
    pub distortion: f32,
    pub direction: [f32; 2],
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
}

impl Uniforms {
    pub fn new(time: f32, shown: &DisplayedDistortion, fit: CoverFit) -> Self {
        Self {
            time,
            distortion: shown.intensity,
            direction: shown.direction,
            uv_scale: fit.scale,
            uv_offset: fit.offset,
        }
    }
}

/// Texture-space transform that makes an image cover the canvas, cropping the
/// overflowing axis symmetrically (CSS `object-fit: cover`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl Default for CoverFit {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0],
            offset: [0.0, 0.0],
        }
    }
}

impl CoverFit {
    /// Fit for a `canvas_w × canvas_h` target and an `image_w × image_h` source.
    /// Degenerate sizes give the identity fit.
    pub fn new(canvas_w: f64, canvas_h: f64, image_w: f64, image_h: f64) -> Self {
        if canvas_w <= 0.0 || canvas_h <= 0.0 || image_w <= 0.0 || image_h <= 0.0 {
            return Self::default();
        }
        let canvas_aspect = canvas_w / canvas_h;
        let image_aspect = image_w / image_h;
        let (sx, sy) = if canvas_aspect > image_aspect {
            // Canvas is wider: crop top and bottom.
            (1.0, image_aspect / canvas_aspect)
        } else {
            (canvas_aspect / image_aspect, 1.0)
        };
        Self {
            scale: [sx as f32, sy as f32],
            offset: [((1.0 - sx) * 0.5) as f32, ((1.0 - sy) * 0.5) as f32],
        }
    }

    pub fn apply(&self, uv: [f32; 2]) -> [f32; 2] {
        [
            uv[0] * self.scale[0] + self.offset[0],
            uv[1] * self.scale[1] + self.offset[1],
        ]
    }
}

/// Where a texture coordinate lands in the source image, as `[x, row]` with
/// row 0 at the image's top edge.
pub fn image_point(tex_uv: [f32; 2]) -> [f32; 2] {
    let row = if FLIP_Y_ON_UPLOAD { 1.0 - tex_uv[1] } else { tex_uv[1] };
    [tex_uv[0], row]
}

/// Texture coordinate the vertex stage hands the fragment stage for a clip
/// space position.
pub fn vertex_uv(clip: [f32; 2], fit: &CoverFit) -> [f32; 2] {
    fit.apply([clip[0] * 0.5 + 0.5, clip[1] * 0.5 + 0.5])
}

/// CPU mirror of the wave warp in [`FRAGMENT_SHADER`].
pub fn warp(uv: [f32; 2], u: &Uniforms) -> [f32; 2] {
    let wave = (uv[1] * 10.0 + u.time * 0.5).sin() * u.distortion * 0.5;
    let wave2 = (uv[0] * 8.0 + u.time * 0.3).cos() * u.distortion * 0.3;
    [
        uv[0] + wave * u.direction[0] + wave2,
        uv[1] + wave * u.direction[1] + wave2,
    ]
}

/// Offset of the red sample; blue uses the negation.
pub fn chroma_shift(u: &Uniforms) -> [f32; 2] {
    let shift = u.distortion * 0.008;
    [shift * u.direction[0], 0.0]
}

pub fn vignette(screen_uv: [f32; 2]) -> f32 {
    let dx = screen_uv[0] - 0.5;
    let dy = screen_uv[1] - 0.5;
    1.0 - (dx * dx + dy * dy).sqrt() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distortion_is_identity() {
        let u = Uniforms {
            time: 12.5,
            direction: [1.0, 0.3],
            ..Uniforms::default()
        };
        assert_eq!(warp([0.25, 0.75], &u), [0.25, 0.75]);
        assert_eq!(chroma_shift(&u), [0.0, 0.0]);
    }

    #[test]
    fn warp_is_bounded_by_intensity() {
        let u = Uniforms {
            time: 3.0,
            distortion: 0.5,
            direction: [-1.0, 0.3],
            ..Uniforms::default()
        };
        for i in 0..=10 {
            let p = i as f32 / 10.0;
            let [x, y] = warp([p, 1.0 - p], &u);
            assert!((x - p).abs() <= 0.5 * 0.5 + 0.5 * 0.3 + 1e-6);
            assert!((y - (1.0 - p)).abs() <= 0.5 * 0.5 * 0.3 + 0.5 * 0.3 + 1e-6);
        }
    }

    #[test]
    fn chroma_shift_follows_horizontal_direction() {
        let u = Uniforms {
            distortion: 0.5,
            direction: [-1.0, 0.3],
            ..Uniforms::default()
        };
        assert_eq!(chroma_shift(&u), [-0.004, 0.0]);
    }

    #[test]
    fn vignette_darkens_toward_corners() {
        assert_eq!(vignette([0.5, 0.5]), 1.0);
        let corner = vignette([0.0, 0.0]);
        assert!((corner - (1.0 - 0.5f32.sqrt() * 0.5)).abs() < 1e-6);
        assert!(vignette([0.5, 0.1]) > corner);
    }

    #[test]
    fn uniforms_carry_filtered_values() {
        let mut shown = DisplayedDistortion::default();
        shown.intensity = 0.2;
        shown.direction = [0.5, 0.1];
        let u = Uniforms::new(1.5, &shown, CoverFit::default());
        assert_eq!(u.distortion, 0.2);
        assert_eq!(u.direction, [0.5, 0.1]);
        assert_eq!(u.uv_scale, [1.0, 1.0]);
    }
}
