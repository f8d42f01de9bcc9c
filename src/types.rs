//! Plain data types shared by the CPU reference and the GL renderer.

use bytemuck::{Pod, Zeroable};

/// A column-major 4×4 matrix, laid out the way `glUniformMatrix4fv` expects.
pub type Mat4 = [f32; 16];

/// The identity matrix.
pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// An RGBA color with straight (non-premultiplied) alpha, components in
/// `[0, 1]`.
pub type Rgba = [f32; 4];

/// Where the scoreboard sits on the frame.
///
/// The two presets are deliberately different placements, not two spellings
/// of the same one: the rotated preset targets frames that reach the filter
/// in sensor orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Near the top-left corner, with the board's local space turned 90°.
    #[default]
    TopLeftRotated,
    /// Near the bottom-left corner, upright.
    BottomLeftUpright,
}

/// GLSL flavor the generated shader sources target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlslDialect {
    /// GLSL ES 1.00, for OpenGL ES 2.0 contexts (mobile pipelines).
    #[default]
    Es100,
    /// GLSL 1.40, for desktop OpenGL 3.1+ contexts.
    Glsl140,
}

impl GlslDialect {
    /// Whether vertex attributes must be recorded in a vertex array object.
    ///
    /// Core-profile desktop contexts have no default vertex array, while
    /// OpenGL ES 2.0 has no vertex array objects at all.
    #[must_use]
    pub fn needs_vertex_array(self) -> bool {
        matches!(self, Self::Glsl140)
    }
}

/// Construction-time configuration of a [`ScoreboardRenderer`].
///
/// [`ScoreboardRenderer`]: crate::ScoreboardRenderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayConfig {
    /// Placement preset for the board and the logo slots.
    pub layout: Layout,
    /// Whether the two logo slots are composited.
    pub logos_enabled: bool,
    /// Shader language flavor of the host's GL context.
    pub dialect: GlslDialect,
}

impl OverlayConfig {
    /// A configuration for `layout` without logos, targeting GLSL ES 1.00.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Enable or disable the logo slots.
    #[must_use]
    pub fn with_logos(mut self, enabled: bool) -> Self {
        self.logos_enabled = enabled;
        self
    }

    /// Select the GLSL dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: GlslDialect) -> Self {
        self.dialect = dialect;
        self
    }
}

/// Score text color, unpacked from a packed `0xAARRGGBB` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreColor(pub u32);

impl ScoreColor {
    /// Opaque white, the default score color.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Channels as RGBA, each divided by 255.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let [a, r, g, b] = self.0.to_be_bytes();
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        ]
    }
}

impl Default for ScoreColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One corner of the full-screen quad.
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct QuadVertex {
    /// Clip-space position (x, y, z).
    pub position: [f32; 3],
    /// Texture coordinate (u, v).
    pub uv: [f32; 2],
}

/// The full-screen quad as a 4-vertex triangle strip.
pub const QUAD: [QuadVertex; 4] = [
    // bottom left
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 0.0],
    },
    // bottom right
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 0.0],
    },
    // top left
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 1.0],
    },
    // top right
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 1.0],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= 1.0 / 255.0,
            "expected {expected}, got {actual}",
        );
    }

    #[test]
    fn score_color_unpacks_argb_order() {
        let [r, g, b, a] = ScoreColor(0x80FF_4000).to_rgba();
        assert_close(r, 1.0);
        assert_close(g, 64.0 / 255.0);
        assert_close(b, 0.0);
        assert_close(a, 128.0 / 255.0);
    }

    #[test]
    fn score_color_channels_round_trip() {
        for packed in [0x0000_0000_u32, 0xFFFF_FFFF, 0x1234_5678, 0xFE01_7F80] {
            let rgba = ScoreColor(packed).to_rgba();
            let [a, r, g, b] = packed.to_be_bytes();
            for (channel, byte) in rgba.into_iter().zip([r, g, b, a]) {
                assert_close(channel, f32::from(byte) / 255.0);
            }
        }
    }

    #[test]
    fn quad_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 20);
        assert_eq!(bytemuck::cast_slice::<QuadVertex, f32>(&QUAD).len(), 20);
    }

    #[test]
    fn only_desktop_dialect_needs_a_vertex_array() {
        assert!(GlslDialect::Glsl140.needs_vertex_array());
        assert!(!GlslDialect::Es100.needs_vertex_array());
    }

    #[test]
    fn config_builders() {
        let config = OverlayConfig::new(Layout::BottomLeftUpright)
            .with_logos(true)
            .with_dialect(GlslDialect::Glsl140);
        assert_eq!(config.layout, Layout::BottomLeftUpright);
        assert!(config.logos_enabled);
        assert_eq!(config.dialect, GlslDialect::Glsl140);
        assert!(!OverlayConfig::default().logos_enabled);
    }
}
