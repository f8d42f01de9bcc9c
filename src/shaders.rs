//! GLSL sources for the overlay program and compilation helpers.
//!
//! The sources are written once against a handful of macros (`VS_IN`,
//! `TEX`, `FRAG_COLOR`, ...) and specialized at initialization with a
//! dialect header plus `#define`s carrying the layout and glyph constants.
//! The constants come from [`crate::glyph`] and [`crate::layout`], the same
//! values the CPU reference in [`crate::shading`] uses.

use std::fmt::Write as _;

use crate::glyph;
use crate::layout::LayoutGeometry;
use crate::types::{GlslDialect, OverlayConfig};

/// Vertex shader: transforms the full-screen quad by the MVP matrix and the
/// texture coordinate by the host's texture matrix.
///
/// # Attributes and uniforms
///
/// | Name            | Type   | Description                          |
/// |-----------------|--------|--------------------------------------|
/// | `a_position`    | `vec4` | Quad corner (x, y, z)                |
/// | `a_tex_coord`   | `vec4` | Quad UV (u, v)                       |
/// | `u_mvp`         | `mat4` | Model-view-projection matrix         |
/// | `u_tex_matrix`  | `mat4` | Texture-coordinate transform         |
const VERTEX_BODY: &str = r"
VS_IN vec4 a_position;
VS_IN vec4 a_tex_coord;

uniform mat4 u_mvp;
uniform mat4 u_tex_matrix;

VS_OUT vec2 v_tex_coord;

void main() {
    gl_Position = u_mvp * a_position;
    v_tex_coord = (u_tex_matrix * a_tex_coord).xy;
}
";

/// Fragment shader: frame passthrough, logo compositing, then the board.
///
/// # Uniforms
///
/// | Name                | Type        | Description                        |
/// |---------------------|-------------|------------------------------------|
/// | `u_frame`           | `sampler2D` | Upstream video frame (unit 4)      |
/// | `u_score`           | `int`       | Score in `0..=99`                  |
/// | `u_score_color`     | `vec4`      | Digit color                        |
/// | `u_left_logo`       | `sampler2D` | Left logo (unit 5, logos only)     |
/// | `u_right_logo`      | `sampler2D` | Right logo (unit 6, logos only)    |
/// | `u_left_logo_size`  | `vec2`      | `[aspect, 1.0]` of the left logo   |
/// | `u_right_logo_size` | `vec2`      | `[aspect, 1.0]` of the right logo  |
const FRAGMENT_BODY: &str = r"
FS_IN vec2 v_tex_coord;

uniform sampler2D u_frame;
uniform int u_score;
uniform vec4 u_score_color;

#if LOGOS_ENABLED
uniform sampler2D u_left_logo;
uniform sampler2D u_right_logo;
uniform vec2 u_left_logo_size;
uniform vec2 u_right_logo_size;
#endif

float digitField(vec2 p, int digit) {
    float x = p.x;
    float y = p.y;
    float cell = 1.0 - smoothstep(CELL_RADIUS, CELL_RADIUS + AA_WIDTH, length(p));

    float horiz = 1.0 - smoothstep(0.0, AA_WIDTH, abs(y) - STROKE);
    float vert = 1.0 - smoothstep(0.0, AA_WIDTH, abs(x) - STROKE);

    float top = step(y, STROKE) * horiz;
    float bot = step(-STROKE, y) * horiz;
    float mid = step(-MID_HALF, y) * step(y, MID_HALF) * horiz;
    float left = step(x, 0.0) * vert;
    float right = step(0.0, x) * vert;

    float shape = 0.0;
    if (digit == 0) shape = top + bot + left + right;
    if (digit == 1) shape = right;
    if (digit == 2) shape = top + mid + bot + step(0.0, x) * vert + step(x, 0.0) * step(-STROKE, y) * vert;
    if (digit == 3) shape = top + mid + bot + right;
    if (digit == 4) shape = mid + left * step(y, 0.0) + right;
    if (digit == 5) shape = top + mid + bot + step(x, 0.0) * vert + step(0.0, x) * step(y, -STROKE) * vert;
    if (digit == 6) shape = top + mid + bot + left + step(0.0, x) * step(y, -STROKE) * vert;
    if (digit == 7) shape = top + right;
    if (digit == 8) shape = top + mid + bot + left + right;
    if (digit == 9) shape = top + mid + bot + left * step(y, 0.0) + right;

    return clamp(min(shape, cell), 0.0, 1.0);
}

float roundedBox(vec2 p, vec2 halfSize, float radius) {
    vec2 q = abs(p) - halfSize + radius;
    return min(max(q.x, q.y), 0.0) + length(max(q, 0.0)) - radius;
}

float borderAlpha(float d) {
    return smoothstep(-BORDER_WIDTH - BORDER_SOFTNESS, -BORDER_WIDTH + BORDER_SOFTNESS, d)
        - smoothstep(-BORDER_SOFTNESS, BORDER_SOFTNESS, d);
}

vec2 boardLocal(vec2 adjusted) {
    vec2 local = (adjusted - BOARD_POS) / BOARD_SIZE;
#if LAYOUT_ROTATED
    local = vec2(1.0 - local.y, local.x);
#endif
    return local;
}

#if LOGOS_ENABLED
vec2 rotate(vec2 v, float angle) {
    float c = cos(angle);
    float s = sin(angle);
    return vec2(v.x * c - v.y * s, v.x * s + v.y * c);
}

vec2 logoLocal(vec2 adjusted, vec2 offset, vec2 size) {
    vec2 extent = vec2(LOGO_BASE.x, LOGO_BASE.y * size.y / size.x);
    vec2 c = (adjusted - (BOARD_POS + offset)) / extent;
#if LAYOUT_ROTATED
    c = vec2(0.5 - c.x, 1.0 - c.y);
    c = vec2(1.0 - c.y, c.x);
    c = rotate(c, radians(90.0));
#endif
    return c;
}

bool insideUnit(vec2 c) {
    return c.x >= 0.0 && c.x <= 1.0 && c.y >= 0.0 && c.y <= 1.0;
}
#endif

void main() {
    vec4 color = TEX(u_frame, v_tex_coord);
    // Top-left origin, matching the layout constants.
    vec2 adjusted = vec2(v_tex_coord.x, 1.0 - v_tex_coord.y);

#if LOGOS_ENABLED
    vec2 leftUv = logoLocal(adjusted, LEFT_LOGO_OFFSET, u_left_logo_size);
    if (insideUnit(leftUv)) {
        vec4 logo = TEX(u_left_logo, leftUv);
        color = mix(color, logo, logo.a);
    }
    vec2 rightUv = logoLocal(adjusted, RIGHT_LOGO_OFFSET, u_right_logo_size);
    if (insideUnit(rightUv)) {
        vec4 logo = TEX(u_right_logo, rightUv);
        color = mix(color, logo, logo.a);
    }
#endif

    vec2 local = boardLocal(adjusted);
    float boxDist = roundedBox(local - 0.5, vec2(0.5), BOX_RADIUS);
    if (boxDist < 0.0) {
        vec4 background = mix(BACKGROUND_TOP, BACKGROUND_BOTTOM, local.y);
        int tens = u_score / 10;
        int units = u_score - tens * 10;
        float d1 = digitField((local - TENS_CENTER) * GLYPH_SCALE, tens);
        float d2 = digitField((local - UNITS_CENTER) * GLYPH_SCALE, units);
        vec4 scored = mix(background, u_score_color, max(d1, d2));
        color = mix(scored, BORDER_COLOR, borderAlpha(boxDist));
    }

    FRAG_COLOR = color;
}
";

/// Vertex and fragment source for one [`OverlayConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    /// Complete vertex shader source.
    pub vertex: String,
    /// Complete fragment shader source.
    pub fragment: String,
}

impl ProgramSources {
    /// Specialize the overlay program for `config`.
    #[must_use]
    pub fn for_config(config: OverlayConfig) -> Self {
        let vertex = format!("{}{VERTEX_BODY}", vertex_header(config.dialect));

        let mut fragment = fragment_header(config.dialect).to_owned();
        fragment.push_str(&defines(config));
        fragment.push_str(FRAGMENT_BODY);

        Self { vertex, fragment }
    }
}

fn vertex_header(dialect: GlslDialect) -> &'static str {
    match dialect {
        GlslDialect::Es100 => "#version 100\n#define VS_IN attribute\n#define VS_OUT varying\n",
        GlslDialect::Glsl140 => "#version 140\n#define VS_IN in\n#define VS_OUT out\n",
    }
}

fn fragment_header(dialect: GlslDialect) -> &'static str {
    match dialect {
        GlslDialect::Es100 => {
            "#version 100\nprecision mediump float;\n\
             #define FS_IN varying\n#define TEX texture2D\n#define FRAG_COLOR gl_FragColor\n"
        }
        GlslDialect::Glsl140 => {
            "#version 140\n#define FS_IN in\n#define TEX texture\n\
             out vec4 frag_color;\n#define FRAG_COLOR frag_color\n"
        }
    }
}

/// `#define` block carrying the layout and glyph constants.
fn defines(config: OverlayConfig) -> String {
    let g = LayoutGeometry::for_layout(config.layout);
    let mut out = String::new();

    let mut flag = |name: &str, on: bool| {
        let _ = writeln!(out, "#define {name} {}", u8::from(on));
    };
    flag("LAYOUT_ROTATED", g.rotated);
    flag("LOGOS_ENABLED", config.logos_enabled);

    let vectors: [(&str, &[f32]); 10] = [
        ("BOARD_POS", &g.board_pos),
        ("BOARD_SIZE", &g.board_size),
        ("LEFT_LOGO_OFFSET", &g.left_logo_offset),
        ("RIGHT_LOGO_OFFSET", &g.right_logo_offset),
        ("LOGO_BASE", &g.logo_base),
        ("TENS_CENTER", &glyph::DIGIT_CENTERS[0]),
        ("UNITS_CENTER", &glyph::DIGIT_CENTERS[1]),
        ("BACKGROUND_TOP", &glyph::BACKGROUND_TOP),
        ("BACKGROUND_BOTTOM", &glyph::BACKGROUND_BOTTOM),
        ("BORDER_COLOR", &glyph::BORDER_COLOR),
    ];
    for (name, components) in vectors {
        let _ = writeln!(out, "#define {name} {}", glsl_value(components));
    }

    let scalars = [
        ("STROKE", glyph::STROKE),
        ("MID_HALF", glyph::MID_HALF),
        ("AA_WIDTH", glyph::AA_WIDTH),
        ("CELL_RADIUS", glyph::CELL_RADIUS),
        ("GLYPH_SCALE", glyph::GLYPH_SCALE),
        ("BOX_RADIUS", glyph::BOX_RADIUS),
        ("BORDER_WIDTH", glyph::BORDER_WIDTH),
        ("BORDER_SOFTNESS", glyph::BORDER_SOFTNESS),
    ];
    for (name, value) in scalars {
        let _ = writeln!(out, "#define {name} {}", glsl_value(&[value]));
    }

    out
}

/// Format a float, `vec2`, `vec3` or `vec4` literal. Scalars are
/// parenthesized so negation inside expressions stays correct.
fn glsl_value(components: &[f32]) -> String {
    let parts: Vec<String> = components.iter().map(|c| format!("{c:?}")).collect();
    match components.len() {
        1 => format!("({})", parts[0]),
        n => format!("vec{n}({})", parts.join(", ")),
    }
}

/// Compile a shader program from vertex and fragment source strings.
///
/// The compiled shader objects are detached and deleted after successful
/// linking, so only the program handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`OverlayError::Compile`] or [`OverlayError::Link`] with the
/// driver's info log, or [`OverlayError::Gl`] if an object cannot be
/// created.
///
/// [`OverlayError::Compile`]: crate::OverlayError::Compile
/// [`OverlayError::Link`]: crate::OverlayError::Link
/// [`OverlayError::Gl`]: crate::OverlayError::Gl
#[cfg(feature = "glow")]
pub unsafe fn compile_program(
    gl: &glow::Context,
    sources: &ProgramSources,
) -> Result<glow::Program, crate::OverlayError> {
    use crate::OverlayError;
    use glow::HasContext;

    let vs = unsafe { compile_shader(gl, glow::VERTEX_SHADER, "vertex", &sources.vertex) }?;
    let fs = match unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, "fragment", &sources.fragment) }
    {
        Ok(fs) => fs,
        Err(err) => {
            unsafe { gl.delete_shader(vs) };
            return Err(err);
        }
    };

    unsafe {
        let program = match gl.create_program() {
            Ok(program) => program,
            Err(err) => {
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                return Err(OverlayError::Gl(err));
            }
        };

        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(OverlayError::Link(log));
        }

        // Shaders can be detached and deleted after successful linking.
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        Ok(program)
    }
}

/// Compile a single shader stage (vertex or fragment) from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
#[cfg(feature = "glow")]
unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    stage: &'static str,
    source: &str,
) -> Result<glow::Shader, crate::OverlayError> {
    use crate::OverlayError;
    use glow::HasContext;

    unsafe {
        let shader = gl.create_shader(shader_type).map_err(OverlayError::Gl)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(OverlayError::Compile { stage, log });
        }

        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Layout;

    #[test]
    fn es100_sources_use_es_keywords() {
        let sources = ProgramSources::for_config(OverlayConfig::new(Layout::TopLeftRotated));
        assert!(sources.vertex.starts_with("#version 100\n"));
        assert!(sources.vertex.contains("#define VS_IN attribute"));
        assert!(sources.fragment.starts_with("#version 100\nprecision mediump float;"));
        assert!(sources.fragment.contains("#define TEX texture2D"));
        assert!(sources.fragment.contains("#define FRAG_COLOR gl_FragColor"));
    }

    #[test]
    fn glsl140_sources_declare_output() {
        let config =
            OverlayConfig::new(Layout::BottomLeftUpright).with_dialect(GlslDialect::Glsl140);
        let sources = ProgramSources::for_config(config);
        assert!(sources.vertex.starts_with("#version 140\n"));
        assert!(sources.fragment.contains("out vec4 frag_color;"));
        assert!(sources.fragment.contains("#define TEX texture\n"));
    }

    #[test]
    fn version_directive_comes_first() {
        for dialect in [GlslDialect::Es100, GlslDialect::Glsl140] {
            let config = OverlayConfig::new(Layout::TopLeftRotated)
                .with_logos(true)
                .with_dialect(dialect);
            let sources = ProgramSources::for_config(config);
            assert!(sources.vertex.starts_with("#version"));
            assert!(sources.fragment.starts_with("#version"));
            assert_eq!(sources.fragment.matches("#version").count(), 1);
        }
    }

    #[test]
    fn layout_constants_are_spliced_in() {
        let rotated = ProgramSources::for_config(OverlayConfig::new(Layout::TopLeftRotated));
        assert!(rotated.fragment.contains("#define LAYOUT_ROTATED 1"));
        assert!(rotated.fragment.contains("#define BOARD_POS vec2(0.08, 0.05)"));
        assert!(rotated.fragment.contains("#define BOARD_SIZE vec2(0.25, 0.1)"));
        assert!(rotated.fragment.contains("#define LEFT_LOGO_OFFSET vec2(-0.095, 0.02)"));

        let upright = ProgramSources::for_config(OverlayConfig::new(Layout::BottomLeftUpright));
        assert!(upright.fragment.contains("#define LAYOUT_ROTATED 0"));
        assert!(upright.fragment.contains("#define BOARD_POS vec2(0.1, 0.83)"));
    }

    #[test]
    fn logo_flag_follows_config() {
        let plain = ProgramSources::for_config(OverlayConfig::new(Layout::TopLeftRotated));
        assert!(plain.fragment.contains("#define LOGOS_ENABLED 0"));
        let logos =
            ProgramSources::for_config(OverlayConfig::new(Layout::TopLeftRotated).with_logos(true));
        assert!(logos.fragment.contains("#define LOGOS_ENABLED 1"));
    }

    #[test]
    fn glyph_constants_are_spliced_in() {
        let sources = ProgramSources::for_config(OverlayConfig::default());
        assert!(sources.fragment.contains("#define STROKE (0.15)"));
        assert!(sources.fragment.contains("#define CELL_RADIUS (0.25)"));
        assert!(sources.fragment.contains("#define GLYPH_SCALE (2.0)"));
        assert!(sources.fragment.contains("#define BORDER_SOFTNESS (0.002)"));
        assert!(sources
            .fragment
            .contains("#define BACKGROUND_TOP vec4(0.2, 0.2, 0.2, 0.9)"));
    }

    #[test]
    fn glsl_value_formats() {
        assert_eq!(glsl_value(&[1.0]), "(1.0)");
        assert_eq!(glsl_value(&[-0.5, 2.0]), "vec2(-0.5, 2.0)");
        assert_eq!(glsl_value(&[0.25, 0.5, 0.75, 1.0]), "vec4(0.25, 0.5, 0.75, 1.0)");
    }
}
