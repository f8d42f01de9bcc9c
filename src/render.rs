//! The GL filter: owns the overlay program and logo textures, and draws the
//! overlay over the host's current frame.

use glow::{HasContext, PixelUnpackData};
use std::sync::Arc;

use crate::{
    error::OverlayError,
    logo::{LogoImage, LogoPair},
    shaders::{self, ProgramSources},
    state::ScoreHandle,
    types::{GlslDialect, Mat4, OverlayConfig, QuadVertex, IDENTITY, QUAD},
};

/// Texture unit the upstream frame is bound to.
const FRAME_UNIT: u8 = 4;
/// Texture unit of the left logo.
const LEFT_LOGO_UNIT: u8 = 5;
/// Texture unit of the right logo.
const RIGHT_LOGO_UNIT: u8 = 6;

/// GL internal format for RGBA8 textures, pre-cast to the `i32` that
/// `tex_image_2d` expects.
#[expect(clippy::cast_possible_wrap)]
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

/// Byte stride of one [`QuadVertex`].
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const QUAD_STRIDE: i32 = std::mem::size_of::<QuadVertex>() as i32;

/// Byte offset of [`QuadVertex::uv`].
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const QUAD_UV_OFFSET: i32 = std::mem::offset_of!(QuadVertex, uv) as i32;

/// Convert a `u32` to `i32` for GL API calls.
fn gl_size(value: u32) -> Result<i32, OverlayError> {
    i32::try_from(value)
        .map_err(|_| OverlayError::InvalidLogo(format!("dimension {value} exceeds i32::MAX")))
}

/// An image filter in the host's per-frame render chain.
///
/// The host holds filters through this trait and calls the methods on the
/// thread that owns the GL context.
pub trait FilterRender {
    /// Create GL resources.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread. The same context must be
    /// current for every later call.
    ///
    /// # Errors
    ///
    /// Fails if the filter cannot be set up. The filter must not be drawn
    /// after a failed initialization.
    unsafe fn initialize(&mut self, gl: Arc<glow::Context>) -> Result<(), OverlayError>;

    /// Draw the filter over `frame`, into the currently bound framebuffer.
    ///
    /// # Safety
    ///
    /// The context passed to [`initialize`](Self::initialize) must be
    /// current, and `frame` must be a live 2D texture in it.
    unsafe fn draw(&mut self, frame: glow::Texture);

    /// Free GL resources. Safe to call more than once.
    ///
    /// # Safety
    ///
    /// The context passed to [`initialize`](Self::initialize) must be
    /// current.
    unsafe fn release(&mut self);
}

/// Cached attribute and uniform locations of the overlay program.
struct OverlayLocations {
    /// `a_position` — quad corner.
    position: u32,
    /// `a_tex_coord` — quad UV.
    tex_coord: u32,
    /// `u_mvp` — model-view-projection matrix.
    mvp: glow::UniformLocation,
    /// `u_tex_matrix` — texture-coordinate transform.
    tex_matrix: glow::UniformLocation,
    /// `u_frame` — upstream frame sampler.
    frame: glow::UniformLocation,
    /// `u_score` — score in `0..=99`.
    score: glow::UniformLocation,
    /// `u_score_color` — digit color.
    score_color: glow::UniformLocation,
    /// Logo samplers and size vectors, for logo layouts.
    logos: Option<LogoLocations>,
}

struct LogoLocations {
    /// `u_left_logo` / `u_right_logo`.
    samplers: [glow::UniformLocation; 2],
    /// `u_left_logo_size` / `u_right_logo_size`.
    sizes: [glow::UniformLocation; 2],
}

/// An uploaded logo.
struct LogoTexture {
    texture: glow::Texture,
    /// `[aspect, 1.0]`.
    size: [f32; 2],
}

/// The full-screen quad's vertex buffer, plus a vertex array on contexts
/// that need one.
struct QuadGeometry {
    vbo: glow::Buffer,
    vao: Option<glow::VertexArray>,
}

impl QuadGeometry {
    unsafe fn delete(&self, gl: &glow::Context) {
        unsafe {
            if let Some(vao) = self.vao {
                gl.delete_vertex_array(vao);
            }
            gl.delete_buffer(self.vbo);
        }
    }
}

/// GL objects alive between initialize and release.
struct GlResources {
    gl: Arc<glow::Context>,
    program: glow::Program,
    quad: QuadGeometry,
    locations: OverlayLocations,
    logos: Option<[LogoTexture; 2]>,
}

enum Lifecycle {
    Uninitialized,
    Initialized(GlResources),
    Released,
}

/// Draws a two-digit scoreboard, and optionally two team logos, over each
/// video frame.
///
/// The renderer follows the host's filter lifecycle: construct it anywhere,
/// then [`initialize`](FilterRender::initialize), [`draw`](FilterRender::draw)
/// once per frame and [`release`](FilterRender::release) on the GL thread.
/// Score and color can be changed from any thread through a
/// [`ScoreHandle`].
///
/// # Example
///
/// ```no_run
/// # use scoreboard_overlay::{FilterRender, Layout, OverlayConfig, ScoreboardRenderer};
/// # use std::sync::Arc;
/// # fn example(gl: Arc<glow::Context>, frame: glow::Texture) -> Result<(), scoreboard_overlay::OverlayError> {
/// let mut overlay = ScoreboardRenderer::new(OverlayConfig::new(Layout::BottomLeftUpright));
/// let score = overlay.score_handle();
///
/// // On the GL thread:
/// unsafe { overlay.initialize(gl)? };
///
/// // From the UI:
/// score.set_score(3);
/// score.set_score_color(0xFFFF_D700);
///
/// // Each frame:
/// unsafe { overlay.draw(frame) };
///
/// // Teardown:
/// unsafe { overlay.release() };
/// # Ok(())
/// # }
/// ```
pub struct ScoreboardRenderer {
    config: OverlayConfig,
    score: ScoreHandle,
    mvp: Mat4,
    tex_matrix: Mat4,
    /// Logos waiting for upload; taken by `initialize`.
    pending_logos: Option<LogoPair>,
    lifecycle: Lifecycle,
    /// Whether a draw outside the initialized state was already logged.
    warned_idle_draw: bool,
}

impl ScoreboardRenderer {
    /// A renderer without logos.
    ///
    /// If `config.logos_enabled` is set, [`initialize`](FilterRender::initialize)
    /// fails with [`OverlayError::LogoMismatch`]; use
    /// [`with_logos`](Self::with_logos) instead.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            score: ScoreHandle::new(),
            mvp: IDENTITY,
            tex_matrix: IDENTITY,
            pending_logos: None,
            lifecycle: Lifecycle::Uninitialized,
            warned_idle_draw: false,
        }
    }

    /// A renderer compositing `logos` beside the board. Enables the logo
    /// slots regardless of `config.logos_enabled`.
    #[must_use]
    pub fn with_logos(config: OverlayConfig, logos: LogoPair) -> Self {
        let mut renderer = Self::new(config.with_logos(true));
        renderer.pending_logos = Some(logos);
        renderer
    }

    /// The configuration this renderer was built with.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// A handle for updating the score from other threads.
    #[must_use]
    pub fn score_handle(&self) -> ScoreHandle {
        self.score.clone()
    }

    /// Set the score shown on the next draw, clamped to `0..=99`.
    pub fn set_score(&self, score: i32) {
        self.score.set_score(score);
    }

    /// Set the digit color from a packed `0xAARRGGBB` value.
    pub fn set_score_color(&self, argb: u32) {
        self.score.set_score_color(argb);
    }

    /// Set the model-view-projection matrix (column-major).
    pub fn set_mvp_matrix(&mut self, mvp: Mat4) {
        self.mvp = mvp;
    }

    /// Set the texture-coordinate matrix (column-major).
    pub fn set_texture_matrix(&mut self, matrix: Mat4) {
        self.tex_matrix = matrix;
    }

    /// Whether GL resources are currently held.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Initialized(_))
    }

    /// Resolve every attribute and uniform the program needs.
    unsafe fn locate(
        gl: &glow::Context,
        program: glow::Program,
        logos_enabled: bool,
    ) -> Result<OverlayLocations, OverlayError> {
        let attrib = |name: &'static str| {
            unsafe { gl.get_attrib_location(program, name) }
                .ok_or(OverlayError::MissingAttribute(name))
        };
        let uniform = |name: &'static str| {
            unsafe { gl.get_uniform_location(program, name) }
                .ok_or(OverlayError::MissingUniform(name))
        };

        let logos = if logos_enabled {
            Some(LogoLocations {
                samplers: [uniform("u_left_logo")?, uniform("u_right_logo")?],
                sizes: [uniform("u_left_logo_size")?, uniform("u_right_logo_size")?],
            })
        } else {
            None
        };

        Ok(OverlayLocations {
            position: attrib("a_position")?,
            tex_coord: attrib("a_tex_coord")?,
            mvp: uniform("u_mvp")?,
            tex_matrix: uniform("u_tex_matrix")?,
            frame: uniform("u_frame")?,
            score: uniform("u_score")?,
            score_color: uniform("u_score_color")?,
            logos,
        })
    }

    /// Check that the renderer can be initialized now.
    fn ensure_ready(&self) -> Result<(), OverlayError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Initialized(_) => return Err(OverlayError::AlreadyInitialized),
            Lifecycle::Released => return Err(OverlayError::Released),
        }
        if self.config.logos_enabled && self.pending_logos.is_none() {
            return Err(OverlayError::LogoMismatch(
                "logos are enabled but no logo images were supplied",
            ));
        }
        Ok(())
    }

    /// Upload the static full-screen quad, and create the vertex array core
    /// profiles require.
    unsafe fn upload_quad(
        gl: &glow::Context,
        dialect: GlslDialect,
    ) -> Result<QuadGeometry, OverlayError> {
        unsafe {
            let vbo = gl.create_buffer().map_err(OverlayError::Gl)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&QUAD),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            let vao = if dialect.needs_vertex_array() {
                match gl.create_vertex_array() {
                    Ok(vao) => Some(vao),
                    Err(err) => {
                        gl.delete_buffer(vbo);
                        return Err(OverlayError::Gl(err));
                    }
                }
            } else {
                None
            };

            Ok(QuadGeometry { vbo, vao })
        }
    }

    /// Upload a logo as a mipmapped, edge-clamped texture.
    unsafe fn upload_logo(
        gl: &glow::Context,
        logo: &LogoImage,
    ) -> Result<LogoTexture, OverlayError> {
        let width = gl_size(logo.width())?;
        let height = gl_size(logo.height())?;
        let texture = unsafe { gl.create_texture() }.map_err(OverlayError::Gl)?;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            Self::set_logo_tex_params(gl);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                RGBA8_INTERNAL_FORMAT,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(logo.pixels())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        log::debug!("uploaded {}x{} logo texture", logo.width(), logo.height());

        Ok(LogoTexture {
            texture,
            size: logo.aspect_size(),
        })
    }

    /// Linear filtering, clamped to the edge.
    unsafe fn set_logo_tex_params(gl: &glow::Context) {
        // GL constant values are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        unsafe {
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
        }
    }

    /// Everything after the program exists. On error the caller deletes the
    /// program; objects created here are deleted before returning.
    unsafe fn build_resources(
        gl: &Arc<glow::Context>,
        program: glow::Program,
        dialect: GlslDialect,
        logos: Option<&LogoPair>,
    ) -> Result<GlResources, OverlayError> {
        let locations = unsafe { Self::locate(gl, program, logos.is_some()) }?;
        let quad = unsafe { Self::upload_quad(gl, dialect) }?;

        let logos = match logos {
            None => None,
            Some(pair) => {
                let left = match unsafe { Self::upload_logo(gl, &pair.left) } {
                    Ok(left) => left,
                    Err(err) => {
                        unsafe { quad.delete(gl) };
                        return Err(err);
                    }
                };
                let right = match unsafe { Self::upload_logo(gl, &pair.right) } {
                    Ok(right) => right,
                    Err(err) => {
                        unsafe {
                            gl.delete_texture(left.texture);
                            quad.delete(gl);
                        }
                        return Err(err);
                    }
                };
                Some([left, right])
            }
        };

        Ok(GlResources {
            gl: Arc::clone(gl),
            program,
            quad,
            locations,
            logos,
        })
    }
}

impl FilterRender for ScoreboardRenderer {
    unsafe fn initialize(&mut self, gl: Arc<glow::Context>) -> Result<(), OverlayError> {
        self.ensure_ready()?;

        let sources = ProgramSources::for_config(self.config);
        let program = unsafe { shaders::compile_program(&gl, &sources) }.inspect_err(|err| {
            log::error!("scoreboard overlay program failed to build: {err}");
        })?;

        let logos = self.pending_logos.as_ref();
        let resources = match unsafe {
            Self::build_resources(&gl, program, self.config.dialect, logos)
        } {
            Ok(resources) => resources,
            Err(err) => {
                unsafe { gl.delete_program(program) };
                log::error!("scoreboard overlay setup failed: {err}");
                return Err(err);
            }
        };

        log::debug!(
            "scoreboard overlay initialized ({:?}, {:?}, logos: {})",
            self.config.layout,
            self.config.dialect,
            self.config.logos_enabled,
        );
        // The images are only needed until upload; a failed setup keeps
        // them for another attempt.
        self.pending_logos = None;
        self.lifecycle = Lifecycle::Initialized(resources);
        self.warned_idle_draw = false;
        Ok(())
    }

    unsafe fn draw(&mut self, frame: glow::Texture) {
        let Lifecycle::Initialized(res) = &self.lifecycle else {
            if !self.warned_idle_draw {
                log::warn!("scoreboard overlay drawn while not initialized; skipping");
                self.warned_idle_draw = true;
            }
            return;
        };

        let gl = &res.gl;
        let loc = &res.locations;
        let score = self.score.score();
        let [r, g, b, a] = self.score.score_rgba();

        unsafe {
            gl.use_program(Some(res.program));

            if let Some(vao) = res.quad.vao {
                gl.bind_vertex_array(Some(vao));
            }
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(res.quad.vbo));
            gl.vertex_attrib_pointer_f32(loc.position, 3, glow::FLOAT, false, QUAD_STRIDE, 0);
            gl.enable_vertex_attrib_array(loc.position);
            gl.vertex_attrib_pointer_f32(
                loc.tex_coord,
                2,
                glow::FLOAT,
                false,
                QUAD_STRIDE,
                QUAD_UV_OFFSET,
            );
            gl.enable_vertex_attrib_array(loc.tex_coord);

            gl.uniform_matrix_4_f32_slice(Some(&loc.mvp), false, &self.mvp);
            gl.uniform_matrix_4_f32_slice(Some(&loc.tex_matrix), false, &self.tex_matrix);

            gl.uniform_1_i32(Some(&loc.frame), i32::from(FRAME_UNIT));
            gl.active_texture(glow::TEXTURE0 + u32::from(FRAME_UNIT));
            gl.bind_texture(glow::TEXTURE_2D, Some(frame));

            if let (Some(logo_loc), Some(logos)) = (&loc.logos, &res.logos) {
                for ((unit, sampler), (size_loc, logo)) in [LEFT_LOGO_UNIT, RIGHT_LOGO_UNIT]
                    .into_iter()
                    .zip(&logo_loc.samplers)
                    .zip(logo_loc.sizes.iter().zip(logos))
                {
                    gl.uniform_1_i32(Some(sampler), i32::from(unit));
                    gl.active_texture(glow::TEXTURE0 + u32::from(unit));
                    gl.bind_texture(glow::TEXTURE_2D, Some(logo.texture));
                    gl.uniform_2_f32(Some(size_loc), logo.size[0], logo.size[1]);
                }
            }

            gl.uniform_1_i32(Some(&loc.score), i32::from(score));
            gl.uniform_4_f32(Some(&loc.score_color), r, g, b, a);

            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);

            gl.disable_vertex_attrib_array(loc.position);
            gl.disable_vertex_attrib_array(loc.tex_coord);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            if res.quad.vao.is_some() {
                gl.bind_vertex_array(None);
            }
            gl.active_texture(glow::TEXTURE0);
        }
    }

    unsafe fn release(&mut self) {
        // Unuploaded logo images go with the renderer's state.
        self.pending_logos = None;

        match std::mem::replace(&mut self.lifecycle, Lifecycle::Released) {
            Lifecycle::Initialized(res) => {
                let gl = &res.gl;
                unsafe {
                    gl.delete_program(res.program);
                    res.quad.delete(gl);
                    if let Some(logos) = &res.logos {
                        for logo in logos {
                            gl.delete_texture(logo.texture);
                        }
                    }
                }
                log::debug!("scoreboard overlay released");
            }
            Lifecycle::Uninitialized => {
                log::debug!("scoreboard overlay released before initialization");
            }
            Lifecycle::Released => {}
        }
    }
}
