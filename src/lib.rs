//! A scoreboard overlay filter for live video, drawn with OpenGL via [glow].
//!
//! [`ScoreboardRenderer`] composites a two-digit score, and optionally two
//! team logos, over each frame of a camera or streaming pipeline. Everything
//! is drawn by one fragment program over a full-screen quad: the digits are
//! procedural glyphs, not a font, and the board is a signed-distance rounded
//! rectangle.
//!
//! # Features
//!
//! - **Two layout presets**: a top-left board with a quarter-turned local
//!   space for frames in sensor orientation, and an upright bottom-left
//!   board. See [`Layout`].
//! - **Optional logos**: decoded from PNG/JPEG via [image] and uploaded once.
//! - **Thread-safe score updates** through a lock-free [`ScoreHandle`].
//! - **GLSL ES 1.00 or GLSL 1.40** sources, picked per [`GlslDialect`].
//! - **CPU reference**: [`shading::shade`] computes the same pixels as the
//!   GPU program, for previews and tests without a GL context.
//!
//! # Safety
//!
//! Initializing, drawing and releasing a [`ScoreboardRenderer`] require a
//! valid, current OpenGL context, so the [`FilterRender`] methods are
//! `unsafe`.
//!
//! [glow]: https://docs.rs/glow
//! [image]: https://docs.rs/image

mod error;
pub mod glyph;
pub mod layout;
mod logo;
#[cfg(feature = "glow")]
mod render;
pub mod shaders;
pub mod shading;
mod state;
mod types;

pub use error::OverlayError;
pub use logo::{LogoImage, LogoPair, LogoSampler};
#[cfg(feature = "glow")]
pub use render::{FilterRender, ScoreboardRenderer};
pub use state::{clamp_score, ScoreHandle, MAX_SCORE};
pub use types::{GlslDialect, Layout, Mat4, OverlayConfig, QuadVertex, Rgba, ScoreColor, IDENTITY, QUAD};
