//! Score and score color, shared between the thread that updates them and
//! the GL thread that draws them.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use crate::types::{Rgba, ScoreColor};

/// Largest score the board can show.
pub const MAX_SCORE: u8 = 99;

/// Clamp an arbitrary score to what two digits can display.
#[must_use]
pub fn clamp_score(score: i32) -> u8 {
    // The clamp guarantees the value fits.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamped = score.clamp(0, i32::from(MAX_SCORE)) as u8;
    if i32::from(clamped) != score {
        log::warn!("score {score} outside 0..={MAX_SCORE}, showing {clamped}");
    }
    clamped
}

#[derive(Debug)]
struct ScoreState {
    score: AtomicU8,
    color: AtomicU32,
}

/// A cloneable handle to the score shown by a renderer.
///
/// Updates are lock-free and take effect on the next draw. Both fields are
/// single atomics, so a draw never observes a half-written color.
#[derive(Debug, Clone)]
pub struct ScoreHandle {
    inner: Arc<ScoreState>,
}

impl Default for ScoreHandle {
    fn default() -> Self {
        Self {
            inner: Arc::new(ScoreState {
                score: AtomicU8::new(0),
                color: AtomicU32::new(ScoreColor::WHITE.0),
            }),
        }
    }
}

impl ScoreHandle {
    /// A handle showing 0 in opaque white.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the score, clamped to `0..=99`.
    pub fn set_score(&self, score: i32) {
        self.inner.score.store(clamp_score(score), Ordering::Relaxed);
    }

    /// Set the score color from a packed `0xAARRGGBB` value.
    pub fn set_score_color(&self, argb: u32) {
        self.inner.color.store(argb, Ordering::Relaxed);
    }

    /// The current score.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.inner.score.load(Ordering::Relaxed)
    }

    /// The current score color.
    #[must_use]
    pub fn score_color(&self) -> ScoreColor {
        ScoreColor(self.inner.color.load(Ordering::Relaxed))
    }

    /// The current score color as RGBA in `[0, 1]`.
    #[must_use]
    pub fn score_rgba(&self) -> Rgba {
        self.score_color().to_rgba()
    }
}
