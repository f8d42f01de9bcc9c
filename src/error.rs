//! Error type for overlay setup.

/// Errors raised while preparing the overlay.
///
/// Drawing never fails from the caller's point of view; everything here is
/// reported by logo loading or by [`FilterRender::initialize`].
///
/// [`FilterRender::initialize`]: crate::FilterRender::initialize
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// A shader stage failed to compile.
    #[error("{stage} shader compile error: {log}")]
    Compile {
        /// `"vertex"` or `"fragment"`.
        stage: &'static str,
        /// Driver info log.
        log: String,
    },
    /// The program failed to link.
    #[error("program link error: {0}")]
    Link(String),
    /// The linked program has no active attribute by this name.
    #[error("attribute `{0}` missing from overlay program")]
    MissingAttribute(&'static str),
    /// The linked program has no active uniform by this name.
    #[error("uniform `{0}` missing from overlay program")]
    MissingUniform(&'static str),
    /// A GL object could not be created.
    #[error("GL error: {0}")]
    Gl(String),
    /// A logo could not be decoded.
    #[error("failed to decode logo: {0}")]
    Decode(#[from] image::ImageError),
    /// A logo's dimensions or pixel data are unusable.
    #[error("invalid logo: {0}")]
    InvalidLogo(String),
    /// `initialize` was called on a renderer that is already initialized.
    #[error("overlay renderer is already initialized")]
    AlreadyInitialized,
    /// `initialize` was called after `release`.
    #[error("overlay renderer has been released")]
    Released,
    /// Logos were enabled but none were supplied, or vice versa.
    #[error("logo configuration mismatch: {0}")]
    LogoMismatch(&'static str),
}
