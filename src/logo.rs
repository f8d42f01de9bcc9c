//! Team logo images: decoding, aspect size and CPU sampling.

use crate::error::OverlayError;
use crate::types::Rgba;

/// A decoded logo, ready for GL texture upload.
///
/// Rows are stored top row first, so texture V = 0 is the top of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl LogoImage {
    /// Decode a PNG or JPEG file held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Decode`] if the bytes are not a supported
    /// image, or [`OverlayError::InvalidLogo`] if it has no pixels.
    pub fn from_memory(data: &[u8]) -> Result<Self, OverlayError> {
        let img = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(width, height, img.into_raw())
    }

    /// Wrap raw RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidLogo`] if either dimension is zero or
    /// `pixels` is shorter than `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::InvalidLogo(format!(
                "logo has no pixels ({width}x{height})"
            )));
        }
        let needed = u64::from(width) * u64::from(height) * 4;
        if (pixels.len() as u64) < needed {
            return Err(OverlayError::InvalidLogo(format!(
                "expected {needed} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Size vector uploaded to the shader: `[width / height, 1.0]`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)] // image sizes are far below 2^24
    pub fn aspect_size(&self) -> [f32; 2] {
        [self.width as f32 / self.height as f32, 1.0]
    }
}

/// The left and right team logos.
#[derive(Clone, Debug)]
pub struct LogoPair {
    /// Logo drawn in the left slot.
    pub left: LogoImage,
    /// Logo drawn in the right slot.
    pub right: LogoImage,
}

/// Something the CPU reference can sample a logo from.
pub trait LogoSampler {
    /// Size vector, `[aspect, 1.0]`.
    fn size(&self) -> [f32; 2];

    /// Straight-alpha color at `uv`, filtered the way a `LINEAR`,
    /// `CLAMP_TO_EDGE` texture is.
    fn sample(&self, uv: [f32; 2]) -> Rgba;
}

impl LogoSampler for LogoImage {
    fn size(&self) -> [f32; 2] {
        self.aspect_size()
    }

    fn sample(&self, uv: [f32; 2]) -> Rgba {
        let (x0, x1, fx) = linear_taps(uv[0], self.width);
        let (y0, y1, fy) = linear_taps(uv[1], self.height);
        let top = lerp(self.texel(x0, y0), self.texel(x1, y0), fx);
        let bottom = lerp(self.texel(x0, y1), self.texel(x1, y1), fx);
        lerp(top, bottom, fy)
    }
}

impl LogoImage {
    fn texel(&self, x: u32, y: u32) -> Rgba {
        let offset = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = &self.pixels[offset..offset + 4];
        std::array::from_fn(|i| f32::from(px[i]) / 255.0)
    }
}

/// The two texel indices a linear filter reads along one axis for
/// normalized coordinate `t`, and the weight of the second.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn linear_taps(t: f32, size: u32) -> (u32, u32, f32) {
    let last = (size - 1) as f32;
    let pos = t * size as f32 - 0.5;
    let base = pos.floor();
    let i0 = base.clamp(0.0, last) as u32;
    let i1 = (base + 1.0).clamp(0.0, last) as u32;
    (i0, i1, pos - base)
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> LogoImage {
        let pixels = rgba.repeat((width * height) as usize);
        LogoImage::from_rgba(width, height, pixels).unwrap()
    }

    #[test]
    fn aspect_size_is_width_over_height() {
        let logo = solid(64, 32, [0, 0, 0, 255]);
        assert_eq!(logo.aspect_size(), [2.0, 1.0]);
        let tall = solid(30, 120, [0, 0, 0, 255]);
        assert!((tall.aspect_size()[0] - 0.25).abs() < f32::EPSILON);
        assert!((tall.aspect_size()[1] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_empty_logo() {
        assert!(matches!(
            LogoImage::from_rgba(0, 4, Vec::new()),
            Err(OverlayError::InvalidLogo(_))
        ));
    }

    #[test]
    fn rejects_short_pixel_buffer() {
        assert!(matches!(
            LogoImage::from_rgba(2, 2, vec![0; 15]),
            Err(OverlayError::InvalidLogo(_))
        ));
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(matches!(
            LogoImage::from_memory(b"definitely not a png"),
            Err(OverlayError::Decode(_))
        ));
    }

    #[test]
    fn decodes_png() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();

        let logo = LogoImage::from_memory(bytes.get_ref()).unwrap();
        assert_eq!((logo.width(), logo.height()), (3, 2));
        assert!((logo.aspect_size()[0] - 1.5).abs() < f32::EPSILON);
        assert_eq!(&logo.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn sample_reads_top_row_at_v_zero() {
        // 1x2: red on top, blue below.
        let pixels = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let logo = LogoImage::from_rgba(1, 2, pixels).unwrap();
        assert_eq!(logo.sample([0.5, 0.1]), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(logo.sample([0.5, 0.9]), [0.0, 0.0, 1.0, 1.0]);
        // Clamped to the edge.
        assert_eq!(logo.sample([0.5, 1.0]), [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(logo.sample([-3.0, -3.0]), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn sample_filters_linearly_between_texel_centers() {
        // 2x1: black, then white.
        let pixels = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let logo = LogoImage::from_rgba(2, 1, pixels).unwrap();
        assert_eq!(logo.sample([0.25, 0.5]), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(logo.sample([0.75, 0.5]), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(logo.sample([0.5, 0.5]), [0.5, 0.5, 0.5, 1.0]);
        let quarter = logo.sample([0.375, 0.5]);
        assert!((quarter[0] - 0.25).abs() < 1e-6, "{quarter:?}");
    }
}
