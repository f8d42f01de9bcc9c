//! CPU reference of the overlay fragment program.
//!
//! [`shade`] evaluates, for one fragment, the same steps the generated GLSL
//! runs on the GPU, with logos filtered bilinearly like their `LINEAR`
//! textures. Results match the GPU up to floating-point precision. It is
//! useful for previews and for checking what the overlay covers without a
//! GL context.

use crate::glyph::{
    board_distance, border_alpha, digit_field, glyph_coord, mix, split_score, BACKGROUND_BOTTOM,
    BACKGROUND_TOP, BORDER_COLOR,
};
use crate::layout::{LayoutGeometry, LogoSide};
use crate::logo::LogoSampler;
use crate::state::ScoreHandle;
use crate::types::{Layout, Rgba};

/// Per-frame inputs of the fragment program.
#[derive(Clone, Copy)]
pub struct ShadeInputs<'a> {
    /// Board and logo placement.
    pub geometry: LayoutGeometry,
    /// Score in `0..=99`.
    pub score: u8,
    /// Digit color.
    pub score_color: Rgba,
    /// Left and right logos, if the layout composites them.
    pub logos: Option<[&'a dyn LogoSampler; 2]>,
}

impl<'a> ShadeInputs<'a> {
    /// Inputs for `layout` with the score currently held by `handle`.
    #[must_use]
    pub fn from_handle(layout: Layout, handle: &ScoreHandle) -> Self {
        Self {
            geometry: LayoutGeometry::for_layout(layout),
            score: handle.score(),
            score_color: handle.score_rgba(),
            logos: None,
        }
    }

    /// Composite `left` and `right` logos as well.
    #[must_use]
    pub fn with_logos(mut self, left: &'a dyn LogoSampler, right: &'a dyn LogoSampler) -> Self {
        self.logos = Some([left, right]);
        self
    }
}

/// Output color for the fragment at `tex_coord` whose frame color is
/// `frame`.
#[must_use]
pub fn shade(inputs: &ShadeInputs<'_>, tex_coord: [f32; 2], frame: Rgba) -> Rgba {
    let geometry = &inputs.geometry;
    let mut color = frame;

    if let Some(logos) = inputs.logos {
        for (side, logo) in [LogoSide::Left, LogoSide::Right].into_iter().zip(logos) {
            let uv = geometry.logo_slot(side, logo.size()).to_local(tex_coord);
            if inside_unit(uv) {
                let texel = logo.sample(uv);
                color = mix(color, texel, texel[3]);
            }
        }
    }

    let local = geometry.to_local(tex_coord);
    let dist = board_distance(local);
    if dist < 0.0 {
        let background = mix(BACKGROUND_TOP, BACKGROUND_BOTTOM, local[1]);
        let (tens, units) = split_score(inputs.score);
        let coverage = digit_field(glyph_coord(local, 0), tens)
            .max(digit_field(glyph_coord(local, 1), units));
        let scored = mix(background, inputs.score_color, coverage);
        color = mix(scored, BORDER_COLOR, border_alpha(dist));
    }

    color
}

fn inside_unit([x, y]: [f32; 2]) -> bool {
    (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::glyph::GLYPH_SCALE;
    use crate::logo::LogoImage;
    use crate::types::ScoreColor;

    const FRAME: Rgba = [0.1, 0.4, 0.7, 1.0];
    const RED: u32 = 0xFFFF_0000;

    fn assert_rgba_eq(actual: Rgba, expected: Rgba) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a - e).abs() < 1e-4,
                "expected {expected:?}, got {actual:?}",
            );
        }
    }

    fn inputs<'a>(layout: Layout, score: i32, argb: u32) -> ShadeInputs<'a> {
        let handle = ScoreHandle::new();
        handle.set_score(score);
        handle.set_score_color(argb);
        ShadeInputs::from_handle(layout, &handle)
    }

    /// Frame texture coordinate of glyph-space point `p` in digit `slot`.
    fn glyph_tex_coord(geometry: &LayoutGeometry, slot: usize, p: [f32; 2]) -> [f32; 2] {
        let center = crate::glyph::DIGIT_CENTERS[slot];
        geometry.from_local([
            center[0] + p[0] / GLYPH_SCALE,
            center[1] + p[1] / GLYPH_SCALE,
        ])
    }

    fn background_at(local_y: f32) -> Rgba {
        mix(BACKGROUND_TOP, BACKGROUND_BOTTOM, local_y)
    }

    #[test]
    fn outside_the_board_passes_frame_through() {
        for layout in [Layout::TopLeftRotated, Layout::BottomLeftUpright] {
            let input = inputs(layout, 7, ScoreColor::WHITE.0);
            assert_rgba_eq(shade(&input, [0.9, 0.1], FRAME), FRAME);
            let beside = input.geometry.from_local([1.5, 0.5]);
            assert_rgba_eq(shade(&input, beside, FRAME), FRAME);
        }
    }

    #[test]
    fn seven_in_white() {
        for layout in [Layout::TopLeftRotated, Layout::BottomLeftUpright] {
            let input = inputs(layout, 7, ScoreColor::WHITE.0);
            let g = input.geometry;

            // Away from the strokes: background gradient.
            let plain = shade(&input, g.from_local([0.5, 0.2]), FRAME);
            assert_rgba_eq(plain, background_at(0.2));

            // On the bar of the "7".
            let stroke = shade(&input, glyph_tex_coord(&g, 1, [-0.2, 0.0]), FRAME);
            assert_rgba_eq(stroke, [1.0, 1.0, 1.0, 1.0]);

            // Lower-left of the "7" is empty.
            let gap = shade(&input, glyph_tex_coord(&g, 1, [-0.05, 0.22]), FRAME);
            assert_rgba_eq(gap, background_at(0.5 + 0.22 / GLYPH_SCALE));

            // Border band blends white over the gray.
            let band = shade(&input, g.from_local([0.5, 0.009]), FRAME);
            let bg = background_at(0.009);
            assert!(band[0] > bg[0] + 0.1 && band[0] < 1.0, "{band:?}");
            assert!(band[3] < bg[3], "{band:?}");
        }
    }

    #[test]
    fn forty_two_draws_four_then_two() {
        // Sample points: centre-left bar, right-top, right-bottom, left-top,
        // left-bottom, upper-left quarter.
        let points = [
            [-0.2, 0.0],
            [0.05, 0.22],
            [0.05, -0.22],
            [-0.05, 0.22],
            [-0.05, -0.22],
            [-0.1, 0.1],
        ];
        let four = [true, true, true, false, true, false];
        let two = [true, true, true, true, false, true];

        for layout in [Layout::TopLeftRotated, Layout::BottomLeftUpright] {
            let input = inputs(layout, 42, RED);
            let g = input.geometry;
            for (slot, expected) in [(0, four), (1, two)] {
                for (p, lit) in points.into_iter().zip(expected) {
                    let color = shade(&input, glyph_tex_coord(&g, slot, p), FRAME);
                    if lit {
                        assert_rgba_eq(color, [1.0, 0.0, 0.0, 1.0]);
                    } else {
                        assert!(color[1] > 0.15, "slot {slot} {p:?} lit: {color:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn border_is_half_alpha_on_the_outline() {
        for layout in [Layout::TopLeftRotated, Layout::BottomLeftUpright] {
            let g = LayoutGeometry::for_layout(layout);
            let on_edge = g.from_local([0.5, 0.0]);
            let alpha = border_alpha(board_distance(g.to_local(on_edge)));
            assert!((alpha - 0.5).abs() < 0.01, "{layout:?}: {alpha}");
        }
    }

    #[test]
    fn opaque_logo_replaces_frame_and_transparent_keeps_it() {
        let opaque = LogoImage::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();
        let clear = LogoImage::from_rgba(2, 1, vec![0, 255, 0, 0, 0, 255, 0, 0]).unwrap();

        for layout in [Layout::TopLeftRotated, Layout::BottomLeftUpright] {
            let input = inputs(layout, 0, ScoreColor::WHITE.0).with_logos(&opaque, &clear);
            let g = input.geometry;

            let left = g.logo_slot(LogoSide::Left, opaque.aspect_size());
            let at_left = shade(&input, left.from_local([0.5, 0.5]), FRAME);
            assert_rgba_eq(at_left, [1.0, 0.0, 0.0, 1.0]);

            let right = g.logo_slot(LogoSide::Right, clear.aspect_size());
            let at_right = shade(&input, right.from_local([0.5, 0.5]), FRAME);
            assert_rgba_eq(at_right, FRAME);
        }
    }

    #[test]
    fn half_transparent_logo_blends() {
        let half = LogoImage::from_rgba(1, 1, vec![255, 255, 255, 128]).unwrap();
        let input =
            inputs(Layout::TopLeftRotated, 0, ScoreColor::WHITE.0).with_logos(&half, &half);
        let slot = input.geometry.logo_slot(LogoSide::Left, half.aspect_size());
        let color = shade(&input, slot.from_local([0.25, 0.75]), [0.0, 0.0, 0.0, 1.0]);
        let t = 128.0 / 255.0;
        assert_rgba_eq(color, [t, t, t, (1.0 - t) + t * t]);
    }

    #[test]
    fn logos_ignored_when_absent() {
        let input = inputs(Layout::TopLeftRotated, 0, ScoreColor::WHITE.0);
        let slot = input.geometry.logo_slot(LogoSide::Left, [1.0, 1.0]);
        assert_rgba_eq(shade(&input, slot.from_local([0.5, 0.5]), FRAME), FRAME);
    }
}
