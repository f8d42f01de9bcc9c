//! Procedural digit glyphs and the rounded board outline.
//!
//! These are CPU versions of the GLSL helpers in [`crate::shaders`]; the
//! constants below are spliced into the generated shader source so both
//! sides draw the same shapes.

/// Half-width of a segment band, in glyph space.
pub const STROKE: f32 = 0.15;
/// Half-height of the middle bar.
pub const MID_HALF: f32 = 0.05;
/// Anti-aliasing band width for segments and the glyph cell.
pub const AA_WIDTH: f32 = 0.05;
/// Radius of the circular cell that confines a glyph.
pub const CELL_RADIUS: f32 = 0.25;
/// Scale from board-local to glyph space.
pub const GLYPH_SCALE: f32 = 2.0;
/// Glyph centers of the tens and units digits, in board-local space.
pub const DIGIT_CENTERS: [[f32; 2]; 2] = [[0.3, 0.5], [0.7, 0.5]];

/// Corner radius of the board outline.
pub const BOX_RADIUS: f32 = 0.1;
/// Width of the border band inside the board edge.
pub const BORDER_WIDTH: f32 = 0.01;
/// Half-width of the anti-aliased edges of the border band.
pub const BORDER_SOFTNESS: f32 = 0.002;

/// Background at the top edge of the board.
pub const BACKGROUND_TOP: [f32; 4] = [0.2, 0.2, 0.2, 0.9];
/// Background at the bottom edge of the board.
pub const BACKGROUND_BOTTOM: [f32; 4] = [0.3, 0.3, 0.3, 0.9];
/// Border color.
pub const BORDER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

/// GLSL `smoothstep`, for ascending edges.
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `step`: `0.0` when `x < edge`, otherwise `1.0`.
#[must_use]
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// GLSL `mix` over RGBA.
#[must_use]
pub fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    std::array::from_fn(|i| a[i] * (1.0 - t) + b[i] * t)
}

/// Split a score into its tens and units digits.
#[must_use]
pub fn split_score(score: u8) -> (u8, u8) {
    (score / 10, score % 10)
}

/// Coverage of `digit` at glyph-space point `p`, in `[0, 1]`.
///
/// `p` is centered on the glyph. The shape is a union of five soft
/// segment fields cut by a circular cell of radius [`CELL_RADIUS`]. Digits
/// outside `0..=9` have no segments.
#[must_use]
pub fn digit_field(p: [f32; 2], digit: u8) -> f32 {
    let [x, y] = p;
    let d = x.hypot(y);
    let cell = 1.0 - smoothstep(CELL_RADIUS, CELL_RADIUS + AA_WIDTH, d);

    let horiz = 1.0 - smoothstep(0.0, AA_WIDTH, y.abs() - STROKE);
    let vert = 1.0 - smoothstep(0.0, AA_WIDTH, x.abs() - STROKE);

    let top = step(y, STROKE) * horiz;
    let bot = step(-STROKE, y) * horiz;
    let mid = step(-MID_HALF, y) * step(y, MID_HALF) * horiz;
    let left = step(x, 0.0) * vert;
    let right = step(0.0, x) * vert;

    let shape = match digit {
        0 => top + bot + left + right,
        1 => right,
        2 => top + mid + bot + step(0.0, x) * vert + step(x, 0.0) * step(-STROKE, y) * vert,
        3 => top + mid + bot + right,
        4 => mid + left * step(y, 0.0) + right,
        5 => top + mid + bot + step(x, 0.0) * vert + step(0.0, x) * step(y, -STROKE) * vert,
        6 => top + mid + bot + left + step(0.0, x) * step(y, -STROKE) * vert,
        7 => top + right,
        8 => top + mid + bot + left + right,
        9 => top + mid + bot + left * step(y, 0.0) + right,
        _ => 0.0,
    };

    shape.min(cell).clamp(0.0, 1.0)
}

/// Glyph-space coordinate of board-local point `local` for digit slot
/// `slot` (0 = tens, 1 = units).
#[must_use]
pub fn glyph_coord(local: [f32; 2], slot: usize) -> [f32; 2] {
    let center = DIGIT_CENTERS[slot];
    [
        (local[0] - center[0]) * GLYPH_SCALE,
        (local[1] - center[1]) * GLYPH_SCALE,
    ]
}

/// Signed distance from `p` to a rounded rectangle with half-extents
/// `half_size` and corner `radius`, centered on the origin. Negative inside.
#[must_use]
pub fn rounded_box(p: [f32; 2], half_size: [f32; 2], radius: f32) -> f32 {
    let qx = p[0].abs() - half_size[0] + radius;
    let qy = p[1].abs() - half_size[1] + radius;
    qx.max(qy).min(0.0) + qx.max(0.0).hypot(qy.max(0.0)) - radius
}

/// Distance from board-local point `local` to the board outline.
#[must_use]
pub fn board_distance(local: [f32; 2]) -> f32 {
    rounded_box([local[0] - 0.5, local[1] - 0.5], [0.5, 0.5], BOX_RADIUS)
}

/// Opacity of the border band at signed distance `dist`.
///
/// The band spans `[-BORDER_WIDTH, 0]` with soft edges; the outer edge is
/// centered on the outline so `border_alpha(0.0) == 0.5`.
#[must_use]
pub fn border_alpha(dist: f32) -> f32 {
    smoothstep(
        -BORDER_WIDTH - BORDER_SOFTNESS,
        -BORDER_WIDTH + BORDER_SOFTNESS,
        dist,
    ) - smoothstep(-BORDER_SOFTNESS, BORDER_SOFTNESS, dist)
}
