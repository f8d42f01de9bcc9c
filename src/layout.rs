//! Fixed placements of the scoreboard and its logo slots.
//!
//! All positions are in normalized frame coordinates with a top-left origin
//! (the texture coordinate with its V axis flipped). The same numbers feed
//! the generated GLSL and the CPU reference in [`crate::shading`].

use crate::types::Layout;

/// Which of the two logo slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoSide {
    /// The slot before the board.
    Left,
    /// The slot after the board.
    Right,
}

/// Resolved geometry for one [`Layout`] preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    /// Top-left corner of the board.
    pub board_pos: [f32; 2],
    /// Board width and height.
    pub board_size: [f32; 2],
    /// Whether the board's local space is turned 90° relative to the frame.
    pub rotated: bool,
    /// Left logo slot origin, relative to `board_pos`.
    pub left_logo_offset: [f32; 2],
    /// Right logo slot origin, relative to `board_pos`.
    pub right_logo_offset: [f32; 2],
    /// Slot extent for a square logo. The height is divided by the logo's
    /// aspect ratio.
    pub logo_base: [f32; 2],
}

impl LayoutGeometry {
    /// Geometry of a layout preset.
    #[must_use]
    pub const fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::TopLeftRotated => Self {
                board_pos: [0.08, 0.05],
                board_size: [0.25, 0.1],
                rotated: true,
                left_logo_offset: [-0.095, 0.02],
                right_logo_offset: [0.23, 0.02],
                logo_base: [0.06, 0.07],
            },
            Layout::BottomLeftUpright => Self {
                board_pos: [0.1, 0.83],
                board_size: [0.2, 0.12],
                rotated: false,
                left_logo_offset: [-0.07, 0.02],
                right_logo_offset: [0.21, 0.02],
                logo_base: [0.06, 0.07],
            },
        }
    }

    /// Map a texture coordinate (bottom-left origin) into the board's unit
    /// box. The board covers `[0, 1]²` of the result.
    #[must_use]
    pub fn to_local(&self, tex_coord: [f32; 2]) -> [f32; 2] {
        let adjusted = flip_y(tex_coord);
        let lx = (adjusted[0] - self.board_pos[0]) / self.board_size[0];
        let ly = (adjusted[1] - self.board_pos[1]) / self.board_size[1];
        if self.rotated {
            [1.0 - ly, lx]
        } else {
            [lx, ly]
        }
    }

    /// Inverse of [`to_local`](Self::to_local).
    #[must_use]
    pub fn from_local(&self, local: [f32; 2]) -> [f32; 2] {
        let [lx, ly] = if self.rotated {
            [local[1], 1.0 - local[0]]
        } else {
            local
        };
        flip_y([
            self.board_pos[0] + lx * self.board_size[0],
            self.board_pos[1] + ly * self.board_size[1],
        ])
    }

    /// The slot a logo with size vector `logo_size` (`[aspect, 1.0]`)
    /// occupies on `side`.
    #[must_use]
    pub fn logo_slot(&self, side: LogoSide, logo_size: [f32; 2]) -> LogoSlot {
        let offset = match side {
            LogoSide::Left => self.left_logo_offset,
            LogoSide::Right => self.right_logo_offset,
        };
        LogoSlot {
            origin: [
                self.board_pos[0] + offset[0],
                self.board_pos[1] + offset[1],
            ],
            extent: [
                self.logo_base[0],
                self.logo_base[1] * logo_size[1] / logo_size[0],
            ],
            rotated: self.rotated,
        }
    }
}

/// A logo's placement on the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoSlot {
    /// Top-left corner of the slot's frame rectangle.
    pub origin: [f32; 2],
    /// Width and height of the slot's frame rectangle.
    pub extent: [f32; 2],
    /// Whether [`orient_logo`] applies.
    pub rotated: bool,
}

impl LogoSlot {
    /// Map a texture coordinate into logo UV space. The logo is visible
    /// where the result lies in `[0, 1]²`.
    #[must_use]
    pub fn to_local(&self, tex_coord: [f32; 2]) -> [f32; 2] {
        let adjusted = flip_y(tex_coord);
        let c = [
            (adjusted[0] - self.origin[0]) / self.extent[0],
            (adjusted[1] - self.origin[1]) / self.extent[1],
        ];
        if self.rotated {
            orient_logo(c)
        } else {
            c
        }
    }

    /// Inverse of [`to_local`](Self::to_local).
    #[must_use]
    pub fn from_local(&self, local: [f32; 2]) -> [f32; 2] {
        // orient_logo reduces to a shift of half a slot along x.
        let c = if self.rotated {
            [local[0] + 0.5, local[1]]
        } else {
            local
        };
        flip_y([
            self.origin[0] + c[0] * self.extent[0],
            self.origin[1] + c[1] * self.extent[1],
        ])
    }
}

/// Re-orient a rotated-layout logo coordinate to match the board: mirror
/// about the slot, swap into the board's quarter-turned frame, then rotate
/// by 90°.
#[must_use]
pub fn orient_logo(c: [f32; 2]) -> [f32; 2] {
    let mirrored = [0.5 - c[0], 1.0 - c[1]];
    let swapped = [1.0 - mirrored[1], mirrored[0]];
    rotate(swapped, std::f32::consts::FRAC_PI_2)
}

fn rotate(v: [f32; 2], angle: f32) -> [f32; 2] {
    let (sin, cos) = angle.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}

/// Convert between bottom-left and top-left origins.
#[must_use]
pub fn flip_y([x, y]: [f32; 2]) -> [f32; 2] {
    [x, 1.0 - y]
}
