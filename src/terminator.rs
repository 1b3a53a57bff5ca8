//! Arrowhead and diamond vertices for relationship lines.
//!
//! All positions here are surface positions. `dest` is the end of the line that
//! touches the decorated class; the shapes open back toward `src`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use crate::geometry::Position;

/// Below this horizontal extent a segment is treated as vertical.
const VERTICAL_TOLERANCE: f64 = 0.01;

pub const DEFAULT_ARROW_HEIGHT: f64 = 8.0;
pub const DEFAULT_DIAMOND_HEIGHT: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminatorSizes {
    pub arrow_height: f64,
    pub diamond_height: f64,
}

impl Default for TerminatorSizes {
    fn default() -> Self {
        Self {
            arrow_height: DEFAULT_ARROW_HEIGHT,
            diamond_height: DEFAULT_DIAMOND_HEIGHT,
        }
    }
}

/// Closed polygon for a line terminator. Point order matters: it decides where
/// the trunk line attaches.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminatorPoints {
    /// `[right_wing, tip, left_wing]`. Left and right are only visually correct
    /// for arrows pointing up the page.
    Arrow([Position; 3]),
    /// `[wing, near_tip, wing, far_tip]`.
    Diamond([Position; 4]),
}

impl TerminatorPoints {
    pub fn points(&self) -> &[Position] {
        match self {
            TerminatorPoints::Arrow(points) => points,
            TerminatorPoints::Diamond(points) => points,
        }
    }

    /// Where the trunk line ends so it is not painted under the terminator.
    pub fn attachment_point(&self) -> Position {
        match self {
            TerminatorPoints::Arrow([right, _, left]) => right.midpoint(*left),
            TerminatorPoints::Diamond([_, _, _, far_tip]) => *far_tip,
        }
    }
}

/// Angle, in surface orientation, from `dest` back toward `src`.
pub fn segment_angle(src: Position, dest: Position) -> f64 {
    let delta_x = dest.x - src.x;
    let delta_y = dest.y - src.y;

    if delta_x.abs() < VERTICAL_TOLERANCE {
        if delta_y > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 }
    } else {
        // atan only covers two quadrants; rightward segments need the other half turn
        let alpha = (delta_y / delta_x).atan();
        if delta_x > 0.0 { alpha + PI } else { alpha }
    }
}

fn diamond_angle(src: Position, dest: Position) -> f64 {
    let delta_x = dest.x - src.x;
    let delta_y = dest.y - src.y;

    if delta_x == 0.0 {
        if delta_y > 0.0 { 3.0 * FRAC_PI_2 } else { FRAC_PI_2 }
    } else {
        segment_angle(src, dest)
    }
}

pub fn compute_arrow(src: Position, dest: Position, size: f64) -> TerminatorPoints {
    let alpha = segment_angle(src, dest);
    let right = dest.offset_polar(size, alpha + FRAC_PI_6);
    let left = dest.offset_polar(size, alpha - FRAC_PI_6);

    log::debug!("arrow alpha={alpha:.4} tip=({:.2}, {:.2})", dest.x, dest.y);
    TerminatorPoints::Arrow([right, dest, left])
}

pub fn compute_diamond(src: Position, dest: Position, size: f64) -> TerminatorPoints {
    let alpha = diamond_angle(src, dest);
    let first = dest.offset_polar(size, alpha + FRAC_PI_6);
    let second = dest.offset_polar(size, alpha - FRAC_PI_6);
    let far_tip = dest.offset_polar(2.0 * size, alpha);

    log::debug!("diamond alpha={alpha:.4} tip=({:.2}, {:.2})", dest.x, dest.y);
    TerminatorPoints::Diamond([first, dest, second, far_tip])
}
