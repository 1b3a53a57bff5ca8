//! Grid and surface coordinates.
//!
//! Callers place classes and lines on an abstract diagram grid. Everything the
//! canvas sees is in surface units: PDF points for page output, pixels for image
//! output. [`CoordinateConverter`] is the only way to cross between the two.

use serde::{Deserialize, Serialize};

/// Resolution that maps one grid unit to one surface unit.
pub const REFERENCE_DPI: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Point `length` units away along `angle` (radians, surface orientation).
    pub fn offset_polar(self, length: f64, angle: f64) -> Position {
        Position::new(self.x + length * angle.cos(), self.y + length * angle.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the whole page or image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
}

/// Space reserved around every placed element, distinct from the page margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiagramPadding {
    pub horizontal_gap: f64,
    pub vertical_gap: f64,
}

/// How grid units turn into surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Vector page output; grid units are scaled by `dpi / 72`.
    Dpi(f64),
    /// Raster output; one grid unit is one pixel.
    Pixels,
}

impl Scale {
    pub fn factor(self) -> f64 {
        match self {
            Scale::Dpi(dpi) => dpi / REFERENCE_DPI,
            Scale::Pixels => 1.0,
        }
    }
}

/// Map a grid position onto the output surface.
pub fn to_surface(pos: Position, dpi: f64, margins: Margins, padding: DiagramPadding) -> Position {
    let factor = dpi / REFERENCE_DPI;
    Position::new(
        pos.x * factor + margins.left + padding.horizontal_gap,
        pos.y * factor + margins.top + padding.vertical_gap,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    pub scale: Scale,
    pub margins: Margins,
    pub padding: DiagramPadding,
}

impl CoordinateConverter {
    pub fn new(scale: Scale, margins: Margins, padding: DiagramPadding) -> Self {
        Self {
            scale,
            margins,
            padding,
        }
    }

    pub fn to_surface(&self, pos: Position) -> Position {
        to_surface(
            pos,
            self.scale.factor() * REFERENCE_DPI,
            self.margins,
            self.padding,
        )
    }

    /// Sizes scale with the grid but never pick up margins or gaps.
    pub fn scale_size(&self, size: Size) -> Size {
        let factor = self.scale.factor();
        Size::new(size.width * factor, size.height * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reference_dpi_is_identity_scale() {
        let margins = Margins { left: 8.0, top: 8.0 };
        let padding = DiagramPadding {
            horizontal_gap: 60.0,
            vertical_gap: 40.0,
        };
        let pos = to_surface(Position::new(100.0, 50.0), 72.0, margins, padding);
        assert!(close(pos.x, 168.0));
        assert!(close(pos.y, 98.0));
    }

    #[test]
    fn dpi_scales_before_offsets() {
        let margins = Margins { left: 10.0, top: 20.0 };
        let padding = DiagramPadding::default();
        let pos = to_surface(Position::new(72.0, 36.0), 144.0, margins, padding);
        assert!(close(pos.x, 154.0));
        assert!(close(pos.y, 92.0));
    }

    #[test]
    fn pixel_scale_matches_reference_dpi() {
        let margins = Margins { left: 3.0, top: 4.0 };
        let padding = DiagramPadding {
            horizontal_gap: 5.0,
            vertical_gap: 6.0,
        };
        let pixels = CoordinateConverter::new(Scale::Pixels, margins, padding);
        let page = CoordinateConverter::new(Scale::Dpi(REFERENCE_DPI), margins, padding);
        let pos = Position::new(12.5, 99.0);
        assert_eq!(pixels.to_surface(pos), page.to_surface(pos));
    }

    #[test]
    fn sizes_ignore_margins_and_gaps() {
        let converter = CoordinateConverter::new(
            Scale::Dpi(144.0),
            Margins { left: 8.0, top: 8.0 },
            DiagramPadding {
                horizontal_gap: 60.0,
                vertical_gap: 60.0,
            },
        );
        assert_eq!(
            converter.scale_size(Size::new(150.0, 100.0)),
            Size::new(300.0, 200.0)
        );
    }

    #[test]
    fn polar_offset_and_midpoint() {
        let origin = Position::new(1.0, 1.0);
        let east = origin.offset_polar(2.0, 0.0);
        assert!(close(east.x, 3.0) && close(east.y, 1.0));
        assert!(close(origin.distance_to(east), 2.0));
        assert_eq!(origin.midpoint(east), Position::new(2.0, 1.0));
    }
}
