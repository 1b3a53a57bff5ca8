//! Drawing surface used by the diagram and line renderers.

use std::fmt::Write as _;

use crate::error::{DiagramError, Result};
use crate::geometry::{Position, Size};

/// Minimal drawing contract. Coordinates are always surface coordinates.
pub trait Canvas {
    fn draw_segment(&mut self, from: Position, to: Position) -> Result<()>;

    /// Closed polygon through `points` in order.
    fn draw_polygon(&mut self, points: &[Position], filled: bool) -> Result<()>;

    /// `pos` is the top-left corner of the text box.
    fn draw_text(&mut self, pos: Position, text: &str, font_size: f64) -> Result<()>;

    fn draw_ellipse(&mut self, top_left: Position, size: Size) -> Result<()>;
}

/// Colors and font family applied by [`SvgCanvas`].
#[derive(Debug, Clone)]
pub struct CanvasStyle {
    pub background: String,
    pub line_color: String,
    pub text_color: String,
    pub font_family: String,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            line_color: "#000000".to_string(),
            text_color: "#000000".to_string(),
            font_family: "monospace".to_string(),
        }
    }
}

/// In-memory SVG surface. PDF and PNG output are produced from its document.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    style: CanvasStyle,
    content: String,
}

impl SvgCanvas {
    /// Style values end up inside attribute values and are escaped once here.
    pub fn new(width: f64, height: f64, style: CanvasStyle) -> Self {
        let style = CanvasStyle {
            background: escape_text(&style.background),
            line_color: escape_text(&style.line_color),
            text_color: escape_text(&style.text_color),
            font_family: escape_text(&style.font_family),
        };
        Self {
            width,
            height,
            style,
            content: String::new(),
        }
    }

    /// Close the surface and return the complete SVG document.
    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}"><rect width="100%" height="100%" fill="{}" />{}</svg>"#,
            self.style.background,
            self.content,
            w = self.width,
            h = self.height,
        )
    }

    fn push(&mut self, element: std::fmt::Arguments<'_>) -> Result<()> {
        self.content
            .write_fmt(element)
            .map_err(|e| DiagramError::Export(format!("Failed to build SVG: {}", e)))
    }
}

impl Canvas for SvgCanvas {
    fn draw_segment(&mut self, from: Position, to: Position) -> Result<()> {
        let stroke = self.style.line_color.clone();
        self.push(format_args!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1" />"#,
            from.x, from.y, to.x, to.y, stroke
        ))
    }

    fn draw_polygon(&mut self, points: &[Position], filled: bool) -> Result<()> {
        let coords = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let stroke = self.style.line_color.clone();
        let fill = if filled { stroke.as_str() } else { "none" }.to_string();
        self.push(format_args!(
            r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="1" />"#,
            coords, fill, stroke
        ))
    }

    fn draw_text(&mut self, pos: Position, text: &str, font_size: f64) -> Result<()> {
        let color = self.style.text_color.clone();
        let family = self.style.font_family.clone();
        self.push(format_args!(
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" dominant-baseline="hanging">{}</text>"#,
            pos.x,
            pos.y,
            family,
            font_size,
            color,
            escape_text(text)
        ))
    }

    fn draw_ellipse(&mut self, top_left: Position, size: Size) -> Result<()> {
        let stroke = self.style.line_color.clone();
        self.push(format_args!(
            r#"<ellipse cx="{:.2}" cy="{:.2}" rx="{:.2}" ry="{:.2}" fill="none" stroke="{}" stroke-width="1" />"#,
            top_left.x + size.width / 2.0,
            top_left.y + size.height / 2.0,
            size.width / 2.0,
            size.height / 2.0,
            stroke
        ))
    }
}

// XML 1.0 Char production
fn is_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Escape markup characters and drop characters XML cannot carry.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
