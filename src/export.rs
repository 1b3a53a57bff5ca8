//! Encoding finished SVG documents into the requested output format.

use std::path::Path;

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::{DiagramError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| DiagramError::UnsupportedFormat(String::new()))?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(DiagramError::UnsupportedFormat(ext)),
        }
    }

    /// Raster output is laid out in pixels; page output in points.
    pub fn is_raster(self) -> bool {
        matches!(self, OutputFormat::Png)
    }

    pub fn encode(self, svg: &str, png_scale: f32) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Svg => Ok(svg.as_bytes().to_vec()),
            OutputFormat::Png => svg_to_png(svg, png_scale),
            OutputFormat::Pdf => svg_to_pdf(svg),
        }
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(DiagramError::Export(format!("Invalid PNG scale: {}", scale)));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new("fonts");
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let fallbacks = FontFallbacks::pick(
            fontdb
                .faces()
                .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
        );
        if let Some(family) = fallbacks.sans() {
            fontdb.set_sans_serif_family(family);
        }
        if let Some(family) = fallbacks.serif() {
            fontdb.set_serif_family(family);
        }
        if let Some(family) = fallbacks.mono() {
            fontdb.set_monospace_family(family);
        }
    }

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| DiagramError::Export(format!("Failed to parse SVG: {}", e)))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| DiagramError::Export("Failed to create pixmap".to_string()))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| DiagramError::Export(format!("Failed to encode PNG: {}", e)))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new("fonts");
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let fallbacks = FontFallbacks::pick(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = fallbacks.sans() {
        fontdb.set_sans_serif_family(family);
    }
    if let Some(family) = fallbacks.serif() {
        fontdb.set_serif_family(family);
    }
    if let Some(family) = fallbacks.mono() {
        fontdb.set_monospace_family(family);
    }

    let opts = svg2pdf::usvg::Options {
        fontdb: std::sync::Arc::new(fontdb),
        ..Default::default()
    };

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| DiagramError::Export(format!("Failed to parse SVG: {}", e)))?;

    // Text as paths keeps method signatures visible when font embedding fails.
    let options = svg2pdf::ConversionOptions {
        embed_text: false,
        ..Default::default()
    };

    svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| DiagramError::Export(format!("Failed to convert SVG to PDF: {}", e)))
}

/// Generic family names resolved against whatever fonts are installed.
#[derive(Debug, Default, PartialEq)]
struct FontFallbacks {
    first: Option<String>,
    sans: Option<String>,
    serif: Option<String>,
    mono: Option<String>,
}

impl FontFallbacks {
    fn pick<'a>(families: impl Iterator<Item = &'a str>) -> Self {
        let mut picked = FontFallbacks::default();
        for family in families {
            if picked.first.is_none() {
                picked.first = Some(family.to_string());
            }
            let lower = family.to_ascii_lowercase();
            if picked.sans.is_none() && lower.contains("sans") {
                picked.sans = Some(family.to_string());
            }
            if picked.serif.is_none() && lower.contains("serif") {
                picked.serif = Some(family.to_string());
            }
            if picked.mono.is_none() && (lower.contains("mono") || lower.contains("code")) {
                picked.mono = Some(family.to_string());
            }
        }
        picked
    }

    fn sans(&self) -> Option<&str> {
        self.sans.as_deref().or(self.first.as_deref())
    }

    fn serif(&self) -> Option<&str> {
        self.serif.as_deref().or(self.first.as_deref())
    }

    fn mono(&self) -> Option<&str> {
        self.mono.as_deref().or_else(|| self.sans())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/Diagram.PDF")).unwrap(),
            OutputFormat::Pdf
        );
        assert!(OutputFormat::from_path(Path::new("diagram.png")).unwrap().is_raster());
        assert!(matches!(
            OutputFormat::from_path(Path::new("diagram.gif")),
            Err(DiagramError::UnsupportedFormat(ref ext)) if ext == "gif"
        ));
        assert!(OutputFormat::from_path(Path::new("diagram")).is_err());
    }

    #[test]
    fn svg_passes_through() {
        let bytes = OutputFormat::Svg.encode("<svg/>", 1.0).unwrap();
        assert_eq!(bytes, b"<svg/>");
    }

    #[test]
    fn rejects_bad_png_scale() {
        assert!(svg_to_png("<svg/>", 0.0).is_err());
        assert!(svg_to_png("<svg/>", f32::NAN).is_err());
    }

    #[test]
    fn fallbacks_prefer_named_families() {
        let picked = FontFallbacks::pick(["Serif Pro", "Noto Sans", "Fira Code"].into_iter());
        assert_eq!(picked.sans(), Some("Noto Sans"));
        assert_eq!(picked.mono(), Some("Fira Code"));
        assert_eq!(picked.serif(), Some("Serif Pro"));

        let sans_first = FontFallbacks::pick(["Noto Sans", "Noto Serif"].into_iter());
        assert_eq!(sans_first.sans(), Some("Noto Sans"));
        assert_eq!(sans_first.serif(), Some("Noto Serif"));

        let without_serif = FontFallbacks::pick(["DejaVu Sans", "Hack Mono"].into_iter());
        assert_eq!(without_serif.serif(), Some("DejaVu Sans"));

        let only = FontFallbacks::pick(["Serif Pro"].into_iter());
        assert_eq!(only.sans(), Some("Serif Pro"));
        assert_eq!(only.mono(), Some("Serif Pro"));
    }
}
