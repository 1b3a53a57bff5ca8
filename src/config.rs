use serde::{Deserialize, Serialize};

use crate::canvas::CanvasStyle;
use crate::error::{DiagramError, Result};
use crate::geometry::{DiagramPadding, Margins};
use crate::terminator::{DEFAULT_ARROW_HEIGHT, DEFAULT_DIAMOND_HEIGHT, TerminatorSizes};

const DPI: f64 = 72.0;
const LEFT_MARGIN: f64 = 8.0;
const TOP_MARGIN: f64 = 8.0;
const HORIZONTAL_GAP: f64 = 60.0;
const VERTICAL_GAP: f64 = 60.0;
const FONT_SIZE: f64 = 10.0;

// US letter, landscape, in points
const PAGE_WIDTH: f64 = 792.0;
const PAGE_HEIGHT: f64 = 612.0;

const IMAGE_WIDTH: f64 = 1280.0;
const IMAGE_HEIGHT: f64 = 1024.0;

const PAGE_BACKGROUND: &str = "#ffffff";
const IMAGE_BACKGROUND: &str = "#ffffe0";
const LINE_COLOR: &str = "#000000";
const TEXT_COLOR: &str = "#000000";
const FONT_FAMILY: &str = "monospace";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default = "default_dpi")]
    pub dpi: f64,
    #[serde(default = "default_left_margin")]
    pub left_margin: f64,
    #[serde(default = "default_top_margin")]
    pub top_margin: f64,
    #[serde(default = "default_horizontal_gap")]
    pub horizontal_gap: f64,
    #[serde(default = "default_vertical_gap")]
    pub vertical_gap: f64,

    #[serde(default = "default_arrow_height")]
    pub arrow_height: f64,
    #[serde(default = "default_diamond_height")]
    pub diamond_height: f64,

    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_font_family")]
    pub font_family: String,

    #[serde(default = "default_page_width")]
    pub page_width: f64,
    #[serde(default = "default_page_height")]
    pub page_height: f64,
    #[serde(default = "default_image_width")]
    pub image_width: f64,
    #[serde(default = "default_image_height")]
    pub image_height: f64,

    #[serde(default = "default_page_background")]
    pub background_color: String,
    #[serde(default = "default_image_background")]
    pub image_background_color: String,
    #[serde(default = "default_line_color")]
    pub line_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,

    /// Raster scale multiplier for PNG output.
    #[serde(default = "default_png_scale")]
    pub png_scale: f32,
}

fn default_dpi() -> f64 {
    DPI
}
fn default_left_margin() -> f64 {
    LEFT_MARGIN
}
fn default_top_margin() -> f64 {
    TOP_MARGIN
}
fn default_horizontal_gap() -> f64 {
    HORIZONTAL_GAP
}
fn default_vertical_gap() -> f64 {
    VERTICAL_GAP
}
fn default_arrow_height() -> f64 {
    DEFAULT_ARROW_HEIGHT
}
fn default_diamond_height() -> f64 {
    DEFAULT_DIAMOND_HEIGHT
}
fn default_font_size() -> f64 {
    FONT_SIZE
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_page_width() -> f64 {
    PAGE_WIDTH
}
fn default_page_height() -> f64 {
    PAGE_HEIGHT
}
fn default_image_width() -> f64 {
    IMAGE_WIDTH
}
fn default_image_height() -> f64 {
    IMAGE_HEIGHT
}
fn default_page_background() -> String {
    PAGE_BACKGROUND.to_string()
}
fn default_image_background() -> String {
    IMAGE_BACKGROUND.to_string()
}
fn default_line_color() -> String {
    LINE_COLOR.to_string()
}
fn default_text_color() -> String {
    TEXT_COLOR.to_string()
}
fn default_png_scale() -> f32 {
    1.0
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            dpi: DPI,
            left_margin: LEFT_MARGIN,
            top_margin: TOP_MARGIN,
            horizontal_gap: HORIZONTAL_GAP,
            vertical_gap: VERTICAL_GAP,
            arrow_height: DEFAULT_ARROW_HEIGHT,
            diamond_height: DEFAULT_DIAMOND_HEIGHT,
            font_size: FONT_SIZE,
            font_family: FONT_FAMILY.to_string(),
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            image_width: IMAGE_WIDTH,
            image_height: IMAGE_HEIGHT,
            background_color: PAGE_BACKGROUND.to_string(),
            image_background_color: IMAGE_BACKGROUND.to_string(),
            line_color: LINE_COLOR.to_string(),
            text_color: TEXT_COLOR.to_string(),
            png_scale: 1.0,
        }
    }
}

impl DiagramConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config = Self::parse_yaml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Pick the parser from a file extension. Without one, YAML is only tried
    /// when the content is not TOML; validation runs once on the parsed result.
    pub fn parse(content: &str, extension: Option<&str>) -> Result<Self> {
        let config = match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => Self::parse_toml(content)?,
            Some("yaml") | Some("yml") => Self::parse_yaml(content)?,
            _ => Self::parse_toml(content).or_else(|_| Self::parse_yaml(content))?,
        };
        config.validate()?;
        Ok(config)
    }

    fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| DiagramError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| DiagramError::InvalidConfig(format!("Failed to parse YAML: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("left_margin", self.left_margin),
            ("top_margin", self.top_margin),
            ("horizontal_gap", self.horizontal_gap),
            ("vertical_gap", self.vertical_gap),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DiagramError::InvalidConfig(format!(
                    "{} must be >= 0, got {}",
                    name, value
                )));
            }
        }

        let positive = [
            ("dpi", self.dpi),
            ("arrow_height", self.arrow_height),
            ("diamond_height", self.diamond_height),
            ("font_size", self.font_size),
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("image_width", self.image_width),
            ("image_height", self.image_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(DiagramError::InvalidConfig(format!(
                    "{} must be > 0, got {}",
                    name, value
                )));
            }
        }

        if !self.png_scale.is_finite() || self.png_scale <= 0.0 {
            return Err(DiagramError::InvalidConfig(format!(
                "png_scale must be > 0, got {}",
                self.png_scale
            )));
        }
        Ok(())
    }

    pub fn margins(&self) -> Margins {
        Margins {
            left: self.left_margin,
            top: self.top_margin,
        }
    }

    pub fn padding(&self) -> DiagramPadding {
        DiagramPadding {
            horizontal_gap: self.horizontal_gap,
            vertical_gap: self.vertical_gap,
        }
    }

    pub fn terminator_sizes(&self) -> TerminatorSizes {
        TerminatorSizes {
            arrow_height: self.arrow_height,
            diamond_height: self.diamond_height,
        }
    }

    pub fn canvas_style(&self, raster: bool) -> CanvasStyle {
        CanvasStyle {
            background: if raster {
                self.image_background_color.clone()
            } else {
                self.background_color.clone()
            },
            line_color: self.line_color.clone(),
            text_color: self.text_color.clone(),
            font_family: self.font_family.clone(),
        }
    }
}
