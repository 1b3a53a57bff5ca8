//! Diagram input documents.

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, Result};
use crate::geometry::{Position, Size};
use crate::line::LineDefinition;

pub const DEFAULT_CELL_WIDTH: f64 = 150.0;
pub const DEFAULT_CELL_HEIGHT: f64 = 100.0;

fn default_cell_size() -> Size {
    Size::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    pub fn symbol(self) -> &'static str {
        match self {
            Visibility::Public => "+",
            Visibility::Private => "-",
            Visibility::Protected => "#",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl ParameterDefinition {
    fn signature(&self) -> String {
        let mut text = self.name.clone();
        if let Some(ty) = &self.parameter_type {
            text.push_str(": ");
            text.push_str(ty);
        }
        if let Some(value) = &self.default_value {
            text.push_str(" = ");
            text.push_str(value);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

impl MethodDefinition {
    /// `+name(a: int = 0): str`, or `+name(): str` when parameters are hidden.
    pub fn signature(&self, with_parameters: bool) -> String {
        let params = if with_parameters {
            self.parameters
                .iter()
                .map(ParameterDefinition::signature)
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            String::new()
        };

        match &self.return_type {
            Some(ret) => format!("{}{}({}): {}", self.visibility.symbol(), self.name, params, ret),
            None => format!("{}{}({})", self.visibility.symbol(), self.name, params),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default = "default_cell_size")]
    pub size: Size,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
    #[serde(default = "default_true")]
    pub display_method_parameters: bool,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            size: default_cell_size(),
            methods: Vec::new(),
            display_method_parameters: true,
        }
    }
}

/// General purpose shape placed in grid space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDefinition {
    pub position: Position,
    pub size: Size,
}

/// A relationship line as written in an input document. The kind is kept
/// as text so one unsupported line does not reject the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub kind: String,
    pub source: Position,
    pub destination: Position,
}

impl TryFrom<&LineRecord> for LineDefinition {
    type Error = DiagramError;

    fn try_from(record: &LineRecord) -> Result<Self> {
        Ok(LineDefinition::new(
            record.kind.parse()?,
            record.source,
            record.destination,
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramDocument {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub rectangles: Vec<ShapeDefinition>,
    #[serde(default)]
    pub ellipses: Vec<ShapeDefinition>,
}

impl DiagramDocument {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DiagramError::Parse(format!("TOML: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| DiagramError::Parse(format!("YAML: {}", e)))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| DiagramError::Parse(format!("JSON: {}", e)))
    }

    /// Pick the parser from a file extension, or try each format in turn.
    pub fn parse(content: &str, extension: Option<&str>) -> Result<Self> {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("toml") => Self::from_toml(content),
            Some("yaml") | Some("yml") => Self::from_yaml(content),
            Some("json") => Self::from_json(content),
            _ => Self::from_toml(content)
                .or_else(|_| Self::from_yaml(content))
                .or_else(|_| Self::from_json(content)),
        }
    }
}
