use thiserror::Error;

/// Errors raised while building or writing a diagram.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("Line definition type not supported: `{0}`")]
    UnsupportedRelationshipKind(String),
    /// Source and destination coincide, so the line has no direction.
    #[error("Relationship line has zero length at ({x}, {y})")]
    DegenerateSegment { x: f64, y: f64 },
    #[error("Relationship line endpoint is not finite: ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },
    #[error("Unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to parse diagram input: {0}")]
    Parse(String),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
