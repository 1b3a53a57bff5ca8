//! UML relationship lines: inheritance, aggregation and composition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::{DiagramError, Result};
use crate::geometry::{CoordinateConverter, Position};
use crate::terminator::{TerminatorPoints, TerminatorSizes, compute_arrow, compute_diamond};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RelationshipKind {
    Inheritance,
    Aggregation,
    Composition,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::Inheritance => "inheritance",
            RelationshipKind::Aggregation => "aggregation",
            RelationshipKind::Composition => "composition",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inheritance" => Ok(RelationshipKind::Inheritance),
            "aggregation" => Ok(RelationshipKind::Aggregation),
            "composition" => Ok(RelationshipKind::Composition),
            _ => Err(DiagramError::UnsupportedRelationshipKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for RelationshipKind {
    type Error = DiagramError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A relationship between two grid positions. The terminator is drawn at
/// `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDefinition {
    pub kind: RelationshipKind,
    pub source: Position,
    pub destination: Position,
}

impl LineDefinition {
    pub fn new(kind: RelationshipKind, source: Position, destination: Position) -> Self {
        Self {
            kind,
            source,
            destination,
        }
    }
}

/// Converts line endpoints and issues the terminator and trunk draw calls.
///
/// The renderer is stateless apart from its configuration and can be shared
/// freely; the canvas is only borrowed for the duration of [`LineRenderer::draw`].
#[derive(Debug, Clone, Copy)]
pub struct LineRenderer {
    converter: CoordinateConverter,
    sizes: TerminatorSizes,
}

impl LineRenderer {
    pub fn new(converter: CoordinateConverter, sizes: TerminatorSizes) -> Self {
        Self { converter, sizes }
    }

    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// Surface-space terminator for `line`, without drawing anything.
    pub fn terminator(&self, line: &LineDefinition) -> Result<TerminatorPoints> {
        for end in [line.source, line.destination] {
            if !end.x.is_finite() || !end.y.is_finite() {
                return Err(DiagramError::NonFinitePosition { x: end.x, y: end.y });
            }
        }
        if line.source == line.destination {
            return Err(DiagramError::DegenerateSegment {
                x: line.source.x,
                y: line.source.y,
            });
        }

        let src = self.converter.to_surface(line.source);
        let dest = self.converter.to_surface(line.destination);

        Ok(match line.kind {
            RelationshipKind::Inheritance => compute_arrow(src, dest, self.sizes.arrow_height),
            RelationshipKind::Aggregation | RelationshipKind::Composition => {
                compute_diamond(src, dest, self.sizes.diamond_height)
            }
        })
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, line: &LineDefinition) -> Result<()> {
        let terminator = self.terminator(line)?;
        let filled = match line.kind {
            RelationshipKind::Inheritance | RelationshipKind::Aggregation => false,
            RelationshipKind::Composition => true,
        };

        log::debug!(
            "{} line ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            line.kind,
            line.source.x,
            line.source.y,
            line.destination.x,
            line.destination.y
        );

        canvas.draw_polygon(terminator.points(), filled)?;

        let src = self.converter.to_surface(line.source);
        canvas.draw_segment(src, terminator.attachment_point())
    }
}
