//! UML class diagram rendering to SVG, PNG and PDF.
//!
//! Classes and relationship lines are placed on an abstract grid by the caller.
//! [`geometry`] maps the grid onto the output surface, [`terminator`] computes
//! the arrowheads and diamonds, and [`line::LineRenderer`] draws them onto a
//! [`canvas::Canvas`].

pub mod canvas;
pub mod config;
pub mod diagram;
pub mod error;
pub mod export;
pub mod fonts;
pub mod geometry;
pub mod line;
pub mod model;
pub mod terminator;

pub use diagram::Diagram;
pub use error::{DiagramError, Result};
pub use geometry::{Position, Size};
pub use line::{LineDefinition, LineRenderer, RelationshipKind};
