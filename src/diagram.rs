//! A diagram session: one output file, one canvas.

use std::path::{Path, PathBuf};

use crate::canvas::{Canvas, SvgCanvas};
use crate::config::DiagramConfig;
use crate::error::Result;
use crate::export::OutputFormat;
use crate::fonts::TextMeasure;
use crate::geometry::{CoordinateConverter, Position, Scale};
use crate::line::{LineDefinition, LineRenderer};
use crate::model::{ClassDefinition, ShapeDefinition};

const X_NUDGE: f64 = 4.0;
const Y_NUDGE: f64 = 8.0;
const METHOD_LINE_SPACING: f64 = 2.0;

/// Owns the canvas for a single output file. The canvas lives until
/// [`Diagram::write`] consumes the session or the session is dropped.
pub struct Diagram {
    path: PathBuf,
    format: OutputFormat,
    config: DiagramConfig,
    canvas: SvgCanvas,
    lines: LineRenderer,
    measure: Box<dyn TextMeasure>,
}

impl Diagram {
    pub fn new(
        path: impl AsRef<Path>,
        config: DiagramConfig,
        measure: Box<dyn TextMeasure>,
    ) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();
        let format = OutputFormat::from_path(&path)?;

        let (scale, width, height) = if format.is_raster() {
            (Scale::Pixels, config.image_width, config.image_height)
        } else {
            (Scale::Dpi(config.dpi), config.page_width, config.page_height)
        };

        let converter = CoordinateConverter::new(scale, config.margins(), config.padding());
        let lines = LineRenderer::new(converter, config.terminator_sizes());
        let canvas = SvgCanvas::new(width, height, config.canvas_style(format.is_raster()));

        log::debug!(
            "new {:?} diagram {} ({}x{})",
            format,
            path.display(),
            width,
            height
        );

        Ok(Self {
            path,
            format,
            config,
            canvas,
            lines,
            measure,
        })
    }

    fn converter(&self) -> CoordinateConverter {
        *self.lines.converter()
    }

    /// Header line at the top-left page margin, outside the grid.
    pub fn draw_header(&mut self, text: &str) -> Result<()> {
        let pos = Position::new(self.config.left_margin, self.config.top_margin);
        self.canvas.draw_text(pos, text, self.config.font_size)
    }

    pub fn draw_class(&mut self, class: &ClassDefinition) -> Result<()> {
        let converter = self.converter();
        let origin = converter.to_surface(class.position);
        let size = converter.scale_size(class.size);
        let font_size = self.config.font_size;

        self.canvas.draw_polygon(&rectangle(origin, size.width, size.height), false)?;

        let (name_width, _) = self.measure.measure_text(&class.name, font_size);
        let name_pos = Position::new(
            origin.x + (size.width / 2.0 - name_width / 2.0),
            origin.y + font_size / 2.0,
        );
        self.canvas.draw_text(name_pos, &class.name, font_size)?;

        let separator_y = origin.y + font_size + Y_NUDGE;
        self.canvas.draw_segment(
            Position::new(origin.x, separator_y),
            Position::new(origin.x + size.width, separator_y),
        )?;

        let x = origin.x + X_NUDGE;
        let mut y = separator_y + Y_NUDGE;
        for method in &class.methods {
            let text = method.signature(class.display_method_parameters);
            self.canvas.draw_text(Position::new(x, y), &text, font_size)?;
            y += font_size + METHOD_LINE_SPACING;
        }

        log::debug!("class {} at ({:.1}, {:.1})", class.name, origin.x, origin.y);
        Ok(())
    }

    pub fn draw_line(&mut self, line: &LineDefinition) -> Result<()> {
        self.lines.draw(&mut self.canvas, line)
    }

    pub fn draw_rectangle(&mut self, shape: &ShapeDefinition) -> Result<()> {
        let converter = self.converter();
        let origin = converter.to_surface(shape.position);
        let size = converter.scale_size(shape.size);
        self.canvas
            .draw_polygon(&rectangle(origin, size.width, size.height), false)
    }

    pub fn draw_ellipse(&mut self, shape: &ShapeDefinition) -> Result<()> {
        let converter = self.converter();
        let origin = converter.to_surface(shape.position);
        self.canvas.draw_ellipse(origin, converter.scale_size(shape.size))
    }

    /// Free text at a grid position.
    pub fn draw_text(&mut self, pos: Position, text: &str) -> Result<()> {
        let pos = self.converter().to_surface(pos);
        self.canvas.draw_text(pos, text, self.config.font_size)
    }

    /// SVG document drawn so far, consuming the session without writing.
    pub fn into_svg(self) -> String {
        self.canvas.finish()
    }

    /// Encode and write the output file. Returns the path written.
    pub fn write(self) -> Result<PathBuf> {
        let Diagram {
            path,
            format,
            config,
            canvas,
            ..
        } = self;

        let bytes = format.encode(&canvas.finish(), config.png_scale)?;
        std::fs::write(&path, bytes)?;
        log::info!("{:?} saved to: {}", format, path.display());
        Ok(path)
    }
}

fn rectangle(origin: Position, width: f64, height: f64) -> [Position; 4] {
    [
        origin,
        Position::new(origin.x + width, origin.y),
        Position::new(origin.x + width, origin.y + height),
        Position::new(origin.x, origin.y + height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::MonospaceMeasure;
    use crate::line::RelationshipKind;
    use crate::model::{MethodDefinition, ParameterDefinition, Visibility};

    fn zero_offset_config() -> DiagramConfig {
        DiagramConfig {
            left_margin: 0.0,
            top_margin: 0.0,
            horizontal_gap: 0.0,
            vertical_gap: 0.0,
            ..DiagramConfig::default()
        }
    }

    fn diagram(name: &str, config: DiagramConfig) -> Diagram {
        Diagram::new(name, config, Box::new(MonospaceMeasure::default())).expect("diagram")
    }

    #[test]
    fn format_picks_surface() {
        let page = diagram("page.pdf", DiagramConfig::default()).into_svg();
        assert!(page.contains(r#"viewBox="0 0 792 612""#));

        let image = diagram("image.png", DiagramConfig::default()).into_svg();
        assert!(image.contains(r#"viewBox="0 0 1280 1024""#));
        assert!(image.contains("#ffffe0"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let result = Diagram::new(
            "diagram.bmp",
            DiagramConfig::default(),
            Box::new(MonospaceMeasure::default()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn class_box_layout() {
        let mut d = diagram("class.svg", zero_offset_config());
        let mut class = ClassDefinition::new("Car", Position::new(10.0, 20.0));
        class.methods.push(MethodDefinition {
            name: "drive".to_string(),
            visibility: Visibility::Public,
            return_type: None,
            parameters: vec![ParameterDefinition {
                name: "speed".to_string(),
                parameter_type: Some("int".to_string()),
                default_value: None,
            }],
        });
        d.draw_class(&class).expect("class");
        let svg = d.into_svg();

        assert!(svg.contains(r#"points="10.00,20.00 160.00,20.00 160.00,120.00 10.00,120.00""#));
        // 150 wide box, "Car" is 18 wide at size 10
        assert!(svg.contains(r#"<text x="76.00" y="25.00""#));
        assert!(svg.contains(r#"<line x1="10.00" y1="38.00" x2="160.00" y2="38.00""#));
        assert!(svg.contains(r#"<text x="14.00" y="46.00""#));
        assert!(svg.contains("+drive(speed: int)"));
    }

    #[test]
    fn hidden_parameters() {
        let mut d = diagram("class.svg", zero_offset_config());
        let mut class = ClassDefinition::new("Cat", Position::default());
        class.display_method_parameters = false;
        class.methods.push(MethodDefinition {
            name: "meow".to_string(),
            visibility: Visibility::Protected,
            return_type: Some("str".to_string()),
            parameters: vec![ParameterDefinition {
                name: "times".to_string(),
                parameter_type: None,
                default_value: None,
            }],
        });
        d.draw_class(&class).expect("class");
        assert!(d.into_svg().contains("#meow(): str"));
    }

    #[test]
    fn unsupported_line_leaves_diagram_usable() {
        let mut d = diagram("lines.svg", zero_offset_config());
        let same = Position::new(5.0, 5.0);
        assert!(
            d.draw_line(&LineDefinition::new(RelationshipKind::Composition, same, same))
                .is_err()
        );
        d.draw_line(&LineDefinition::new(
            RelationshipKind::Composition,
            Position::new(0.0, 0.0),
            Position::new(0.0, 50.0),
        ))
        .expect("valid line");
        let svg = d.into_svg();
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<line").count(), 1);
    }

    #[test]
    fn write_creates_svg_file() {
        let path = std::env::temp_dir().join(format!("umlpage-write-{}.svg", std::process::id()));
        let mut d = diagram(path.to_str().expect("utf-8 temp path"), DiagramConfig::default());
        d.draw_header("Header").expect("header");
        d.draw_ellipse(&ShapeDefinition {
            position: Position::new(0.0, 0.0),
            size: crate::geometry::Size::new(40.0, 20.0),
        })
        .expect("ellipse");
        let written = d.write().expect("write");

        let content = std::fs::read_to_string(&written).expect("read back");
        assert!(content.contains("<ellipse"));
        assert!(content.contains(">Header</text>"));
        std::fs::remove_file(written).ok();
    }

    fn write_sample(extension: &str) -> Vec<u8> {
        let path = std::env::temp_dir().join(format!(
            "umlpage-write-{}.{}",
            std::process::id(),
            extension
        ));
        let mut d = diagram(path.to_str().expect("utf-8 temp path"), DiagramConfig::default());
        d.draw_class(&ClassDefinition::new("Engine", Position::new(0.0, 0.0)))
            .expect("class");
        d.draw_line(&LineDefinition::new(
            RelationshipKind::Inheritance,
            Position::new(75.0, 200.0),
            Position::new(75.0, 100.0),
        ))
        .expect("line");
        let written = d.write().expect("write");

        let bytes = std::fs::read(&written).expect("read back");
        std::fs::remove_file(written).ok();
        bytes
    }

    #[test]
    fn write_creates_png_file() {
        let bytes = write_sample("png");
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn write_creates_pdf_file() {
        let bytes = write_sample("pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
