use clap::Parser;
use std::path::PathBuf;

use umlpage::config::DiagramConfig;
use umlpage::fonts::CosmicTextMeasure;
use umlpage::model::DiagramDocument;
use umlpage::{Diagram, DiagramError, LineDefinition};

/// Render UML class diagrams to SVG, PNG or PDF
#[derive(Parser, Debug)]
#[command(name = "umlpage")]
#[command(version)]
#[command(about = "Render UML class diagrams to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Diagram document in TOML, YAML or JSON (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Diagram configuration file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Raster scale multiplier for PNG output (overrides the config file)
    #[arg(long)]
    png_scale: Option<f32>,

    /// Header text drawn at the top of the page (overrides the document)
    #[arg(long)]
    header: Option<String>,
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(ref config_path) = args.config {
        if config_path.exists() && config_path.is_file() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| format!("Failed to read config file: {}", e))?;

            let extension = config_path.extension().and_then(|e| e.to_str());
            DiagramConfig::parse(&content, extension).map_err(|e| e.to_string())?
        } else {
            return Err(format!("Config file not found: {}", config_path.display()));
        }
    } else {
        DiagramConfig::default()
    };
    if let Some(scale) = args.png_scale {
        config.png_scale = scale;
    }

    let (source, extension) = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        (buffer, None)
    } else {
        let content = std::fs::read_to_string(&args.input)
            .map_err(|e| format!("Failed to read input file: {}", e))?;
        let ext = args
            .input
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);
        (content, ext)
    };

    let document = DiagramDocument::parse(&source, extension.as_deref()).map_err(|e| e.to_string())?;

    let mut diagram = Diagram::new(&args.output, config, Box::new(CosmicTextMeasure::new()))
        .map_err(|e| e.to_string())?;

    if let Some(header) = args.header.as_deref().or(document.header.as_deref()) {
        diagram.draw_header(header).map_err(|e| e.to_string())?;
    }
    for class in &document.classes {
        diagram.draw_class(class).map_err(|e| e.to_string())?;
    }
    for shape in &document.rectangles {
        diagram.draw_rectangle(shape).map_err(|e| e.to_string())?;
    }
    for shape in &document.ellipses {
        diagram.draw_ellipse(shape).map_err(|e| e.to_string())?;
    }

    for record in &document.lines {
        let drawn = LineDefinition::try_from(record).and_then(|line| diagram.draw_line(&line));
        match drawn {
            Ok(()) => {}
            Err(e @ DiagramError::UnsupportedRelationshipKind(_))
            | Err(e @ DiagramError::DegenerateSegment { .. })
            | Err(e @ DiagramError::NonFinitePosition { .. }) => {
                log::warn!("Skipping line: {}", e);
            }
            Err(e) => return Err(e.to_string()),
        }
    }

    let written = diagram.write().map_err(|e| e.to_string())?;
    eprintln!("Diagram saved to: {}", written.display());

    Ok(())
}
