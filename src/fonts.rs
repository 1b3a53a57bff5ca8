use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u64,
}

/// Width and height of a single line of class-box text, in surface units.
pub trait TextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f64) -> (f64, f64);
}

/// Fixed-advance estimate for monospace faces. Needs no font files.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text(&mut self, text: &str, font_size: f64) -> (f64, f64) {
        let width = text.chars().count() as f64 * font_size * self.advance;
        (width, font_size * 1.2)
    }
}

/// Shapes text with the system monospace face.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    cache: HashMap<MeasureKey, (f64, f64)>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            cache: HashMap::new(),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f64) -> (f64, f64) {
        let key = MeasureKey {
            text: text.to_string(),
            font_size_bits: font_size.to_bits(),
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let size = font_size as f32;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size: size,
                line_height: size * 1.2,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(Family::Monospace);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }

        let measured = (f64::from(width), f64::from(height));
        self.cache.insert(key, measured);
        measured
    }
}
