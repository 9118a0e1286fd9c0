//! Terminal frequency bars fed by the analysis node.

use crate::audio::AnalysisNode;
use crate::params::VisualizerConfig;

/// Glyphs for bar heights 1..=8 (height 0 renders as a space)
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bars are drawn at half the byte magnitude (0..=127)
const MAX_BAR_HEIGHT: f32 = 127.0;

pub struct Visualizer {
    config: VisualizerConfig,
    bins: Vec<u8>,
    frame: String,
}

impl Visualizer {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            bins: Vec::new(),
            frame: String::new(),
        }
    }

    /// Sample the analyser once and render a frame.
    ///
    /// When not playing, or before any analyser exists, sampling stops and
    /// the frame is cleared.
    pub fn tick(&mut self, playing: bool, analyser: Option<&AnalysisNode>) -> &str {
        let Some(analyser) = analyser.filter(|_| playing) else {
            self.clear();
            return &self.frame;
        };

        self.bins.resize(analyser.frequency_bin_count(), 0);
        analyser.byte_frequency_data(&mut self.bins);

        self.frame.clear();
        for &value in self.bins.iter().take(self.config.bar_count) {
            self.frame.push(bar_glyph(value));
        }
        &self.frame
    }

    pub fn clear(&mut self) {
        self.bins.fill(0);
        self.frame.clear();
    }

    /// Last rendered frame
    pub fn frame(&self) -> &str {
        &self.frame
    }
}

/// Glyph for one bin's byte magnitude
fn bar_glyph(value: u8) -> char {
    let height = (value / 2) as f32;
    let level = (height / MAX_BAR_HEIGHT * LEVELS.len() as f32).ceil() as usize;
    match level {
        0 => ' ',
        n => LEVELS[n.min(LEVELS.len()) - 1],
    }
}
