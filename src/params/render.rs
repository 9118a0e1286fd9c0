//! Terminal rendering configuration.

use std::time::Duration;

/// Frequency bar display configuration
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Number of bars drawn (lowest bins first)
    pub bar_count: usize,

    /// Animation tick rate (frames per second)
    pub fps: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            bar_count: 48, // ~first 40% of 128 bins, where speech energy sits
            fps: 60,
        }
    }
}

impl VisualizerConfig {
    /// Time between animation ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}
