//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, seconds, decibels, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod render;
mod synthesis;

// Re-export all types
pub use audio::{audio_constants, AnalyserConfig};
pub use render::VisualizerConfig;
pub use synthesis::{SynthesisConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
