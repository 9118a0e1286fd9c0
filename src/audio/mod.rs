//! Audio decode and playback pipeline.
//!
//! Decodes base64 PCM payloads into immutable float buffers, plays one
//! buffer at a time through a shared FFT analysis node, and exports
//! buffers as WAV files.

mod analyser;
mod buffer;
mod controller;
mod decoder;
pub mod output;
mod wav;

// Re-export public types
pub use analyser::{hann_window, AnalysisNode, AnalysisTap};
pub use buffer::DecodedAudioBuffer;
pub use controller::{PlaybackController, PlaybackState, SessionToken};
pub use decoder::{decode_base64, decode_payload, decode_pcm16, quantize_sample};
pub use wav::{encode_wav, export_filename, export_wav, write_wav};
