//! Kontho library - Bengali text-to-speech with live spectrum playback

pub mod app;
pub mod audio;
pub mod cli;
pub mod error;
pub mod history;
pub mod params;
pub mod synthesis;
pub mod visualizer;

pub use error::{Error, Result};
