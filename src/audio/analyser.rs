//! Shared frequency analysis node.
//!
//! The playing source pushes its output samples through an [`AnalysisTap`];
//! readers pull byte-scaled magnitude snapshots on their own schedule.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, MutexGuard};

use super::controller::SessionToken;
use crate::params::AnalyserConfig;

/// Time-domain history and smoothing state (shared with the audio thread)
struct AnalysisState {
    /// Ring of the latest `fft_size` samples
    samples: Vec<f32>,
    write_pos: usize,
    /// Previous smoothed magnitudes (linear)
    smoothed: Vec<f32>,
    /// Session allowed to feed the node
    upstream: Option<SessionToken>,
}

impl AnalysisState {
    fn push(&mut self, samples: &[f32]) {
        let len = self.samples.len();
        for &sample in samples {
            self.samples[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    fn clear_samples(&mut self) {
        self.samples.fill(0.0);
        self.write_pos = 0;
    }
}

fn lock(state: &Mutex<AnalysisState>) -> MutexGuard<'_, AnalysisState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Long-lived analysis node owned by the playback controller
pub struct AnalysisNode {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    state: Arc<Mutex<AnalysisState>>,
}

impl AnalysisNode {
    /// Create a node; `config` must already be validated
    pub fn new(config: AnalyserConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let window = (0..size).map(|i| hann_window(i, size)).collect();
        let state = AnalysisState {
            samples: vec![0.0; size],
            write_pos: 0,
            smoothed: vec![0.0; config.frequency_bin_count()],
            upstream: None,
        };

        Self {
            config,
            fft,
            window,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    /// Number of bins filled by [`Self::byte_frequency_data`]
    pub fn frequency_bin_count(&self) -> usize {
        self.config.frequency_bin_count()
    }

    /// Session currently routed into the node
    pub fn upstream(&self) -> Option<SessionToken> {
        lock(&self.state).upstream
    }

    /// Route `token`'s samples into the node, dropping older history
    pub(crate) fn connect(&self, token: SessionToken) {
        let mut state = lock(&self.state);
        state.clear_samples();
        state.upstream = Some(token);
    }

    pub(crate) fn disconnect(&self) {
        let mut state = lock(&self.state);
        state.clear_samples();
        state.upstream = None;
    }

    /// Writer handle bound to one session
    pub(crate) fn tap(&self, token: SessionToken) -> AnalysisTap {
        AnalysisTap {
            token,
            state: Arc::clone(&self.state),
        }
    }

    /// Fill `out` with the current magnitude spectrum scaled to 0..=255.
    ///
    /// Each call advances the smoothing state, so it should be called once
    /// per animation tick. Writes at most `frequency_bin_count()` values.
    pub fn byte_frequency_data(&self, out: &mut [u8]) {
        let size = self.config.fft_size;
        let bins = self.frequency_bin_count();
        let tau = self.config.smoothing_time_constant;
        let db_range = self.config.max_decibels - self.config.min_decibels;

        let mut state = lock(&self.state);

        // Oldest sample first; unwritten slots are zero
        let mut spectrum: Vec<Complex<f32>> = (0..size)
            .map(|i| {
                let sample = state.samples[(state.write_pos + i) % size];
                Complex::new(sample * self.window[i], 0.0)
            })
            .collect();
        self.fft.process(&mut spectrum);

        for (k, value) in spectrum.iter().take(bins).enumerate() {
            let magnitude = value.norm() / size as f32;
            let smoothed = tau * state.smoothed[k] + (1.0 - tau) * magnitude;
            state.smoothed[k] = smoothed;

            if let Some(slot) = out.get_mut(k) {
                let db = 20.0 * smoothed.log10();
                let scaled = (db - self.config.min_decibels) * 255.0 / db_range;
                *slot = scaled.clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Writer side of the analysis node, held by one playing source
#[derive(Clone)]
pub struct AnalysisTap {
    token: SessionToken,
    state: Arc<Mutex<AnalysisState>>,
}

impl AnalysisTap {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Push output samples; ignored once the session is disconnected
    pub fn write(&self, samples: &[f32]) {
        let mut state = lock(&self.state);
        if state.upstream == Some(self.token) {
            state.push(samples);
        }
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
