//! Immutable decoded audio buffer.

use std::sync::Arc;
use std::time::Duration;

/// Normalized floating-point audio, one sample sequence per channel.
///
/// Every sample lies in [-1.0, 1.0] and all channels have the same length.
/// Storage is shared and read-only, so clones are cheap and a history entry
/// and a playback session can both hold the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudioBuffer {
    sample_rate: u32,
    channels: Arc<[Vec<f32>]>,
}

impl DecodedAudioBuffer {
    /// Build a buffer from per-channel samples.
    ///
    /// Samples are clamped into [-1.0, 1.0]. Returns `None` for a zero
    /// sample rate, when no channel is given, or when channels differ in length.
    pub fn from_channels(sample_rate: u32, mut channels: Vec<Vec<f32>>) -> Option<Self> {
        if sample_rate == 0 {
            return None;
        }
        let frames = channels.first()?.len();
        if channels.iter().any(|c| c.len() != frames) {
            return None;
        }
        for channel in &mut channels {
            for sample in channel.iter_mut() {
                *sample = sample.clamp(-1.0, 1.0);
            }
        }
        Some(Self {
            sample_rate,
            channels: channels.into(),
        })
    }

    /// Sample rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Natural playback duration at the buffer's sample rate
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Average of all channels at `frame` (silence past the end)
    pub fn mono_frame(&self, frame: usize) -> f32 {
        if frame >= self.frames() {
            return 0.0;
        }
        let sum: f32 = self.channels.iter().map(|c| c[frame]).sum();
        sum / self.channels.len() as f32
    }

    /// Samples in frame order, channels interleaved
    pub fn interleaved(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.frames()).flat_map(move |frame| self.channels.iter().map(move |c| c[frame]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_channels() {
        assert!(DecodedAudioBuffer::from_channels(24000, vec![vec![0.0; 3], vec![0.0; 2]]).is_none());
        assert!(DecodedAudioBuffer::from_channels(24000, Vec::new()).is_none());
        assert!(DecodedAudioBuffer::from_channels(0, vec![vec![0.0]]).is_none());
    }

    #[test]
    fn test_clamps_out_of_range_samples() {
        let buffer = DecodedAudioBuffer::from_channels(24000, vec![vec![1.5, -2.0, 0.25]]).unwrap();
        assert_eq!(buffer.channel(0), &[1.0, -1.0, 0.25]);
    }

    #[test]
    fn test_duration_and_interleaving() {
        let buffer = DecodedAudioBuffer::from_channels(
            4,
            vec![vec![0.1, 0.2, 0.3, 0.4], vec![-0.1, -0.2, -0.3, -0.4]],
        )
        .unwrap();

        assert_eq!(buffer.frames(), 4);
        assert_eq!(buffer.duration(), Duration::from_secs(1));

        let interleaved: Vec<f32> = buffer.interleaved().collect();
        assert_eq!(interleaved, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4, -0.4]);

        assert!((buffer.mono_frame(1) - 0.0).abs() < 1e-6);
        assert_eq!(buffer.mono_frame(10), 0.0);
    }
}
