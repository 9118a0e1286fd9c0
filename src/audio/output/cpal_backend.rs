//! Default output device via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn};

use super::{CompletionNotifier, OutputBackend, SourceNode};
use crate::audio::analyser::AnalysisTap;
use crate::audio::buffer::DecodedAudioBuffer;
use crate::error::{Error, Result};

/// Output backend bound to the host's default device.
///
/// The device is opened on first use, so a machine without audio only
/// fails when playback is actually requested.
#[derive(Default)]
pub struct CpalOutput {
    device: Option<cpal::Device>,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn device(&mut self) -> Result<&cpal::Device> {
        if self.device.is_none() {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| Error::PlaybackUnavailable("No audio output device found".into()))?;
            info!(
                "Audio output: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );
            self.device = Some(device);
        }
        self.device
            .as_ref()
            .ok_or_else(|| Error::PlaybackUnavailable("No audio output device found".into()))
    }
}

/// Pick an f32 stream config, preferring the buffer's own sample rate
fn stream_config(device: &cpal::Device, sample_rate: u32) -> Result<cpal::StreamConfig> {
    let wanted = cpal::SampleRate(sample_rate);
    if let Ok(mut ranges) = device.supported_output_configs() {
        let native = ranges.find(|range| {
            range.sample_format() == cpal::SampleFormat::F32
                && range.min_sample_rate() <= wanted
                && wanted <= range.max_sample_rate()
        });
        if let Some(range) = native {
            return Ok(range.with_sample_rate(wanted).config());
        }
    }

    let fallback = device
        .default_output_config()
        .map_err(|e| Error::PlaybackUnavailable(format!("Failed to get audio config: {}", e)))?;
    Ok(fallback.config())
}

impl OutputBackend for CpalOutput {
    type Source = CpalSource;

    fn start_source(
        &mut self,
        buffer: DecodedAudioBuffer,
        tap: AnalysisTap,
        on_ended: CompletionNotifier,
    ) -> Result<CpalSource> {
        let device = self.device()?;
        let config = stream_config(device, buffer.sample_rate())?;
        let out_channels = config.channels as usize;

        info!(
            "Starting source: {} frames @ {}Hz → device {}Hz x{}",
            buffer.frames(),
            buffer.sample_rate(),
            config.sample_rate.0,
            out_channels
        );

        let mut renderer = SourceRenderer::new(buffer, config.sample_rate.0, tap, on_ended);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    renderer.render(data, out_channels);
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| Error::PlaybackUnavailable(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::PlaybackUnavailable(format!("Failed to start audio stream: {}", e)))?;

        Ok(CpalSource {
            stream: Some(stream),
        })
    }
}

/// Live cpal stream playing one buffer
pub struct CpalSource {
    stream: Option<cpal::Stream>,
}

impl SourceNode for CpalSource {
    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                warn!("Failed to pause audio stream: {}", e);
            }
        }
    }
}

impl Drop for CpalSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Audio-thread state: reads the buffer at device rate, feeds the tap
struct SourceRenderer {
    buffer: DecodedAudioBuffer,
    /// Read position in source frames
    position: f64,
    /// Source frames advanced per output frame
    step: f64,
    tap: AnalysisTap,
    on_ended: Option<CompletionNotifier>,
    scratch: Vec<f32>,
}

impl SourceRenderer {
    fn new(
        buffer: DecodedAudioBuffer,
        device_rate: u32,
        tap: AnalysisTap,
        on_ended: CompletionNotifier,
    ) -> Self {
        let step = buffer.sample_rate() as f64 / device_rate as f64;
        Self {
            buffer,
            position: 0.0,
            step,
            tap,
            on_ended: Some(on_ended),
            scratch: Vec::new(),
        }
    }

    /// Fill one interleaved device block
    fn render(&mut self, data: &mut [f32], out_channels: usize) {
        let frames = self.buffer.frames();
        let in_channels = self.buffer.channel_count();
        self.scratch.clear();

        for frame in data.chunks_mut(out_channels) {
            let index = self.position as usize;
            if index >= frames {
                frame.fill(0.0);
                continue;
            }

            // Linear interpolation between neighbouring source frames
            let frac = (self.position - index as f64) as f32;
            let mut mix = 0.0;
            for (c, slot) in frame.iter_mut().enumerate() {
                let channel = self.buffer.channel(c.min(in_channels - 1));
                let current = channel[index];
                let next = channel.get(index + 1).copied().unwrap_or(current);
                *slot = current + (next - current) * frac;
                mix += *slot;
            }
            self.scratch.push(mix / out_channels as f32);
            self.position += self.step;
        }

        if !self.scratch.is_empty() {
            self.tap.write(&self.scratch);
        }

        if self.position as usize >= frames {
            if let Some(notifier) = self.on_ended.take() {
                notifier.notify();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analyser::AnalysisNode;
    use crate::audio::controller::SessionToken;
    use crate::audio::output::PlaybackEvent;
    use crate::params::AnalyserConfig;
    use std::sync::mpsc;

    fn renderer(buffer: DecodedAudioBuffer, device_rate: u32) -> (SourceRenderer, mpsc::Receiver<PlaybackEvent>) {
        let node = AnalysisNode::new(AnalyserConfig::default());
        let token = SessionToken::first();
        node.connect(token);
        let (tx, rx) = mpsc::channel();
        let notifier = CompletionNotifier::new(token, tx);
        (SourceRenderer::new(buffer, device_rate, node.tap(token), notifier), rx)
    }

    #[test]
    fn test_mono_duplicated_to_stereo() {
        let buffer = DecodedAudioBuffer::from_channels(24000, vec![vec![0.25, -0.5]]).unwrap();
        let (mut renderer, rx) = renderer(buffer, 24000);

        let mut data = [1.0f32; 6];
        renderer.render(&mut data, 2);

        assert_eq!(data, [0.25, 0.25, -0.5, -0.5, 0.0, 0.0]);
        assert_eq!(rx.try_recv(), Ok(PlaybackEvent::Ended(SessionToken::first())));
    }

    #[test]
    fn test_completion_fires_once() {
        let buffer = DecodedAudioBuffer::from_channels(24000, vec![vec![0.1; 4]]).unwrap();
        let (mut renderer, rx) = renderer(buffer, 24000);

        let mut data = [0.0f32; 2];
        renderer.render(&mut data, 1);
        assert!(rx.try_recv().is_err());

        renderer.render(&mut data, 1);
        renderer.render(&mut data, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_upsampling_interpolates() {
        let buffer = DecodedAudioBuffer::from_channels(24000, vec![vec![0.0, 1.0]]).unwrap();
        let (mut renderer, _rx) = renderer(buffer, 48000);

        let mut data = [0.0f32; 4];
        renderer.render(&mut data, 1);
        assert_eq!(data, [0.0, 0.5, 1.0, 1.0]);
    }
}
