//! Base64 → 16-bit PCM → normalized float buffer.
//!
//! Pure functions with no shared state; safe to call from any thread.

use base64::{engine::general_purpose, Engine as _};

use super::buffer::DecodedAudioBuffer;
use crate::error::{Error, Result};
use crate::synthesis::SynthesisPayload;

/// Width of one PCM sample in bytes
const BYTES_PER_SAMPLE: usize = 2;

/// Full-scale divisor for signed 16-bit samples
const PCM16_SCALE: f32 = 32768.0;

/// Decode a standard-alphabet base64 payload into raw bytes.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|e| Error::MalformedPayload(format!("invalid base64: {}", e)))
}

/// Interpret `bytes` as interleaved signed 16-bit little-endian PCM.
///
/// The byte length must be a multiple of `2 * channels`; the payload is
/// never truncated or padded to make it fit. Sample `n` goes to channel
/// `n % channels`.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<DecodedAudioBuffer> {
    if channels == 0 {
        return Err(Error::UnsupportedChannelCount(channels));
    }
    if sample_rate == 0 {
        return Err(Error::UnsupportedSampleRate(sample_rate));
    }

    let channel_count = channels as usize;
    let frame_bytes = BYTES_PER_SAMPLE * channel_count;
    if bytes.len() % BYTES_PER_SAMPLE != 0 {
        return Err(Error::MalformedPayload(format!(
            "odd byte length {}",
            bytes.len()
        )));
    }
    if bytes.len() % frame_bytes != 0 {
        return Err(Error::MalformedPayload(format!(
            "byte length {} is not a whole number of {}-channel frames",
            bytes.len(),
            channel_count
        )));
    }

    let frames = bytes.len() / frame_bytes;
    let mut data = vec![Vec::with_capacity(frames); channel_count];
    for (index, pair) in bytes.chunks_exact(BYTES_PER_SAMPLE).enumerate() {
        let sample = i16::from_le_bytes([pair[0], pair[1]]);
        data[index % channel_count].push(sample as f32 / PCM16_SCALE);
    }

    DecodedAudioBuffer::from_channels(sample_rate, data)
        .ok_or_else(|| Error::MalformedPayload("channel lengths differ".to_string()))
}

/// Decode a synthesis payload using the metadata that travels with it.
pub fn decode_payload(payload: &SynthesisPayload) -> Result<DecodedAudioBuffer> {
    let bytes = decode_base64(&payload.data)?;
    decode_pcm16(&bytes, payload.sample_rate, payload.channels)
}

/// Inverse of the decoder's normalization, used for 16-bit export.
pub fn quantize_sample(sample: f32) -> i16 {
    (sample * PCM16_SCALE)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
