//! RIFF/WAVE export of decoded buffers (16-bit PCM).

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::buffer::DecodedAudioBuffer;
use super::decoder::quantize_sample;
use crate::error::{Error, Result};
use crate::history::EntryId;

/// Download filename for a history entry
pub fn export_filename(id: &EntryId) -> String {
    format!("bengali_tts_{}.wav", id)
}

fn wav_spec(buffer: &DecodedAudioBuffer) -> Result<hound::WavSpec> {
    let channels = u16::try_from(buffer.channel_count())
        .map_err(|_| Error::UnsupportedChannelCount(u16::MAX))?;
    Ok(hound::WavSpec {
        channels,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    })
}

/// Write `buffer` as interleaved 16-bit PCM to any seekable sink
pub fn write_wav<W: Write + Seek>(buffer: &DecodedAudioBuffer, sink: W) -> Result<()> {
    let mut writer = hound::WavWriter::new(sink, wav_spec(buffer)?)?;
    for sample in buffer.interleaved() {
        writer.write_sample(quantize_sample(sample))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Serialize `buffer` to an in-memory WAV file
pub fn encode_wav(buffer: &DecodedAudioBuffer) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(buffer, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Write the entry's WAV into `dir` (created if needed), returning its path
pub fn export_wav(buffer: &DecodedAudioBuffer, id: &EntryId, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(id));
    fs::write(&path, encode_wav(buffer)?)?;
    info!("Saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::decoder::decode_pcm16;

    fn stereo_buffer() -> DecodedAudioBuffer {
        let samples: [i16; 6] = [0, -1, 32767, -32768, 1234, -4321];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        decode_pcm16(&bytes, 24000, 2).unwrap()
    }

    #[test]
    fn test_filename() {
        assert_eq!(export_filename(&EntryId::from("abc123xyz")), "bengali_tts_abc123xyz.wav");
    }

    #[test]
    fn test_encode_reads_back() {
        let bytes = encode_wav(&stereo_buffer()).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, -1, 32767, -32768, 1234, -4321]);
    }

    #[test]
    fn test_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let id = EntryId::from("entry0001");

        let path = export_wav(&stereo_buffer(), &id, &target).unwrap();

        assert_eq!(path, target.join("bengali_tts_entry0001.wav"));
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 6);
    }
}
