//! Error taxonomy shared by the decode, playback and synthesis paths.

use thiserror::Error;

use crate::history::EntryId;

#[derive(Error, Debug)]
pub enum Error {
    /// Payload failed base64 decoding or PCM length/alignment checks
    #[error("malformed audio payload: {0}")]
    MalformedPayload(String),

    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(u16),

    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),

    /// Output device or source node could not be created
    #[error("playback unavailable: {0}")]
    PlaybackUnavailable(String),

    /// Remote synthesis failed; the message is shown to the user as-is
    #[error("{0}")]
    UpstreamSynthesis(String),

    #[error("please enter some text")]
    EmptyInput,

    #[error("no history entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
