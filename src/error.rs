use thiserror::Error;

#[derive(Error, Debug)]
pub enum EchoError {
    #[error("WAV read error: {0}")]
    WavRead(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Channel {requested} out of range: file has {available} channel(s)")]
    ChannelOutOfRange { requested: usize, available: usize },

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EchoError>;
