use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("custom sound not found: {id}")]
    NotFound { id: String },

    #[error("sound store error: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("audio device unavailable: {0}")]
    Device(String),

    #[error("could not decode audio: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),
}
