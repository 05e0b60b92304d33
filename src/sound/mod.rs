// Sound delivery for alerts.
//
// - resolver.rs: sound reference -> playable source
// - backend.rs: audio/vibration primitives and the rodio implementation
// - ladder.rs: ordered fallback from requested sound down to a beep
// - worker.rs: dedicated audio thread serving play requests in order
// - upload.rs: importing user sounds into the store

pub mod backend;
pub mod error;
pub mod ladder;
pub mod resolver;
pub mod upload;
pub mod worker;

pub use error::{PlaybackError, ResolveError};
pub use ladder::{PlaybackContext, PlaybackLadder, PlaybackOutcome};
pub use resolver::{AudioSource, SoundResolver};
