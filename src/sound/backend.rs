use log::debug;
use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::error::PlaybackError;

/// Audio primitives the playback ladder drives. Each call blocks until the
/// sound finished or failed to start.
pub trait AudioBackend {
    /// Play a silent, zero-length buffer so later playback is allowed.
    fn unlock(&mut self) -> Result<(), PlaybackError>;
    fn play_file(&mut self, path: &Path, gain: f32) -> Result<(), PlaybackError>;
    fn play_bytes(&mut self, data: Arc<[u8]>, gain: f32) -> Result<(), PlaybackError>;
    fn play_tone(&mut self, frequency_hz: f32, duration: Duration, gain: f32)
    -> Result<(), PlaybackError>;
}

/// Haptic output, where the device has one.
pub trait Vibrator: Send {
    /// Alternating on/off durations, starting with "on".
    fn vibrate(&self, pattern: &[Duration]) -> Result<(), PlaybackError>;
}

/// Plays through the default output device. The stream is opened lazily on
/// first use and kept for the life of the backend.
#[derive(Default)]
pub struct RodioBackend {
    stream: Option<OutputStream>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&mut self) -> Result<&OutputStream, PlaybackError> {
        if self.stream.is_none() {
            let stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| PlaybackError::Device(e.to_string()))?;
            debug!("Opened default audio output");
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| PlaybackError::Device("no output stream".into()))
    }

    fn play_source<S>(&mut self, source: S, gain: f32) -> Result<(), PlaybackError>
    where
        S: Source + Send + 'static,
    {
        let stream = self.stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(gain);
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

impl AudioBackend for RodioBackend {
    fn unlock(&mut self) -> Result<(), PlaybackError> {
        let silence = SineWave::new(440.0)
            .take_duration(Duration::ZERO)
            .amplify(0.0);
        self.play_source(silence, 0.0)
    }

    fn play_file(&mut self, path: &Path, gain: f32) -> Result<(), PlaybackError> {
        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| PlaybackError::Decode(format!("{}: {e}", path.display())))?;
        self.play_source(decoder, gain)
    }

    fn play_bytes(&mut self, data: Arc<[u8]>, gain: f32) -> Result<(), PlaybackError> {
        let decoder =
            Decoder::new(Cursor::new(data)).map_err(|e| PlaybackError::Decode(e.to_string()))?;
        self.play_source(decoder, gain)
    }

    fn play_tone(
        &mut self,
        frequency_hz: f32,
        duration: Duration,
        gain: f32,
    ) -> Result<(), PlaybackError> {
        let tone = SineWave::new(frequency_hz).take_duration(duration);
        self.play_source(tone, gain)
    }
}
