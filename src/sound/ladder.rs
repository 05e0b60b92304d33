use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::backend::{AudioBackend, Vibrator};
use super::error::{PlaybackError, ResolveError};
use super::resolver::{AudioSource, SoundResolver};
use crate::domain::settings::SoundRef;
use crate::platform::Capabilities;
use crate::rules::editing::volume_gain;

pub const FALLBACK_TONE_HZ: f32 = 800.0;
pub const FALLBACK_TONE_DURATION: Duration = Duration::from_millis(200);
pub const VIBRATION_PATTERN: [Duration; 3] = [
    Duration::from_millis(200),
    Duration::from_millis(100),
    Duration::from_millis(200),
];

/// How an alert ended up being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Played,
    PlayedRelative,
    Vibrated,
    Tone,
    /// Every step failed. Logged only.
    Silent,
}

/// Per-session playback state: whether audio has been unlocked and the
/// preloaded default sound.
#[derive(Debug, Default)]
pub struct PlaybackContext {
    unlocked: bool,
    preloaded: Option<(String, Arc<[u8]>)>,
}

impl PlaybackContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn preloaded(&self, name: &str) -> Option<Arc<[u8]>> {
        self.preloaded
            .as_ref()
            .filter(|(cached, _)| cached == name)
            .map(|(_, data)| Arc::clone(data))
    }

    /// Read the default built-in once so the common case skips disk access.
    pub fn preload_default(&mut self, resolver: &SoundResolver) {
        let SoundRef::Builtin(name) = resolver.default_ref() else {
            return;
        };
        let path = resolver.builtin_path(&name);
        match std::fs::read(&path) {
            Ok(data) => {
                info!("Preloaded default sound {} ({} bytes)", path.display(), data.len());
                self.preloaded = Some((name, data.into()));
            }
            Err(e) => warn!("Could not preload {}: {e}", path.display()),
        }
    }
}

/// Best-effort alert sound: requested sound, relative-path retry for
/// built-ins, then vibration or a synthesized beep.
pub struct PlaybackLadder<B: AudioBackend> {
    backend: B,
    vibrator: Option<Box<dyn Vibrator>>,
    resolver: SoundResolver,
    caps: Capabilities,
    context: PlaybackContext,
}

impl<B: AudioBackend> PlaybackLadder<B> {
    pub fn new(backend: B, resolver: SoundResolver, caps: Capabilities) -> Self {
        Self {
            backend,
            vibrator: None,
            resolver,
            caps,
            context: PlaybackContext::new(),
        }
    }

    pub fn with_vibrator(mut self, vibrator: Box<dyn Vibrator>) -> Self {
        self.vibrator = Some(vibrator);
        self
    }

    pub fn with_context(mut self, context: PlaybackContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut PlaybackContext {
        &mut self.context
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolver(&self) -> &SoundResolver {
        &self.resolver
    }

    /// Play `sound` at `volume` (0-100). Never fails; the outcome is only
    /// informative.
    pub fn play(&mut self, sound: &SoundRef, volume: i32) -> PlaybackOutcome {
        let gain = volume_gain(volume);
        self.ensure_unlocked();

        match sound {
            SoundRef::Builtin(name) => self.play_builtin(name, gain),
            SoundRef::Custom(_) => match self.resolver.resolve(sound) {
                Ok(source) => {
                    info!("Playing custom sound {sound}");
                    match self.play_resolved(source, gain) {
                        Ok(()) => PlaybackOutcome::Played,
                        Err(e) => {
                            warn!("Custom sound {sound} failed: {e}");
                            self.fallback(gain)
                        }
                    }
                }
                Err(ResolveError::NotFound { id }) => {
                    warn!("Custom sound {id} not found, using default sound");
                    self.play_default(gain)
                }
                Err(e) => {
                    warn!("Could not load {sound}: {e}, using default sound");
                    self.play_default(gain)
                }
            },
        }
    }

    fn play_resolved(&mut self, source: AudioSource, gain: f32) -> Result<(), PlaybackError> {
        match source {
            AudioSource::Bytes(data) => self.backend.play_bytes(data, gain),
            AudioSource::File(path) => self.backend.play_file(&path, gain),
        }
    }

    fn play_default(&mut self, gain: f32) -> PlaybackOutcome {
        match self.resolver.default_ref() {
            SoundRef::Builtin(name) => self.play_builtin(&name, gain),
            SoundRef::Custom(_) => self.fallback(gain),
        }
    }

    fn play_builtin(&mut self, name: &str, gain: f32) -> PlaybackOutcome {
        if let Some(data) = self.context.preloaded(name) {
            debug!("Playing preloaded {name}");
            match self.backend.play_bytes(data, gain) {
                Ok(()) => return PlaybackOutcome::Played,
                Err(e) => warn!("Preloaded {name} failed: {e}"),
            }
        }

        let path = self.resolver.builtin_path(name);
        info!("Playing {}", path.display());
        match self.backend.play_file(&path, gain) {
            Ok(()) => return PlaybackOutcome::Played,
            Err(e) => warn!("Playback of {} failed: {e}", path.display()),
        }

        let relative = SoundResolver::relative_path(name);
        info!("Retrying with relative path {}", relative.display());
        match self.backend.play_file(&relative, gain) {
            Ok(()) => PlaybackOutcome::PlayedRelative,
            Err(e) => {
                warn!("Relative playback of {} failed: {e}", relative.display());
                self.fallback(gain)
            }
        }
    }

    fn fallback(&mut self, gain: f32) -> PlaybackOutcome {
        if self.caps.supports_vibration {
            if let Some(vibrator) = &self.vibrator {
                match vibrator.vibrate(&VIBRATION_PATTERN) {
                    Ok(()) => {
                        info!("Vibrated instead of sound");
                        return PlaybackOutcome::Vibrated;
                    }
                    Err(e) => warn!("Vibration failed: {e}"),
                }
            }
        }

        match self
            .backend
            .play_tone(FALLBACK_TONE_HZ, FALLBACK_TONE_DURATION, gain)
        {
            Ok(()) => {
                info!("Played fallback tone");
                PlaybackOutcome::Tone
            }
            Err(e) => {
                error!("Fallback tone failed, alert is silent: {e}");
                PlaybackOutcome::Silent
            }
        }
    }

    fn ensure_unlocked(&mut self) {
        if !self.caps.requires_unlock || self.context.unlocked {
            return;
        }
        match self.backend.unlock() {
            Ok(()) => {
                info!("Audio unlocked");
                self.context.unlocked = true;
            }
            Err(e) => warn!("Audio unlock failed, will retry on next alert: {e}"),
        }
    }
}

/// Placeholder for platforms without a haptic motor.
pub struct NoVibrator;

impl Vibrator for NoVibrator {
    fn vibrate(&self, _pattern: &[Duration]) -> Result<(), PlaybackError> {
        Err(PlaybackError::Unsupported("vibration"))
    }
}
