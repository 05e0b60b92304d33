use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::ResolveError;
use crate::domain::settings::{NotificationSetting, SoundRef};
use crate::store::repo::SoundStore;

/// Directory name used for the relative-path retry of built-in sounds.
pub const RELATIVE_SOUNDS_DIR: &str = "sounds";

/// Something the audio backend can play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    File(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Maps sound references onto built-in files or stored custom payloads.
#[derive(Clone)]
pub struct SoundResolver {
    sounds_dir: PathBuf,
    default_sound: String,
    builtin_sounds: Vec<String>,
    store: Arc<dyn SoundStore>,
}

impl SoundResolver {
    pub fn new(
        sounds_dir: impl Into<PathBuf>,
        default_sound: impl Into<String>,
        builtin_sounds: Vec<String>,
        store: Arc<dyn SoundStore>,
    ) -> Self {
        Self {
            sounds_dir: absolutize(sounds_dir.into()),
            default_sound: default_sound.into(),
            builtin_sounds,
            store,
        }
    }

    /// Built-ins resolve by path construction only; custom sounds hit the store.
    pub fn resolve(&self, sound: &SoundRef) -> Result<AudioSource, ResolveError> {
        match sound {
            SoundRef::Builtin(name) => Ok(AudioSource::File(self.builtin_path(name))),
            SoundRef::Custom(id) => match self
                .store
                .get(id)
                .map_err(|e| ResolveError::Store(e.to_string()))?
            {
                Some(data) => Ok(AudioSource::Bytes(data.into())),
                None => Err(ResolveError::NotFound { id: id.clone() }),
            },
        }
    }

    pub fn builtin_path(&self, name: &str) -> PathBuf {
        self.sounds_dir.join(name)
    }

    pub fn relative_path(name: &str) -> PathBuf {
        Path::new(RELATIVE_SOUNDS_DIR).join(name)
    }

    pub fn default_ref(&self) -> SoundRef {
        SoundRef::Builtin(self.default_sound.clone())
    }

    pub fn is_known_builtin(&self, name: &str) -> bool {
        name == self.default_sound || self.builtin_sounds.iter().any(|b| b == name)
    }

    /// The sound the settings select, or the default when the selection
    /// names neither a known built-in nor a registered custom sound. The
    /// settings are left untouched either way.
    pub fn effective_sound(&self, settings: &NotificationSetting) -> SoundRef {
        match settings.selected_sound() {
            SoundRef::Builtin(name) if self.is_known_builtin(&name) => SoundRef::Builtin(name),
            SoundRef::Custom(id) if settings.has_custom_sound(&id) => SoundRef::Custom(id),
            other => {
                warn!("Selected sound {other} is not registered, using {}", self.default_sound);
                self.default_ref()
            }
        }
    }
}

fn absolutize(dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        return dir;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{CustomSound, DEFAULT_SOUND};
    use crate::store::sqlite::SqliteSoundStore;

    fn resolver() -> SoundResolver {
        let store = SqliteSoundStore::open_in_memory().unwrap();
        store.put("siren", b"ID3 fake mp3").unwrap();
        SoundResolver::new(
            "/opt/notifyit/sounds",
            DEFAULT_SOUND,
            vec!["chime.wav".into()],
            Arc::new(store),
        )
    }

    #[test]
    fn builtin_resolves_to_absolute_path() {
        let r = resolver();
        let src = r.resolve(&SoundRef::Builtin("chime.wav".into())).unwrap();
        assert_eq!(
            src,
            AudioSource::File(PathBuf::from("/opt/notifyit/sounds/chime.wav"))
        );
        assert_eq!(
            SoundResolver::relative_path("chime.wav"),
            PathBuf::from("sounds/chime.wav")
        );
    }

    #[test]
    fn relative_sounds_dir_is_anchored() {
        let store = SqliteSoundStore::open_in_memory().unwrap();
        let r = SoundResolver::new("sounds", DEFAULT_SOUND, vec![], Arc::new(store));
        assert!(r.builtin_path("x.mp3").is_absolute());
    }

    #[test]
    fn custom_resolves_from_store() {
        let r = resolver();
        match r.resolve(&SoundRef::custom("siren")).unwrap() {
            AudioSource::Bytes(b) => assert_eq!(&b[..], b"ID3 fake mp3"),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn missing_custom_is_not_found() {
        let r = resolver();
        let err = r.resolve(&SoundRef::custom("missing-id")).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { id } if id == "missing-id"));
    }

    #[test]
    fn unknown_selection_falls_back_without_mutation() {
        let r = resolver();
        let mut settings = NotificationSetting::default();
        settings.custom_sound = "custom:gone".into();
        assert_eq!(r.effective_sound(&settings), SoundRef::default_builtin());
        assert_eq!(settings.custom_sound, "custom:gone");

        settings.custom_sound = "nope.mp3".into();
        assert_eq!(r.effective_sound(&settings), SoundRef::default_builtin());

        settings.custom_sounds.push(CustomSound {
            id: "siren".into(),
            name: "siren".into(),
            filename: "siren.mp3".into(),
            data: None,
        });
        settings.custom_sound = "custom:siren".into();
        assert_eq!(r.effective_sound(&settings), SoundRef::custom("siren"));

        settings.custom_sound = "chime.wav".into();
        assert_eq!(
            r.effective_sound(&settings),
            SoundRef::Builtin("chime.wav".into())
        );
    }
}
