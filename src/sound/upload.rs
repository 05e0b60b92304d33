use anyhow::{Result, anyhow};
use base64::{Engine as _, engine::general_purpose};
use log::info;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::domain::settings::{CustomSound, NotificationSetting};
use crate::store::repo::SoundStore;

/// 5 MiB
pub const MAX_SOUND_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "mp4"];

/// Check extension and size of an audio file before it is imported.
pub fn validate_audio_file(path: &Path, size: u64) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(anyhow!(
            "Invalid file type. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if size > MAX_SOUND_FILE_SIZE {
        return Err(anyhow!(
            "File is too large. Maximum size is {}MB",
            MAX_SOUND_FILE_SIZE / (1024 * 1024)
        ));
    }

    Ok(())
}

/// Read and validate an audio file into an upload-ready `CustomSound`
/// carrying its payload as base64.
pub fn process_audio_file(path: &Path) -> Result<CustomSound> {
    let size = fs::metadata(path)?.len();
    validate_audio_file(path, size)?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("file name is not valid UTF-8: {}", path.display()))?
        .to_string();
    let name = filename
        .split('.')
        .next()
        .unwrap_or(filename.as_str())
        .to_string();

    let bytes = fs::read(path)?;

    Ok(CustomSound {
        id: Uuid::new_v4().to_string(),
        name,
        filename,
        data: Some(general_purpose::STANDARD.encode(bytes)),
    })
}

/// Store the payload and register the sound in `settings`. The caller
/// persists `settings` afterwards.
pub fn save_custom_sound(
    settings: &mut NotificationSetting,
    store: &dyn SoundStore,
    sound: &CustomSound,
) -> Result<()> {
    if let Some(data) = &sound.data {
        let bytes = decode_payload(data)?;
        store.put(&sound.id, &bytes)?;
        info!("Stored custom sound {} ({} bytes)", sound.id, bytes.len());
    }
    settings.custom_sounds.push(sound.metadata());
    Ok(())
}

/// Remove a custom sound from settings and the store. A selection pointing
/// at it is left alone; playback falls back to the default.
pub fn delete_custom_sound(
    settings: &mut NotificationSetting,
    store: &dyn SoundStore,
    id: &str,
) -> Result<bool> {
    let before = settings.custom_sounds.len();
    settings.custom_sounds.retain(|s| s.id != id);
    store.delete(id)?;
    Ok(settings.custom_sounds.len() != before)
}

/// Decode base64 audio, with or without a `data:<mime>;base64,` prefix.
fn decode_payload(data: &str) -> Result<Vec<u8>> {
    let encoded = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| anyhow!("invalid sound payload: {e}"))
}
