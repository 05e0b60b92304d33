use anyhow::{Result, anyhow};

use crate::domain::settings::EmailFilter;

/// Add a sender pattern. Returns false when it was empty or already present.
pub fn add_sender(filter: &mut EmailFilter, sender: &str) -> bool {
    push_unique(&mut filter.senders, sender)
}

pub fn remove_sender(filter: &mut EmailFilter, sender: &str) -> bool {
    remove_exact(&mut filter.senders, sender)
}

/// Add a subject keyword. Returns false when it was empty or already present.
pub fn add_subject(filter: &mut EmailFilter, keyword: &str) -> bool {
    push_unique(&mut filter.subjects, keyword)
}

pub fn remove_subject(filter: &mut EmailFilter, keyword: &str) -> bool {
    remove_exact(&mut filter.subjects, keyword)
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn remove_exact(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|v| v != value.trim());
    list.len() != before
}

/// Validate an `HH:MM` bound typed by the user, clamping hour to 0-23 and
/// minute to 0-59.
pub fn normalize_hhmm(input: &str) -> Result<String> {
    let (h, m) = input
        .trim()
        .split_once(':')
        .unwrap_or((input.trim(), "0"));

    let hour: u32 = h
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid hour in time {input:?}, expected HH:MM"))?;
    let minute: u32 = m
        .trim()
        .parse()
        .map_err(|_| anyhow!("invalid minute in time {input:?}, expected HH:MM"))?;

    Ok(format!("{:02}:{:02}", hour.min(23), minute.min(59)))
}

pub fn clamp_volume(volume: i32) -> u8 {
    volume.clamp(0, 100) as u8
}

/// Playback gain in 0.0-1.0.
pub fn volume_gain(volume: i32) -> f32 {
    f32::from(clamp_volume(volume)) / 100.0
}
