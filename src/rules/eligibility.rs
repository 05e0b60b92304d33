use chrono::Timelike;
use log::debug;

use super::window::in_window;
use crate::domain::email::{Email, Priority};
use crate::domain::settings::{EmailFilter, NotificationSetting};

/// Decide whether `email` deserves an alert.
///
/// A subject keyword match wins over the high-priority gate, but every path
/// still requires the sender to match (an empty sender list matches anyone).
pub fn should_notify(email: &Email, filter: &EmailFilter, settings: &NotificationSetting) -> bool {
    if !settings.enable_notifications {
        return false;
    }

    let has_keyword = filter
        .subjects
        .iter()
        .any(|keyword| contains_ignore_case(&email.subject, keyword));

    let sender_match = filter.senders.is_empty()
        || filter
            .senders
            .iter()
            .any(|sender| contains_ignore_case(&email.from, sender));

    if has_keyword && sender_match {
        true
    } else if filter.high_priority_only {
        email.priority == Priority::High && sender_match
    } else {
        sender_match
    }
}

/// Emails that pass the filter and, unless `bypass_window` is set, arrive
/// inside the active hours. Input order is kept.
pub fn select_alerts<'a, T: Timelike>(
    emails: &'a [Email],
    filter: &EmailFilter,
    settings: &NotificationSetting,
    now: &T,
    bypass_window: bool,
) -> Vec<&'a Email> {
    let window_open =
        bypass_window || in_window(now, &settings.start_time, &settings.end_time);

    emails
        .iter()
        .filter(|email| {
            let notify = should_notify(email, filter, settings);
            debug!(
                "email {} ({:?}, {:?}): notify={} window_open={}",
                email.id, email.subject, email.priority, notify, window_open
            );
            notify && window_open
        })
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
