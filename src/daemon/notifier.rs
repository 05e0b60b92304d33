use anyhow::{Result, anyhow};
use log::debug;
use notify_rust::{Notification, Timeout};

#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::{Hint, Urgency};

use crate::domain::email::Email;
use crate::domain::settings::NotificationSetting;
use crate::platform::Capabilities;

pub const ALERT_TITLE: &str = "Critical IT Alert";
const APP_NAME: &str = "NotifyIT";
const FALLBACK_ICON: &str = "dialog-warning";

/// What the platform notification surface is asked to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNotification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    /// Email id, sent as an informational hint; servers do not replace by it.
    pub tag: Option<String>,
    /// No system sound; the playback ladder provides the audible cue.
    pub silent: bool,
    pub require_interaction: bool,
    /// Ask the desktop to bypass do-not-disturb.
    pub critical: bool,
}

impl AlertNotification {
    pub fn for_email(
        email: &Email,
        settings: &NotificationSetting,
        caps: Capabilities,
        icon: Option<&str>,
    ) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            body: format!("From: {}\nSubject: {}", email.from, email.subject),
            icon: icon.map(str::to_string),
            tag: Some(email.id.clone()),
            silent: caps.suppress_system_sound,
            require_interaction: true,
            critical: settings.override_silent_mode,
        }
    }

    pub fn test(caps: Capabilities, icon: Option<&str>) -> Self {
        Self {
            title: "Test Notification".to_string(),
            body: "This is a test notification from NotifyIT".to_string(),
            icon: icon.map(str::to_string),
            tag: None,
            silent: caps.suppress_system_sound,
            require_interaction: false,
            critical: false,
        }
    }
}

pub trait NotificationSurface {
    fn show(&self, alert: &AlertNotification) -> Result<()>;
}

/// Desktop notifications through the OS notification service.
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSurface for Notifier {
    fn show(&self, alert: &AlertNotification) -> Result<()> {
        let mut n = Notification::new();
        n.appname(APP_NAME)
            .summary(&alert.title)
            .body(&alert.body)
            .icon(alert.icon.as_deref().unwrap_or(FALLBACK_ICON));

        if alert.require_interaction {
            n.timeout(Timeout::Never);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            n.hint(Hint::Category("email".to_string()));
            if alert.silent {
                n.hint(Hint::SuppressSound(true));
            }
            if let Some(tag) = &alert.tag {
                n.hint(Hint::Custom("x-notifyit-tag".to_string(), tag.clone()));
            }
            if alert.critical {
                n.urgency(Urgency::Critical);
            }
        }

        n.show()
            .map(|_| ())
            .map_err(|e| anyhow!("Notification error: {e}"))?;
        debug!("Displayed notification {:?}", alert.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::email::Priority;
    use crate::platform::Platform;

    #[test]
    fn email_notification_carries_sender_and_subject() {
        let email = Email::new("email-9", "alerts@company.com", "URGENT: outage", Priority::High);
        let settings = NotificationSetting::default();
        let n = AlertNotification::for_email(
            &email,
            &settings,
            Platform::Android.capabilities(),
            Some("/usr/share/icons/notifyit.png"),
        );
        assert_eq!(n.title, ALERT_TITLE);
        assert_eq!(n.body, "From: alerts@company.com\nSubject: URGENT: outage");
        assert_eq!(n.tag.as_deref(), Some("email-9"));
        assert!(n.silent);
        assert!(n.critical);
    }

    #[test]
    fn desktop_keeps_system_sound() {
        let n = AlertNotification::test(Platform::Desktop.capabilities(), None);
        assert!(!n.silent);
        assert!(!n.require_interaction);
        assert_eq!(n.tag, None);
    }
}
