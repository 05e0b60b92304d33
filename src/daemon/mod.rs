pub mod notifier;

use anyhow::Result;
use chrono::{Local, Timelike};
use log::{error, info};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use crate::daemon::notifier::{AlertNotification, NotificationSurface};
use crate::domain::email::Email;
use crate::domain::settings::NotificationSetting;
use crate::mail::source::MailSource;
use crate::platform::Capabilities;
use crate::rules::select_alerts;
use crate::sound::resolver::SoundResolver;
use crate::sound::worker::AudioHandle;
use crate::store::repo::SettingsRepository;

const SLEEP_SLICE: Duration = Duration::from_millis(250);

pub struct DaemonConfig {
    pub interval_secs: u64,
    pub bypass_time_window: bool,
}

/// Turns an eligible email into a visible notification plus an alert sound.
pub struct AlertDispatcher<N: NotificationSurface> {
    surface: N,
    audio: AudioHandle,
    resolver: SoundResolver,
    caps: Capabilities,
    icon: Option<String>,
}

impl<N: NotificationSurface> AlertDispatcher<N> {
    pub fn new(
        surface: N,
        audio: AudioHandle,
        resolver: SoundResolver,
        caps: Capabilities,
        icon: Option<String>,
    ) -> Self {
        Self {
            surface,
            audio,
            resolver,
            caps,
            icon,
        }
    }

    /// The notification is shown even if no sound can be produced, and a
    /// failing notification does not stop the sound.
    pub fn dispatch(&self, email: &Email, settings: &NotificationSetting) {
        info!("Sending notification for email: {}", email.subject);
        let alert =
            AlertNotification::for_email(email, settings, self.caps, self.icon.as_deref());
        self.deliver(&alert, settings);
    }

    pub fn test_alert(&self, settings: &NotificationSetting) {
        let alert = AlertNotification::test(self.caps, self.icon.as_deref());
        self.deliver(&alert, settings);
    }

    fn deliver(&self, alert: &AlertNotification, settings: &NotificationSetting) {
        if let Err(e) = self.surface.show(alert) {
            error!("{e}");
        }
        self.audio
            .play(self.resolver.effective_sound(settings), settings.volume);
    }

    /// Wait for queued sounds and stop the audio thread.
    pub fn shutdown(self) {
        self.audio.shutdown();
    }
}

/// One mailbox check. Settings and filters are re-read every cycle so edits
/// apply without a restart. Returns how many alerts went out.
pub fn poll_once<N: NotificationSurface, T: Timelike>(
    source: &mut dyn MailSource,
    repo: &dyn SettingsRepository,
    dispatcher: &AlertDispatcher<N>,
    bypass_time_window: bool,
    now: &T,
) -> usize {
    let new_emails = match source.check_new() {
        Ok(emails) => emails,
        Err(e) => {
            error!("Error checking for new emails: {e}");
            return 0;
        }
    };
    info!("Found {} new emails", new_emails.len());
    if new_emails.is_empty() {
        return 0;
    }

    let settings = repo.load_settings();
    let filters = repo.load_filters();
    if !settings.enable_notifications {
        info!("Notifications are disabled, skipping");
    }

    let alerts = select_alerts(&new_emails, &filters, &settings, now, bypass_time_window);
    for email in &alerts {
        dispatcher.dispatch(email, &settings);
    }
    alerts.len()
}

/// Poll until Ctrl-C. Cycles run back to back on this thread, so a slow
/// check delays the next one instead of overlapping it.
pub fn run_daemon<N: NotificationSurface>(
    source: &mut dyn MailSource,
    repo: &dyn SettingsRepository,
    dispatcher: &AlertDispatcher<N>,
    cfg: DaemonConfig,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r2 = running.clone();
    ctrlc::set_handler(move || {
        r2.store(false, Ordering::SeqCst);
    })?;

    match source.fetch_critical() {
        Ok(emails) => info!("Mailbox holds {} critical emails", emails.len()),
        Err(e) => error!("Error fetching emails: {e}"),
    }

    let interval = Duration::from_secs(cfg.interval_secs.max(1));
    info!("Checking for new emails every {}s", interval.as_secs());

    while running.load(Ordering::SeqCst) {
        poll_once(
            source,
            repo,
            dispatcher,
            cfg.bypass_time_window,
            &Local::now(),
        );

        let started = Instant::now();
        while running.load(Ordering::SeqCst) && started.elapsed() < interval {
            thread::sleep(SLEEP_SLICE);
        }
    }

    info!("Stopping");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::email::Priority;
    use crate::domain::settings::{DEFAULT_SOUND, EmailFilter};
    use crate::platform::Platform;
    use crate::sound::backend::AudioBackend;
    use crate::sound::error::PlaybackError;
    use crate::sound::ladder::PlaybackLadder;
    use crate::store::sqlite::SqliteSoundStore;
    use anyhow::anyhow;
    use chrono::NaiveTime;
    use std::cell::RefCell;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Surface {
        shown: RefCell<Vec<AlertNotification>>,
        fail: bool,
    }

    impl NotificationSurface for &Surface {
        fn show(&self, alert: &AlertNotification) -> Result<()> {
            self.shown.borrow_mut().push(alert.clone());
            if self.fail {
                Err(anyhow!("denied"))
            } else {
                Ok(())
            }
        }
    }

    struct CountingBackend(Arc<Mutex<u32>>);

    impl AudioBackend for CountingBackend {
        fn unlock(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn play_file(&mut self, _p: &Path, _g: f32) -> Result<(), PlaybackError> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
        fn play_bytes(&mut self, _d: Arc<[u8]>, _g: f32) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn play_tone(&mut self, _h: f32, _d: Duration, _g: f32) -> Result<(), PlaybackError> {
            Ok(())
        }
    }

    struct Repo(NotificationSetting, EmailFilter);

    impl SettingsRepository for Repo {
        fn load_settings(&self) -> NotificationSetting {
            self.0.clone()
        }
        fn save_settings(&self, _s: &NotificationSetting) -> Result<()> {
            Ok(())
        }
        fn load_filters(&self) -> EmailFilter {
            self.1.clone()
        }
        fn save_filters(&self, _f: &EmailFilter) -> Result<()> {
            Ok(())
        }
    }

    struct Scripted(Vec<Email>);

    impl MailSource for Scripted {
        fn fetch_critical(&mut self) -> Result<Vec<Email>> {
            Ok(self.0.clone())
        }
        fn check_new(&mut self) -> Result<Vec<Email>> {
            Ok(std::mem::take(&mut self.0))
        }
        fn mark_read(&mut self, _id: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn resolver() -> SoundResolver {
        SoundResolver::new(
            "/srv/sounds",
            DEFAULT_SOUND,
            vec![],
            Arc::new(SqliteSoundStore::open_in_memory().unwrap()),
        )
    }

    fn dispatcher<'a>(surface: &'a Surface, plays: &Arc<Mutex<u32>>) -> AlertDispatcher<&'a Surface> {
        let counter = Arc::clone(plays);
        let audio = AudioHandle::spawn(move || {
            PlaybackLadder::new(
                CountingBackend(counter),
                resolver(),
                Platform::Desktop.capabilities(),
            )
        })
        .unwrap();
        AlertDispatcher::new(surface, audio, resolver(), Platform::Desktop.capabilities(), None)
    }

    fn enabled() -> NotificationSetting {
        NotificationSetting {
            enable_notifications: true,
            start_time: "08:00".into(),
            end_time: "22:00".into(),
            ..NotificationSetting::default()
        }
    }

    #[test]
    fn eligible_email_gets_notification_and_sound() {
        let surface = Surface::default();
        let plays = Arc::new(Mutex::new(0));
        let d = dispatcher(&surface, &plays);
        let mut source = Scripted(vec![
            Email::new("1", "alerts@company.com", "URGENT: outage", Priority::Normal),
            Email::new("2", "alerts@company.com", "Routine update", Priority::Normal),
        ]);
        let repo = Repo(enabled(), EmailFilter::default());
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        assert_eq!(poll_once(&mut source, &repo, &d, false, &noon), 1);
        assert_eq!(poll_once(&mut source, &repo, &d, false, &noon), 0);
        d.shutdown();

        let shown = surface.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].tag.as_deref(), Some("1"));
        assert_eq!(*plays.lock().unwrap(), 1);
    }

    #[test]
    fn failed_notification_still_plays_sound() {
        let surface = Surface {
            fail: true,
            ..Surface::default()
        };
        let plays = Arc::new(Mutex::new(0));
        let d = dispatcher(&surface, &plays);
        d.test_alert(&enabled());
        d.shutdown();
        assert_eq!(*plays.lock().unwrap(), 1);
    }

    #[test]
    fn outside_window_stays_quiet() {
        let surface = Surface::default();
        let plays = Arc::new(Mutex::new(0));
        let d = dispatcher(&surface, &plays);
        let mut source = Scripted(vec![Email::new(
            "1",
            "alerts@company.com",
            "URGENT: outage",
            Priority::High,
        )]);
        let repo = Repo(enabled(), EmailFilter::default());
        let late = NaiveTime::from_hms_opt(23, 0, 0).unwrap();

        assert_eq!(poll_once(&mut source, &repo, &d, false, &late), 0);
        d.shutdown();
        assert!(surface.shown.borrow().is_empty());
        assert_eq!(*plays.lock().unwrap(), 0);
    }
}
