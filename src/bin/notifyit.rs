use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use notifyit::config::{Config, config_dir, load_config, resolve_db_path};
use notifyit::daemon::notifier::Notifier;
use notifyit::daemon::{AlertDispatcher, DaemonConfig, run_daemon};
use notifyit::domain::settings::SoundRef;
use notifyit::mail::{MailSource, MockMailService};
use notifyit::platform::{Capabilities, Platform};
use notifyit::rules::editing::{
    add_sender, add_subject, clamp_volume, normalize_hhmm, remove_sender, remove_subject,
};
use notifyit::sound::backend::RodioBackend;
use notifyit::sound::upload::{delete_custom_sound, process_audio_file, save_custom_sound};
use notifyit::sound::worker::AudioHandle;
use notifyit::sound::{PlaybackContext, PlaybackLadder, SoundResolver};
use notifyit::store::repo::{SettingsRepository, SoundStore};
use notifyit::store::settings_file::JsonSettingsStore;
use notifyit::store::sqlite::SqliteSoundStore;

#[derive(Parser)]
#[command(name = "notifyit")]
#[command(about = "Critical IT alert notifier (daemon + settings)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daemon: poll the mailbox, notify, play alert sounds
    Daemon {
        /// Seconds between checks (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// ios, android, desktop or generic (overrides detection)
        #[arg(long)]
        platform: Option<String>,

        /// Alert outside the active hours too
        #[arg(long)]
        bypass_window: bool,
    },

    /// List the critical emails in the mailbox
    List,

    /// Show a test notification and play the selected sound
    TestAlert {
        #[arg(long)]
        platform: Option<String>,
    },

    /// Notification settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Email filters
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Built-in and custom alert sounds
    Sounds {
        #[command(subcommand)]
        action: SoundAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Enable,
    Disable,
    /// Active hours, HH:MM HH:MM (may wrap past midnight)
    Window { start: String, end: String },
    /// 0-100
    Volume { value: i32 },
    /// Built-in filename or custom:<id>
    Sound { reference: String },
    OverrideSilent {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum FilterAction {
    Show,
    AddSender { sender: String },
    RemoveSender { sender: String },
    AddSubject { keyword: String },
    RemoveSubject { keyword: String },
    HighPriority {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum SoundAction {
    List,
    /// Import an audio file (mp3, wav, ogg, m4a, mp4; max 5MB)
    Add {
        file: PathBuf,
        /// Select it as the alert sound
        #[arg(long)]
        select: bool,
    },
    Remove { id: String },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let repo = JsonSettingsStore::new(config_dir()?);

    match cli.cmd {
        Command::Daemon {
            interval,
            platform,
            bypass_window,
        } => {
            let caps = capabilities(&cfg, platform.as_deref())?;
            let dispatcher = build_dispatcher(&cfg, caps)?;
            let mut source = MockMailService::new(cfg.new_mail_probability, cfg.max_emails);

            let result = run_daemon(
                &mut source,
                &repo,
                &dispatcher,
                DaemonConfig {
                    interval_secs: interval.unwrap_or(cfg.check_interval_secs),
                    bypass_time_window: bypass_window || cfg.bypass_time_window,
                },
            );
            dispatcher.shutdown();
            result
        }

        Command::List => {
            let mut source = MockMailService::new(cfg.new_mail_probability, cfg.max_emails);
            for email in source.fetch_critical()? {
                println!(
                    "{} {:<6} {} {:<24} {}",
                    if email.is_read { " " } else { "*" },
                    format!("{:?}", email.priority).to_lowercase(),
                    email.received.format("%Y-%m-%d %H:%M"),
                    email.from,
                    email.subject
                );
            }
            Ok(())
        }

        Command::TestAlert { platform } => {
            let caps = capabilities(&cfg, platform.as_deref())?;
            let dispatcher = build_dispatcher(&cfg, caps)?;
            dispatcher.test_alert(&repo.load_settings());
            dispatcher.shutdown();
            Ok(())
        }

        Command::Settings { action } => settings_command(&cfg, &repo, action),
        Command::Filters { action } => filters_command(&repo, action),
        Command::Sounds { action } => sounds_command(&cfg, &repo, action),
    }
}

fn capabilities(cfg: &Config, flag: Option<&str>) -> Result<Capabilities> {
    let override_platform = match flag {
        Some(p) => Some(p.parse::<Platform>()?),
        None => cfg.platform,
    };
    let (platform, caps) = Capabilities::resolve(override_platform);
    log::info!("Platform {platform:?}: {caps:?}");
    Ok(caps)
}

fn open_sound_store(cfg: &Config) -> Result<Arc<dyn SoundStore>> {
    let db_path = resolve_db_path(cfg)?;
    Ok(Arc::new(SqliteSoundStore::open(&db_path)?))
}

fn build_resolver(cfg: &Config) -> Result<SoundResolver> {
    Ok(SoundResolver::new(
        cfg.sounds_dir.clone(),
        cfg.default_sound.clone(),
        cfg.builtin_sounds.clone(),
        open_sound_store(cfg)?,
    ))
}

fn build_dispatcher(cfg: &Config, caps: Capabilities) -> Result<AlertDispatcher<Notifier>> {
    let resolver = build_resolver(cfg)?;
    let ladder_resolver = resolver.clone();
    let audio = AudioHandle::spawn(move || {
        let mut context = PlaybackContext::new();
        context.preload_default(&ladder_resolver);
        PlaybackLadder::new(RodioBackend::new(), ladder_resolver, caps).with_context(context)
    })?;
    Ok(AlertDispatcher::new(
        Notifier::new(),
        audio,
        resolver,
        caps,
        cfg.icon.clone(),
    ))
}

fn settings_command(cfg: &Config, repo: &JsonSettingsStore, action: SettingsAction) -> Result<()> {
    let mut settings = repo.load_settings();
    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            return Ok(());
        }
        SettingsAction::Enable => settings.enable_notifications = true,
        SettingsAction::Disable => settings.enable_notifications = false,
        SettingsAction::Window { start, end } => {
            settings.start_time = normalize_hhmm(&start)?;
            settings.end_time = normalize_hhmm(&end)?;
        }
        SettingsAction::Volume { value } => settings.volume = i32::from(clamp_volume(value)),
        SettingsAction::Sound { reference } => {
            let resolver = build_resolver(cfg)?;
            let known = match SoundRef::parse(&reference) {
                SoundRef::Builtin(name) => resolver.is_known_builtin(&name),
                SoundRef::Custom(id) => settings.has_custom_sound(&id),
            };
            if !known {
                return Err(anyhow!("Unknown sound {reference:?}; see `notifyit sounds list`"));
            }
            settings.custom_sound = reference;
        }
        SettingsAction::OverrideSilent { enabled } => settings.override_silent_mode = enabled,
    }
    repo.save_settings(&settings)?;
    println!("Settings saved");
    Ok(())
}

fn filters_command(repo: &JsonSettingsStore, action: FilterAction) -> Result<()> {
    let mut filters = repo.load_filters();
    let changed = match action {
        FilterAction::Show => {
            println!("{}", serde_json::to_string_pretty(&filters)?);
            return Ok(());
        }
        FilterAction::AddSender { sender } => add_sender(&mut filters, &sender),
        FilterAction::RemoveSender { sender } => remove_sender(&mut filters, &sender),
        FilterAction::AddSubject { keyword } => add_subject(&mut filters, &keyword),
        FilterAction::RemoveSubject { keyword } => remove_subject(&mut filters, &keyword),
        FilterAction::HighPriority { enabled } => {
            let changed = filters.high_priority_only != enabled;
            filters.high_priority_only = enabled;
            changed
        }
    };
    if changed {
        repo.save_filters(&filters)?;
        println!("Filters saved");
    } else {
        println!("Nothing changed");
    }
    Ok(())
}

fn sounds_command(cfg: &Config, repo: &JsonSettingsStore, action: SoundAction) -> Result<()> {
    let mut settings = repo.load_settings();
    match action {
        SoundAction::List => {
            let selected = settings.custom_sound.as_str();
            let mut builtins = cfg.builtin_sounds.clone();
            if !builtins.contains(&cfg.default_sound) {
                builtins.insert(0, cfg.default_sound.clone());
            }
            for name in &builtins {
                let mark = if name == selected { "*" } else { " " };
                println!("{mark} {name}");
            }
            for sound in &settings.custom_sounds {
                let reference = SoundRef::custom(sound.id.clone()).to_string();
                let mark = if reference == selected { "*" } else { " " };
                println!("{mark} {reference}  {} ({})", sound.name, sound.filename);
            }
            return Ok(());
        }
        SoundAction::Add { file, select } => {
            let store = open_sound_store(cfg)?;
            let sound = process_audio_file(&file)?;
            save_custom_sound(&mut settings, store.as_ref(), &sound)?;
            if select {
                settings.custom_sound = SoundRef::custom(sound.id.clone()).to_string();
            }
            println!("Added custom sound {} as custom:{}", sound.name, sound.id);
        }
        SoundAction::Remove { id } => {
            let store = open_sound_store(cfg)?;
            let id = id.strip_prefix("custom:").unwrap_or(&id).to_string();
            if delete_custom_sound(&mut settings, store.as_ref(), &id)? {
                println!("Removed custom sound {id}");
            } else {
                println!("No custom sound {id}");
            }
        }
    }
    repo.save_settings(&settings)?;
    Ok(())
}
