//! Pomato - regular timers and Pomodoro cycles in the terminal
//!
//! - Three preset countdowns (5, 10 and 15 minutes by default)
//! - Pomodoro cycles: 4 × (25 minutes work + 5 minutes break), with a
//!   15 minute long break after the 4th work segment
//! - An alarm that keeps ringing until the next command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};

use pomato::cli::{session, Cli, Commands, Display, SettingsCommand};
use pomato::menubar::MenuAction;
use pomato::settings::SettingsFile;
use pomato::sound::{try_create_player, AlarmPlayer, AlarmSound, SilentAlarmPlayer};
use pomato::types::Settings;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let file = settings_file(cli.settings)?;

    match cli.command {
        Some(Commands::Start(args)) => {
            let settings = file.load().context("設定の読み込みに失敗しました")?;
            let alarm = create_alarm(&settings, args.no_sound);
            session::run(settings, alarm, MenuAction::StartPreset(args.preset_index())).await?;
        }
        Some(Commands::Pomodoro(args)) => {
            let settings = file.load().context("設定の読み込みに失敗しました")?;
            let settings = args.apply(settings);
            let alarm = create_alarm(&settings, args.no_sound);
            session::run(settings, alarm, MenuAction::StartPomodoro).await?;
        }
        Some(Commands::Settings { action }) => {
            execute_settings(&file, action).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Longest a sound preview may play before it is cut off.
const PREVIEW_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes a `settings` subcommand.
async fn execute_settings(file: &SettingsFile, action: SettingsCommand) -> Result<()> {
    match action {
        SettingsCommand::Show => {
            let settings = file.load().context("設定の読み込みに失敗しました")?;
            Display::show_settings(&settings, file.path());
        }
        SettingsCommand::Path => {
            println!("{}", file.path().display());
        }
        SettingsCommand::Reset => {
            file.save(&Settings::default())
                .context("設定の保存に失敗しました")?;
            Display::show_settings_reset(file.path());
        }
        SettingsCommand::Set(args) => {
            if args.is_empty() {
                bail!("変更する設定を指定してください (pomato settings set --help)");
            }
            let settings = file.load().context("設定の読み込みに失敗しました")?;
            let settings = args.apply(settings).map_err(anyhow::Error::msg)?;
            file.save(&settings).context("設定の保存に失敗しました")?;
            Display::show_settings_saved(file.path());
        }
        SettingsCommand::TestSound(args) => {
            let settings = file.load().context("設定の読み込みに失敗しました")?;
            let volume = args.volume_or(&settings);
            let alarm = create_alarm(&settings, false);
            Display::show_test_sound(volume);
            play_test_sound(alarm.as_ref(), volume).await?;
        }
    }
    Ok(())
}

/// Plays the alarm once and waits for it to finish.
async fn play_test_sound(alarm: &dyn AlarmPlayer, volume: u8) -> Result<()> {
    alarm
        .preview(volume)
        .context("テスト音を再生できませんでした")?;

    let finished = tokio::time::timeout(PREVIEW_TIMEOUT, async {
        while alarm.is_playing() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    })
    .await;
    if finished.is_err() {
        tracing::debug!("preview cut off after {:?}", PREVIEW_TIMEOUT);
        alarm.stop();
    }
    Ok(())
}

/// Resolves the settings file from `--settings` or the default location.
fn settings_file(path: Option<PathBuf>) -> Result<SettingsFile> {
    match path {
        Some(path) => Ok(SettingsFile::new(path)),
        None => SettingsFile::at_default_path().context("設定ファイルの場所を決定できません"),
    }
}

/// Creates the alarm player, falling back to silence without an audio device.
fn create_alarm(settings: &Settings, no_sound: bool) -> Box<dyn AlarmPlayer> {
    if no_sound {
        tracing::debug!("alarm disabled by --no-sound");
        return Box::new(SilentAlarmPlayer);
    }

    let sound = AlarmSound::from_setting(settings.alarm_sound.as_deref());
    match try_create_player(sound) {
        Some(player) => Box::new(player),
        None => Box::new(SilentAlarmPlayer),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
