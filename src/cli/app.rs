//! Main app runner for one support exchange

use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::CaptureError;
use crate::application::{
    RecorderCallbacks, RecorderDriver, RecorderOutcome, ReplySource, SupportExchangeUseCase,
};
use crate::domain::config::AppConfig;
use crate::domain::recording::VoiceNote;
use crate::domain::support::SupportPrompt;
use crate::infrastructure::{
    CpalCaptureBackend, OpenAiResponder, RodioPreviewPlayer, XdgConfigStore,
};

use super::args::ExchangeOptions;
use super::presenter::Presenter;
use crate::application::ports::ConfigStore;
use crate::application::respond::ExchangeOutput;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run one support exchange: typed message or recorded voice message.
/// The merged configuration is built once at startup and injected here.
pub async fn run_exchange(options: ExchangeOptions, config: AppConfig) -> ExitCode {
    let presenter = Arc::new(Presenter::new());

    // The API key is required before any recording starts, so a
    // missing key fails fast instead of after the user has spoken.
    let Some(api_key) = config.api_key.clone().filter(|k| !k.is_empty()) else {
        presenter.error(
            "Missing API key. Set OPENAI_API_KEY or run 'haven-chat config set api_key <key>'",
        );
        return ExitCode::from(EXIT_ERROR);
    };

    let responder = OpenAiResponder::new(api_key)
        .with_api_base(config.api_base_or_default())
        .with_chat_model(config.chat_model_or_default())
        .with_transcription_model(config.transcription_model_or_default());

    let language = options.language.clone().or_else(|| config.language.clone());
    let prompt = match language.as_deref() {
        Some(lang) => SupportPrompt::with_language(lang),
        None => SupportPrompt::default(),
    };
    let exchange = SupportExchangeUseCase::new(responder, prompt);

    let output = if let Some(message) = &options.message {
        presenter.start_spinner("Thinking...");
        let output = exchange.respond_to_text(message).await;
        presenter.stop_spinner();
        output
    } else {
        let note = match record_voice_note(&options, Arc::clone(&presenter)).await {
            Ok(Some(note)) => note,
            Ok(None) => {
                // Cancelled: nothing is sent
                return ExitCode::from(EXIT_SUCCESS);
            }
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        };

        presenter.start_spinner("Sending your voice message...");
        let output = exchange.respond_to_voice(&note).await;
        presenter.stop_spinner();
        output
    };

    present_exchange(&presenter, &output);
    ExitCode::from(EXIT_SUCCESS)
}

/// Record a voice message interactively.
/// Returns None when the user cancels.
async fn record_voice_note(
    options: &ExchangeOptions,
    presenter: Arc<Presenter>,
) -> Result<Option<VoiceNote>, CaptureError> {
    let backend = CpalCaptureBackend::new();
    let preview = RodioPreviewPlayer::new();
    let mut driver = RecorderDriver::with_advisory_limit(
        backend,
        preview,
        options.advisory_limit.as_secs() as u32,
    );

    driver.start().await?;

    let commands = driver.commands();
    let ready = Arc::new(AtomicBool::new(false));

    presenter.info("Recording. Enter stops, p pauses, r resumes, c cancels (each followed by Enter).");
    presenter.start_spinner("Recording... 0:00");

    // Map stdin lines to recorder commands. The same keys mean
    // different things once the note is ready for preview/send.
    let stdin_ready = Arc::clone(&ready);
    let stdin_commands = commands.clone();
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let input = line.trim().to_lowercase();
            if stdin_ready.load(Ordering::SeqCst) {
                match input.as_str() {
                    "" => stdin_commands.send_message(),
                    "p" => stdin_commands.toggle_preview(),
                    "c" => stdin_commands.cancel(),
                    _ => {}
                }
            } else {
                match input.as_str() {
                    "" => stdin_commands.stop(),
                    "p" => stdin_commands.pause(),
                    "r" => stdin_commands.resume(),
                    "c" => stdin_commands.cancel(),
                    _ => {}
                }
            }
        }
    });

    let tick_presenter = Arc::clone(&presenter);
    let advisory_presenter = Arc::clone(&presenter);
    let ready_presenter = Arc::clone(&presenter);
    let error_presenter = Arc::clone(&presenter);
    let ready_flag = Arc::clone(&ready);
    let ready_commands = commands.clone();
    let skip_preview = options.skip_preview;

    let callbacks = RecorderCallbacks {
        on_tick: Some(Box::new(move |elapsed| {
            let formatted = tick_presenter.format_elapsed(elapsed);
            tick_presenter.update_spinner(&format!("Recording... {}", formatted));
        })),
        on_advisory: Some(Box::new(move |elapsed| {
            let formatted = advisory_presenter.format_elapsed(elapsed);
            advisory_presenter.warn(&format!(
                "You've been recording for {}. Consider stopping and sending this message.",
                formatted
            ));
        })),
        on_ready: Some(Box::new(move |note| {
            ready_flag.store(true, Ordering::SeqCst);
            ready_presenter.stop_spinner();
            ready_presenter.success(&format!("Recorded ({})", note.human_readable_size()));
            if skip_preview {
                ready_commands.send_message();
            } else {
                ready_presenter
                    .info("Enter sends, p plays/stops the preview, c discards (each followed by Enter).");
            }
        })),
        on_error: Some(Box::new(move |message| {
            error_presenter.warn(message);
        })),
    };

    let outcome = driver.run(callbacks).await;
    stdin_task.abort();
    presenter.stop_spinner();

    match outcome {
        Ok(RecorderOutcome::Sent(note)) => Ok(Some(note)),
        Ok(RecorderOutcome::Cancelled) => {
            presenter.info("Recording discarded. Nothing was sent.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Print the result of an exchange
fn present_exchange(presenter: &Presenter, output: &ExchangeOutput) {
    if let Some(transcript) = &output.transcript {
        presenter.transcript(&transcript.text);
    }

    if output.source == ReplySource::Fallback {
        if let Some(cause) = &output.fallback_cause {
            presenter.warn(&format!(
                "The support assistant is unreachable ({}); showing an offline reply.",
                cause
            ));
        }
    }

    presenter.reply(&output.reply);
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
