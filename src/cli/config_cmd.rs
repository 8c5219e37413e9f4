//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key_error(key));
    }

    // advisory_limit must parse as a duration
    if key == "advisory_limit" && value.parse::<Duration>().is_err() {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Invalid duration. Expected e.g. 30s, 5m, 2m30s".to_string(),
        });
    }

    let mut config = store.load().await?;

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "api_base" => config.api_base = Some(value.to_string()),
        "chat_model" => config.chat_model = Some(value.to_string()),
        "transcription_model" => config.transcription_model = Some(value.to_string()),
        "advisory_limit" => config.advisory_limit = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key_error(key));
    }

    let config = store.load().await?;

    let value = match key {
        "api_key" => config.api_key.map(|s| mask_api_key(&s)),
        "api_base" => config.api_base,
        "chat_model" => config.chat_model,
        "transcription_model" => config.transcription_model,
        "advisory_limit" => config.advisory_limit,
        "language" => config.language,
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    let not_set = || "(not set)".to_string();

    presenter.key_value(
        "api_key",
        &config.api_key.map(|s| mask_api_key(&s)).unwrap_or_else(not_set),
    );
    presenter.key_value("api_base", config.api_base.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "chat_model",
        config.chat_model.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "transcription_model",
        config.transcription_model.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "advisory_limit",
        config.advisory_limit.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value("language", config.language.as_deref().unwrap_or("(not set)"));

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn unknown_key_error(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    }
}

/// Mask an API key for display, keeping the first and last few chars
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_short_key() {
        assert_eq!(mask_api_key("short"), "****");
    }

    #[test]
    fn mask_long_key() {
        assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
    }

    #[test]
    fn unknown_key_error_lists_valid_keys() {
        let err = unknown_key_error("bogus");
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("api_key"));
        assert!(msg.contains("advisory_limit"));
    }
}
