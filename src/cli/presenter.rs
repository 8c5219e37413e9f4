//! CLI presenter for output formatting

use std::io::{self, Write};
use std::sync::Mutex;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting.
/// Spinner state lives behind a mutex so status callbacks can update
/// it through a shared reference.
pub struct Presenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        *self.spinner.lock().unwrap() = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = *self.spinner.lock().unwrap() {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, message: &str) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap().take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (the reply the user reads)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (config listing)
    pub fn key_value(&self, key: &str, value: &str) {
        eprintln!("{} = {}", key.cyan(), value);
    }

    /// Print what the transcription heard
    pub fn transcript(&self, text: &str) {
        eprintln!("{} {}", "You said:".dimmed(), text);
    }

    /// Print the supportive reply
    pub fn reply(&self, text: &str) {
        println!("{} {}", "❤".magenta(), text);
    }

    /// Format elapsed recording time as m:ss
    pub fn format_elapsed(&self, elapsed_secs: u32) -> String {
        format!("{}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_elapsed_seconds() {
        let presenter = Presenter::new();
        assert_eq!(presenter.format_elapsed(0), "0:00");
        assert_eq!(presenter.format_elapsed(9), "0:09");
        assert_eq!(presenter.format_elapsed(65), "1:05");
        assert_eq!(presenter.format_elapsed(600), "10:00");
    }

    #[test]
    fn spinner_lifecycle_without_terminal() {
        let presenter = Presenter::new();
        presenter.start_spinner("working");
        presenter.update_spinner("still working");
        presenter.stop_spinner();
        // Stopping twice is safe
        presenter.stop_spinner();
    }
}
