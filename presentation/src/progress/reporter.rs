//! Progress reporting while the opponent is thinking

use colored::Colorize;
use debate_application::{GeneratorError, SessionNotifier};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner while a reply is outstanding, plus retry and clock notices
pub struct ThinkingReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ThinkingReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Print above the spinner if one is running
    fn println(&self, line: String) {
        match self.spinner.lock().ok().and_then(|s| (*s).clone()) {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }
}

impl Default for ThinkingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionNotifier for ThinkingReporter {
    fn on_thinking_start(&self, persona: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(persona.to_string());
        pb.set_message("is thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_thinking_end(&self) {
        if let Some(pb) = self.spinner.lock().ok().and_then(|mut s| s.take()) {
            pb.finish_and_clear();
        }
    }

    fn on_retry(&self, attempt: u32, max_retries: u32, error: &GeneratorError) {
        if let Ok(spinner) = self.spinner.lock()
            && let Some(pb) = spinner.as_ref()
        {
            pb.set_message(format!("is thinking... (retry {}/{})", attempt, max_retries));
        }
        self.println(format!("{} {}", "!".yellow(), error.to_string().dimmed()));
    }

    fn on_time_expired(&self, round: u32) {
        self.println(format!(
            "\n{} Time is up for round {}. Submit your argument or type /end.",
            "⏰".yellow(),
            round
        ));
    }
}

/// Simple text-based notices (no spinner)
pub struct SimpleProgress;

impl SessionNotifier for SimpleProgress {
    fn on_retry(&self, attempt: u32, max_retries: u32, error: &GeneratorError) {
        println!("  {} retry {}/{}: {}", "!".yellow(), attempt, max_retries, error);
    }

    fn on_time_expired(&self, round: u32) {
        println!("\nTime is up for round {}.", round);
    }
}
