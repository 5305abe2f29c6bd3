//! REPL (Read-Eval-Print Loop) for the debate itself

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use debate_application::{RunDebateError, RunDebateUseCase};
use debate_domain::{DebateReport, FailureKind, ReplyOutcome};
use reedline::{
    DefaultPrompt, DefaultPromptSegment, EditCommand, FileBackedHistory, Reedline, Signal,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const HISTORY_SIZE: usize = 500;

/// What the loop should do after handling a line
enum Flow {
    Continue,
    Finish,
}

/// Interactive debate REPL
pub struct DebateRepl {
    use_case: RunDebateUseCase,
    history_file: Option<PathBuf>,
}

impl DebateRepl {
    pub fn new(use_case: RunDebateUseCase) -> Self {
        Self {
            use_case,
            history_file: None,
        }
    }

    /// Keep input history in this file
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the debate until it concludes or the user ends it
    ///
    /// Returns the final report.
    pub async fn run(&self) -> io::Result<DebateReport> {
        let mut editor = self.editor();
        let opponent = self.opponent().await;

        self.print_welcome().await;
        if let Some(greeting) = self.use_case.begin().await {
            println!("{}", ConsoleFormatter::format_turn(&greeting, &opponent));
        }

        loop {
            let prompt = self.prompt().await;
            if let Some(text) = self.unanswered_text().await {
                editor.run_edit_commands(&[EditCommand::InsertString(text)]);
            }
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let flow = if line.starts_with('/') {
                        self.handle_command(line).await
                    } else {
                        self.submit(line, &opponent).await
                    };
                    if let Flow::Finish = flow {
                        break;
                    }
                }
                Signal::CtrlC => {
                    println!("^C (type /end to finish the debate)");
                }
                _ => {
                    self.use_case.end().await;
                    break;
                }
            }
        }

        let report = self.use_case.report().await;
        println!("{}", ConsoleFormatter::format_report(&report));
        Ok(report)
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        match self.history_file.as_deref().and_then(open_history) {
            Some(history) => editor.with_history(Box::new(history)),
            None => editor,
        }
    }

    async fn opponent(&self) -> String {
        let session = self.use_case.session();
        let session = session.lock().await;
        session.config().persona().display_name.clone()
    }

    /// The user's last argument, when a refused reply left it unanswered
    async fn unanswered_text(&self) -> Option<String> {
        let session = self.use_case.session();
        let session = session.lock().await;
        session.unanswered_turn().map(|turn| turn.text.clone())
    }

    async fn prompt(&self) -> DefaultPrompt {
        let session = self.use_case.session();
        let session = session.lock().await;
        let label = format!("round {}/{}", session.current_round(), session.round_count());
        DefaultPrompt::new(
            DefaultPromptSegment::Basic(label),
            DefaultPromptSegment::Empty,
        )
    }

    async fn print_welcome(&self) {
        let session = self.use_case.session();
        let session = session.lock().await;
        let config = session.config();
        println!();
        println!("{}", ConsoleFormatter::header("Debate Practice"));
        println!();
        println!("{} {}", "Topic:".cyan().bold(), config.topic());
        println!(
            "{} {} ({})",
            "Format:".cyan().bold(),
            config.format().name,
            config.format().summary()
        );
        println!(
            "{} {} {}",
            "Opponent:".cyan().bold(),
            config.persona().symbol,
            config.persona().display_name
        );
        println!();
        println!("Commands: /status /retry /end /help");
        println!();
    }

    async fn submit(&self, text: &str, opponent: &str) -> Flow {
        println!();
        let outcome = self.use_case.submit(text).await;
        self.show_outcome(outcome, opponent).await
    }

    async fn show_outcome(
        &self,
        outcome: Result<ReplyOutcome, RunDebateError>,
        opponent: &str,
    ) -> Flow {
        match outcome {
            Ok(ReplyOutcome::Applied { turn, concluded }) => {
                println!("{}", ConsoleFormatter::format_turn(&turn, opponent));
                let session = self.use_case.session();
                let metrics = *session.lock().await.metrics();
                println!("{}\n", ConsoleFormatter::format_metrics(&metrics));
                if concluded {
                    println!("{}", "The debate has concluded.".green().bold());
                    return Flow::Finish;
                }
                Flow::Continue
            }
            Ok(ReplyOutcome::Failed(failure)) => {
                println!("{}", ConsoleFormatter::format_failure(&failure));
                if failure.kind == FailureKind::Credentials {
                    return Flow::Finish;
                }
                Flow::Continue
            }
            Ok(ReplyOutcome::Discarded) => Flow::Continue,
            Err(RunDebateError::Rejected(rejection)) => {
                println!("{}", rejection.to_string().yellow());
                Flow::Continue
            }
        }
    }

    /// Handle slash commands
    async fn handle_command(&self, cmd: &str) -> Flow {
        match cmd {
            "/end" | "/quit" | "/q" => {
                self.use_case.end().await;
                Flow::Finish
            }
            "/retry" | "/r" => {
                let opponent = self.opponent().await;
                let outcome = self.use_case.retry().await;
                self.show_outcome(outcome, &opponent).await
            }
            "/status" | "/s" => {
                let session = self.use_case.session();
                let session = session.lock().await;
                println!("{}", ConsoleFormatter::format_status(&session));
                Flow::Continue
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /status, /s      - Show round, clock and scores");
                println!("  /retry, /r       - Ask again after a service failure");
                println!("  /end, /quit, /q  - End the debate and show the analysis");
                println!("  /help, /h, /?    - Show this help");
                println!();
                Flow::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                Flow::Continue
            }
        }
    }
}

/// Open the argument history, creating its directory as needed
fn open_history(path: &Path) -> Option<FileBackedHistory> {
    match FileBackedHistory::with_file(HISTORY_SIZE, path.to_path_buf()) {
        Ok(history) => Some(history),
        Err(e) => {
            warn!("Could not open history file {}: {}", path.display(), e);
            None
        }
    }
}
