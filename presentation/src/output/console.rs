//! Console output formatter for debate sessions

use colored::Colorize;
use debate_domain::{
    DebateReport, DebateSession, FailureKind, FormatCatalog, GenerationFailure, PerformanceMetrics,
    PersonaCatalog, SessionConfig, Speaker, Turn,
};

/// Formats turns, status and reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one transcript turn
    pub fn format_turn(turn: &Turn, opponent: &str) -> String {
        let label = match turn.speaker {
            Speaker::Agent => format!("{}:", opponent).yellow().bold(),
            Speaker::User => "You:".green().bold(),
        };
        format!("{}\n{}\n", label, Self::indent(&turn.text, "  "))
    }

    pub fn format_metrics(metrics: &PerformanceMetrics) -> String {
        format!(
            "{} {}  {} {}  {} {}",
            "Logic".dimmed(),
            metrics.logic(),
            "Rhetoric".dimmed(),
            metrics.rhetoric(),
            "Evidence".dimmed(),
            metrics.evidence()
        )
    }

    /// Round, phase, clock and scores
    pub fn format_status(session: &DebateSession) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}/{}  ({})\n",
            "Round:".cyan().bold(),
            session.current_round(),
            session.round_count(),
            session.phase().as_str()
        ));
        if let Some(seconds) = session.remaining_seconds() {
            output.push_str(&format!(
                "{} {}:{:02}\n",
                "Time left:".cyan().bold(),
                seconds / 60,
                seconds % 60
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Scores:".cyan().bold(),
            Self::format_metrics(session.metrics())
        ));
        output
    }

    pub fn format_failure(failure: &GenerationFailure) -> String {
        let next_step = match failure.kind {
            FailureKind::Transient => "Type /retry to ask again, or /end to finish.",
            FailureKind::Credentials => "The debate cannot continue without a valid key.",
            FailureKind::Blocked | FailureKind::Empty => {
                "Your argument was kept. Send it again or rephrase it, or /end to finish."
            }
        };
        format!(
            "{} {}\n  {}\n  {}\n",
            "Reply failed:".red().bold(),
            failure.message,
            failure.hint(),
            next_step.dimmed()
        )
    }

    /// The review step of the setup wizard
    pub fn format_setup(config: &SessionConfig) -> String {
        let persona = config.persona();
        let format = config.format();
        let mut output = String::new();
        output.push_str(&Self::section_header("Review"));
        output.push_str(&format!("{} {}\n", "1. Topic:".cyan().bold(), config.topic()));
        output.push_str(&format!(
            "{} {} ({})\n",
            "2. Format:".cyan().bold(),
            format.name,
            format.summary()
        ));
        output.push_str(&format!(
            "{} {} {}, {}\n",
            "3. Opponent:".cyan().bold(),
            persona.symbol,
            persona.display_name,
            persona.approach
        ));
        output
    }

    /// Everything `--list` shows
    pub fn format_catalogs(formats: &FormatCatalog, personas: &PersonaCatalog) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Formats"));
        for format in formats.iter() {
            output.push_str(&format!(
                "  {:<10} {} ({})\n  {:<10} {}\n",
                format.id.yellow(),
                format.name.bold(),
                format.summary(),
                "",
                format.description.dimmed()
            ));
        }

        output.push_str(&Self::section_header("Personas"));
        for persona in personas.iter() {
            output.push_str(&format!(
                "  {:<12} {} {} ({}: {})\n  {:<12} \"{}\"\n",
                persona.id.yellow(),
                persona.symbol,
                persona.display_name.bold(),
                persona.approach,
                persona.specialty,
                "",
                persona.quote.dimmed()
            ));
        }

        output
    }

    /// End-of-debate analysis
    pub fn format_report(report: &DebateReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Debate Analysis"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), report.topic));
        output.push_str(&format!("{} {}\n", "Against:".cyan().bold(), report.opponent));
        output.push_str(&format!(
            "{} {}/{}\n",
            "Rounds:".cyan().bold(),
            report.rounds_completed,
            report.round_count
        ));
        output.push_str(&format!(
            "\n{} {}%\n",
            "Overall Performance:".bold(),
            report.overall
        ));

        output.push_str(&Self::section_header("Scores"));
        for score in &report.categories {
            output.push_str(&format!(
                "  {:<9} {} {:>3}  {}\n",
                score.category.name(),
                Self::bar(score.score),
                score.score,
                score.category.description().dimmed()
            ));
        }

        let strengths: Vec<_> = report.strengths().collect();
        if !strengths.is_empty() {
            output.push_str(&Self::section_header("Strengths"));
            for point in strengths {
                output.push_str(&format!("  {} {}\n", "+".green(), point.text));
            }
        }

        let weaknesses: Vec<_> = report.weaknesses().collect();
        if !weaknesses.is_empty() {
            output.push_str(&Self::section_header("Areas to Improve"));
            for point in weaknesses {
                output.push_str(&format!("  {} {}\n", "-".red(), point.text));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn bar(score: u8) -> String {
        let filled = usize::from(score) / 5;
        format!("[{}{}]", "#".repeat(filled), " ".repeat(20 - filled))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
