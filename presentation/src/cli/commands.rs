//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for debate-practice
#[derive(Parser, Debug)]
#[command(name = "debate-practice")]
#[command(author, version, about = "Practice debating against an in-character AI opponent")]
#[command(long_about = r#"
Debate Practice pits you against a historical persona on a topic of your choice.

Setup has three steps:
1. Topic:   any proposition you want to argue
2. Format:  how many rounds, and whether rounds are timed
3. Persona: who argues against you (Socrates, Sun Tzu, ...)

Anything not given on the command line is asked for interactively.

Configuration files are loaded from (in priority order):
1. DEBATE_* environment variables
2. --config <path>     Explicit config file
3. ./debate.toml       Project-level config
4. ~/.config/debate-practice/config.toml   Global config

Example:
  debate-practice --topic "Is democracy the best form of government?" --format rapid --persona sunTzu
  debate-practice --resume
  debate-practice --offline --seed 7
"#)]
pub struct Cli {
    /// Debate topic (proposition)
    #[arg(short, long, value_name = "TEXT")]
    pub topic: Option<String>,

    /// Debate format id (see --list)
    #[arg(short, long, value_name = "ID")]
    pub format: Option<String>,

    /// Opponent persona id (see --list)
    #[arg(short, long, value_name = "ID")]
    pub persona: Option<String>,

    /// Start from the last saved setup
    #[arg(short, long)]
    pub resume: bool,

    /// List formats and personas and exit
    #[arg(long)]
    pub list: bool,

    /// Use canned replies instead of the Gemini API
    #[arg(long)]
    pub offline: bool,

    /// Seed for reproducible scoring and offline replies
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Whether every setup choice came from flags
    pub fn has_full_setup(&self) -> bool {
        self.topic.is_some() && self.format.is_some() && self.persona.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_setup() {
        let cli = Cli::parse_from([
            "debate-practice",
            "--topic",
            "Is democracy the best form of government?",
            "--format",
            "rapid",
            "--persona",
            "sunTzu",
            "-vv",
        ]);
        assert!(cli.has_full_setup());
        assert_eq!(cli.format.as_deref(), Some("rapid"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.offline);
    }

    #[test]
    fn test_parse_offline_seeded() {
        let cli = Cli::parse_from(["debate-practice", "--offline", "--seed", "7", "--resume"]);
        assert!(cli.offline);
        assert!(cli.resume);
        assert_eq!(cli.seed, Some(7));
        assert!(!cli.has_full_setup());
    }
}
