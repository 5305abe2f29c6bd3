//! Interactive setup: topic, format, persona, review

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use debate_domain::{SessionConfig, SessionConfigurator, SetupStep};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::io;

/// Example propositions offered on the topic step
pub const SUGGESTED_TOPICS: [&str; 4] = [
    "Should artificial intelligence development be regulated?",
    "Is democracy the best form of government?",
    "Should college education be free for all citizens?",
    "Does social media do more harm than good?",
];

/// Walks the configurator through whatever choices are still open
pub struct SetupWizard {
    configurator: SessionConfigurator,
    editor: Reedline,
}

impl SetupWizard {
    pub fn new(configurator: SessionConfigurator) -> Self {
        Self {
            configurator,
            editor: Reedline::create(),
        }
    }

    /// Run until the user confirms the review step
    ///
    /// Returns `Ok(None)` if the user quits with Ctrl-C, Ctrl-D or `q`.
    pub fn run(mut self) -> io::Result<Option<SessionConfig>> {
        loop {
            let step = self.configurator.step();
            println!(
                "\n{} {}",
                format!("Step {}/{}:", step.number(), SetupStep::COUNT).cyan().bold(),
                step.label().bold()
            );

            let done = match step {
                SetupStep::Topic => self.topic_step()?,
                SetupStep::Format => self.format_step()?,
                SetupStep::Persona => self.persona_step()?,
                SetupStep::Review => self.review_step()?,
            };
            match done {
                StepResult::Continue => {}
                StepResult::Quit => return Ok(None),
                StepResult::Done(config) => return Ok(Some(config)),
            }
        }
    }

    fn topic_step(&mut self) -> io::Result<StepResult> {
        println!("Choose a topic or craft your own proposition:");
        for (i, topic) in SUGGESTED_TOPICS.iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).yellow(), topic);
        }
        let Some(line) = self.read("topic")? else {
            return Ok(StepResult::Quit);
        };
        let topic = resolve_topic(&line);
        if !self.configurator.set_topic(topic) {
            println!("{}", "A topic needs some text.".red());
        }
        Ok(StepResult::Continue)
    }

    fn format_step(&mut self) -> io::Result<StepResult> {
        let ids = owned_ids(self.configurator.formats().ids());
        for (i, format) in self.configurator.formats().iter().enumerate() {
            println!(
                "  {} {} ({})\n     {}",
                format!("{}.", i + 1).yellow(),
                format.name.bold(),
                format.summary(),
                format.description.dimmed()
            );
        }
        let Some(line) = self.read("format")? else {
            return Ok(StepResult::Quit);
        };
        match resolve_choice(&line, &ids) {
            Some(id) => {
                if let Err(e) = self.configurator.select_format(id) {
                    println!("{}", e.to_string().red());
                }
            }
            None => println!("{}", format!("Pick 1-{} or a format id.", ids.len()).red()),
        }
        Ok(StepResult::Continue)
    }

    fn persona_step(&mut self) -> io::Result<StepResult> {
        let ids = owned_ids(self.configurator.personas().ids());
        for (i, persona) in self.configurator.personas().iter().enumerate() {
            println!(
                "  {} {} {} ({})\n     {}",
                format!("{}.", i + 1).yellow(),
                persona.symbol,
                persona.display_name.bold(),
                persona.style_descriptor,
                format!("\"{}\"", persona.quote).dimmed()
            );
        }
        let Some(line) = self.read("opponent")? else {
            return Ok(StepResult::Quit);
        };
        match resolve_choice(&line, &ids) {
            Some(id) => {
                if let Err(e) = self.configurator.select_persona(id) {
                    println!("{}", e.to_string().red());
                }
            }
            None => println!("{}", format!("Pick 1-{} or a persona id.", ids.len()).red()),
        }
        Ok(StepResult::Continue)
    }

    fn review_step(&mut self) -> io::Result<StepResult> {
        let config = match self.configurator.finalize() {
            Ok(config) => config,
            Err(e) => {
                println!("{}", e.to_string().red());
                self.configurator.revisit(SetupStep::Topic);
                return Ok(StepResult::Continue);
            }
        };
        print!("{}", ConsoleFormatter::format_setup(&config));
        println!(
            "{}",
            "Press Enter to begin, 1-3 to change a choice, q to quit.".dimmed()
        );

        let Some(line) = self.read("ready")? else {
            return Ok(StepResult::Quit);
        };
        Ok(match line.trim() {
            "" => StepResult::Done(config),
            "q" | "quit" => StepResult::Quit,
            "1" => self.back_to(SetupStep::Topic),
            "2" => self.back_to(SetupStep::Format),
            "3" => self.back_to(SetupStep::Persona),
            other => {
                println!("{}", format!("Unknown choice: {}", other).red());
                StepResult::Continue
            }
        })
    }

    fn back_to(&mut self, step: SetupStep) -> StepResult {
        self.configurator.revisit(step);
        StepResult::Continue
    }

    fn read(&mut self, label: &str) -> io::Result<Option<String>> {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(label.to_string()),
            DefaultPromptSegment::Empty,
        );
        match self.editor.read_line(&prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            _ => Ok(None),
        }
    }
}

enum StepResult {
    Continue,
    Quit,
    Done(SessionConfig),
}

fn owned_ids(ids: Vec<&str>) -> Vec<String> {
    ids.into_iter().map(str::to_string).collect()
}

/// A number picks a suggested topic; anything else is the topic itself
pub fn resolve_topic(input: &str) -> &str {
    let input = input.trim();
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| SUGGESTED_TOPICS.get(i).copied())
        .unwrap_or(input)
}

/// Accept a 1-based number or an id (case-insensitive)
pub fn resolve_choice<'a>(input: &str, ids: &'a [String]) -> Option<&'a str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| ids.get(i)).map(String::as_str);
    }
    ids.iter()
        .find(|id| id.eq_ignore_ascii_case(input))
        .map(String::as_str)
}
