//! Prompt construction for the response generator.

pub mod template;

pub use template::DebatePrompt;
