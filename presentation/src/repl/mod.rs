//! Debate REPL

pub mod debate;
