//! Setup wizard

pub mod setup;
