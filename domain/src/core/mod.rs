//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`] — a validated debate proposition
//! - [`error::DomainError`] — configuration errors

pub mod error;
pub mod topic;
