//! Response generator adapters.
//!
//! - [`GeminiResponseGenerator`] — the Gemini REST API
//! - [`CannedResponseGenerator`] — offline stock replies

mod canned;
mod gemini;

pub use canned::{CANNED_REPLIES, CannedResponseGenerator};
pub use gemini::{GeminiResponseGenerator, GenerationConfig};
