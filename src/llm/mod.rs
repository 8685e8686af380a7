mod answer;
mod client;
mod prompt;
mod types;

pub use answer::normalize_answer;
pub use client::{GeminiClient, LlmClient};
pub use prompt::{SYSTEM_PROMPT, response_schema};
pub use types::*;
