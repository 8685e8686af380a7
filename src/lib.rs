pub mod chat;
pub mod config;
pub mod error;
pub mod flow;
pub mod llm;
pub mod scan;
pub mod server;
pub mod tabular;

pub use error::{Error, Result};
