pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod llm;
pub mod oracle;
pub mod render;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use context::Workshop;
pub use error::{AutopreneurError, CoreResult};
