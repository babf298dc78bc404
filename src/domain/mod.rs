pub mod github;
pub mod label;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod reconcile;
pub mod report;
pub mod types;
pub mod webhook;
