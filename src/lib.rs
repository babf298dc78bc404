pub mod action;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod inspect;
pub mod job;
pub mod server;
pub mod telemetry;
mod update;

#[cfg(test)]
mod testing;
