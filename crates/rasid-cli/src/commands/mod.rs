//! Subcommands of the rasid CLI.

pub mod batch;
pub mod config;
pub mod generate;
pub mod words;
