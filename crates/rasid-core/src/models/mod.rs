//! Data models for tables, receipts and configuration.

pub mod config;
pub mod receipt;
pub mod table;
