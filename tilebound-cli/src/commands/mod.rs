//! CLI command implementations.

pub mod common;
pub mod config;
pub mod export;
pub mod init;
