//! Support modules for the `blockade` binary.

pub mod config;
pub mod input;
pub mod report;
