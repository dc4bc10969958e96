//! Flowcheck CLI
//!
//! Command-line interface for running end-to-end flow plans and
//! inspecting their results.

pub mod commands;
pub mod config;
pub mod output;
