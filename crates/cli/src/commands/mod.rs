//! CLI Commands

pub mod init;
pub mod plan;
pub mod render;
pub mod run;
