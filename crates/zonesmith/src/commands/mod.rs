//! Command handlers: bridge CLI args to the generation pipeline.

pub mod config_cmd;
pub mod generate;
