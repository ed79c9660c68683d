//! Subcommand implementations

pub mod serve;
