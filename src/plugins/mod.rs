//! Self-contained subcommand groups. Each plugin owns its clap types,
//! its schema, and its run function.

pub mod about;
pub mod observations;
