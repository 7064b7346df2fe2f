//! CLI subcommands.

pub mod common;
pub mod impulse;
pub mod presets;
pub mod process;
