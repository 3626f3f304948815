// src/commands/mod.rs
//! Command handlers for the ern-resolve CLI

mod compat;
mod lockfile;
mod resolve;

pub use compat::cmd_compat;
pub use lockfile::{cmd_orphaned, cmd_why};
pub use resolve::cmd_resolve;
