pub mod action;
pub mod commands;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod grabs;
pub mod headless;
pub mod input;
pub mod ipc;
pub mod launcher;
pub mod policy;
pub mod state;
pub mod toolkit;
pub mod workspace;

pub use errors::{Result, ShellError};
pub use state::Shell;
