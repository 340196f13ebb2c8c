// ABOUTME: Library root for berth: the container tool bridge and state synchronizer.
// ABOUTME: The command-line binary is in main.rs.

pub mod backend;
pub mod config;
pub mod error;
pub mod ipc;
pub mod model;
pub mod output;
pub mod parse;
pub mod sync;
pub mod tool;
pub mod types;
