//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`availability`] - Live availability for one car park
//! - [`bookmarks`] - Bookmark management (list, toggle)
//! - [`config`] - Configuration management (path, show, init)
//! - [`search`] - One-shot nearby search
//! - [`watch`] - Interactive live search driven from stdin

pub mod availability;
pub mod bookmarks;
pub mod common;
pub mod config;
pub mod search;
pub mod watch;
