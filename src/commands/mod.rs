//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `cascade-config` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The `config` subcommands share [`options::ConfigOptions`], which turns the
//! common resolution flags into a call to the `cascade_config` library.

pub mod completions;
pub mod get;
pub mod log;
pub mod options;
pub mod sources;
pub mod view;
