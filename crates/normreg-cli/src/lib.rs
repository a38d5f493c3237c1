//! normreg command-line front end
//!
//! Each subcommand of the `normreg` binary maps to one function in
//! [`commands`] that returns the text to print, so the binary itself only
//! parses arguments and sets up logging.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;

pub use commands::{Identity, Outcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
