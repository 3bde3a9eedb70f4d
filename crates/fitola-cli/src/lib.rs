//! # fitola-cli
//!
//! Command-line interface for the Fitola backend.
//!
//! ## Commands
//!
//! - `fitola serve`: run the HTTP API
//! - `fitola config`: print the resolved configuration
//! - `fitola doctor`: audit the configuration
//! - `fitola version`: show version and build info

pub mod commands;

pub use commands::Cli;
