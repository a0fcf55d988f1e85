//! Configuration management for reachping.
//!
//! Provides XDG-compliant storage for command-line defaults.

mod settings;

pub use settings::{AppSettings, Paths};
