//! # DarkAge Bot
//!
//! Discord bot and configuration dashboard for the DarkAge SMP Minecraft community.
//!
//! This is the main binary crate that wires the configuration store, the
//! Poise command framework and the web dashboard together and runs them for
//! the lifetime of the process.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod dashboard;
pub mod error;

pub use bot::*;
pub use error::*;
