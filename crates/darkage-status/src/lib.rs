//! # DarkAge Status
//!
//! Minecraft server status lookups for DarkAge Bot.
//!
//! Queries the public mcsrvstat.us API and keeps successful answers in a
//! short-lived cache so a burst of `/status`, `/players` and `/version`
//! commands costs a single request.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod fetcher;
pub mod types;

pub use fetcher::*;
pub use types::*;
