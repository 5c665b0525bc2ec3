//! # DarkAge Config
//!
//! Configuration management for DarkAge Bot.
//!
//! The [`ConfigStore`] owns the runtime-tunable JSON document: reads are
//! lock-free dot-path lookups, writes are serialized and persisted with an
//! atomic file replace, and every load fills in keys missing from the
//! built-in defaults. [`Settings`] holds the process-level settings read from
//! the environment at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod error;
pub mod keys;
pub mod loader;
pub mod schema;
pub mod store;
pub mod value;

pub use defaults::*;
pub use error::*;
pub use loader::*;
pub use schema::*;
pub use store::*;
pub use value::*;
