//! # DarkAge Commands
//!
//! Discord command implementations using Poise framework for DarkAge Bot.
//!
//! This crate provides the slash commands, the per-command enable check
//! backed by the configuration store, the member welcome event, and the
//! markdown content files the commands read from.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod content;
pub mod events;
pub mod framework;
pub mod general;
pub mod links;
pub mod minecraft;
pub mod news;
pub mod roster;

pub use content::*;
pub use framework::*;
