//! Core domain + application logic for the Champolis community bot.
//!
//! This crate is intentionally framework-agnostic. Discord lives behind the
//! `ForumPlatform` port (trait) implemented in the adapter crate.

pub mod attacks;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forum_sync;
pub mod logging;
pub mod ports;
pub mod replies;
pub mod security;

pub use errors::{Error, Result};
