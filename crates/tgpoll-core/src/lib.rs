//! # tgpoll-core
//!
//! Core types, traits, configuration, and error handling for the tgpoll client.

pub mod config;
pub mod error;
pub mod traits;
pub mod update;
