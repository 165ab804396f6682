//! # switchboard-core
//!
//! Core types, traits, configuration, and error handling for Switchboard.

pub mod config;
pub mod envelope;
pub mod error;
pub mod traits;
