//! Core module - configuration and service state
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - shared service handles

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
