//! Core types and shared functionality for webfetch.
//!
//! This crate provides:
//! - In-process continuation store with background expiry
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{ContinuationEntry, ContinuationStore, SweeperHandle};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
