//! Continuation store MCP tools.

pub mod clear;

pub use clear::{ClearContinuationsParams, clear_impl};
