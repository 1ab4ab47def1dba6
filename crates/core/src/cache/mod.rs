//! In-process continuation store for paginated documents.
//!
//! Holds converted documents between paginated calls so a later call can
//! resume from a prior offset without re-fetching. It supports:
//!
//! - Collision-resistant opaque keys (SHA-256 over URL, offset, clock, sequence)
//! - Time-based expiry enforced on lookup and by a background sweep
//! - Replace-by-new-key semantics (entries are never mutated in place)

pub mod hash;
pub mod store;
pub mod sweeper;

pub use crate::Error;

pub use store::{ContinuationEntry, ContinuationStore};
pub use sweeper::SweeperHandle;
