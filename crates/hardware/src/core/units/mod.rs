//! Front-end functional units.
//!
//! This module contains the branch target prediction unit and the
//! instruction prefetchers that run ahead of fetch.

/// Branch target prediction unit (tagged target caches and global history).
pub mod bru;

/// Instruction prefetchers (fetch-directed and stride lookahead).
pub mod prefetch;
