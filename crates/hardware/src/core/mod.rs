//! Front-end processor components.
//!
//! This module groups the functional units modelled by the crate.

/// Front-end units (target prediction and instruction prefetch).
pub mod units;
