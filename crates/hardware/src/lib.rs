//! Front-end target prediction and instruction prefetch models.
//!
//! This crate implements the instruction-side structures a cycle-level
//! simulator attaches to its front end:
//! 1. **Target prediction:** A tagged target cache with confidence-ranked
//!    candidates, plus indirect-only and history-augmented variants.
//! 2. **Fetch-directed prefetch:** An FTQ-driven engine filtered by recent
//!    evictions, per-set miss pressure and in-flight prefetches.
//! 3. **Stride lookahead:** A per-IP unit-stride detector issuing short bursts.
//! 4. **Configuration and statistics:** Serde-backed configuration with
//!    validation, and end-of-run counters with a text and JSON report.
//!
//! Everything is single-threaded and cycle-stepped. The host simulator drives
//! each structure through the [`BranchPredictor`] and [`Prefetcher`] traits and
//! offers its own services through [`PrefetchHost`].

/// Common types and constants (addresses, counters, access types, errors).
pub mod common;
/// Configuration (defaults, engine selection, per-structure parameters).
pub mod config;
/// Front-end units (target predictors and instruction prefetchers).
pub mod core;
/// End-of-run statistics and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Target predictor lifecycle and its static-dispatch wrapper.
pub use crate::core::units::bru::{BranchPredictor, BranchPredictorWrapper, BranchType};
/// Prefetcher lifecycle, host services and the static-dispatch wrapper.
pub use crate::core::units::prefetch::{
    CacheAccess, CacheFill, PrefetchHost, Prefetcher, PrefetcherWrapper,
};
