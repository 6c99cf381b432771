//! Global Constants.
//!
//! This module defines crate-wide constants. It includes:
//! 1. **Memory Geometry:** Block and page sizes, shifts and masks.
//! 2. **Instruction Geometry:** Alignment shift applied before table indexing.
//! 3. **Predictor Geometry:** Fixed associativity of the target caches.
//! 4. **Throttling:** Occupancy threshold for high-priority prefetch fills.

/// Number of bits to shift to convert between bytes and cache blocks.
pub const LOG2_BLOCK_SIZE: u32 = 6;

/// Cache block size in bytes (64B).
pub const BLOCK_SIZE: u64 = 1 << LOG2_BLOCK_SIZE;

/// Number of bits to shift to convert between bytes and pages.
pub const LOG2_PAGE_SIZE: u32 = 12;

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u64 = 1 << LOG2_PAGE_SIZE;

/// Low instruction-pointer bits dropped before index/tag derivation.
pub const IP_ALIGN_SHIFT: u32 = 2;

/// Candidate destinations held per target-cache entry.
pub const TARGETS_PER_ENTRY: usize = 4;

/// Occupancy ratio below which lookahead prefetches fill this cache level.
pub const LIGHT_LOAD_THRESHOLD: f64 = 0.5;
