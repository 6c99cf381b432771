//! Common utilities and types shared by the predictors and prefetchers.
//!
//! This module provides the building blocks used across the crate:
//! 1. **Address Types:** Byte addresses, block numbers and page numbers.
//! 2. **Constants:** Block/page geometry and fixed structural widths.
//! 3. **Cache Access:** Classification of accesses reported to prefetchers.
//! 4. **Error Handling:** Configuration errors raised at construction time.
//! 5. **Counters:** Saturating counter helpers.

/// Byte address, block number and page number types.
pub mod addr;

/// Common constants used throughout the crate.
pub mod constants;

/// Saturating counter helpers.
pub mod counter;

/// Cache access type definitions.
pub mod data;

/// Configuration error type.
pub mod error;

pub use addr::{Address, BlockNumber, PageNumber};
pub use constants::{BLOCK_SIZE, PAGE_SIZE};
pub use data::AccessType;
pub use error::ConfigError;
