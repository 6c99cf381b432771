//! Byte address, cache block, and page number types.
//!
//! This module defines strong types for the three address granularities the
//! predictors and prefetchers work with. It provides the following:
//! 1. **Type Safety:** Keeps byte addresses, block numbers and page numbers apart at compile time.
//! 2. **Address Arithmetic:** Block/page derivation and signed block-granularity distances.
//! 3. **Bit Slicing:** Fixed-width field extraction used for table index and tag derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{LOG2_BLOCK_SIZE, LOG2_PAGE_SIZE};

/// A byte address (instruction pointer, fetch address or branch target).
///
/// The zero address is the "do not track" sentinel throughout the crate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(pub u64);

/// A cache block number (byte address shifted right by the block size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockNumber(pub u64);

/// A page number (byte address shifted right by the page size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PageNumber(pub u64);

impl Address {
    /// The null address; never tracked by any structure.
    pub const NULL: Self = Self(0);

    /// Creates a new address from a raw 64-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 64-bit address value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns true for the zero sentinel.
    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns the cache block containing this address.
    #[inline(always)]
    pub const fn block(self) -> BlockNumber {
        BlockNumber(self.0 >> LOG2_BLOCK_SIZE)
    }

    /// Returns the page containing this address.
    #[inline(always)]
    pub const fn page(self) -> PageNumber {
        PageNumber(self.0 >> LOG2_PAGE_SIZE)
    }

    /// Extracts bits `[lo, hi)` of the address, right-aligned.
    ///
    /// Bounds outside `0..=64` are clamped, and an empty range yields zero.
    ///
    /// # Arguments
    ///
    /// * `hi` - One past the most significant bit of the field.
    /// * `lo` - The least significant bit of the field.
    pub const fn slice(self, hi: u32, lo: u32) -> u64 {
        let hi = if hi > 64 { 64 } else { hi };
        if lo >= hi {
            return 0;
        }
        let width = hi - lo;
        let mask = if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        (self.0 >> lo) & mask
    }

    /// Returns every bit at or above `lo`, right-aligned.
    pub const fn slice_upper(self, lo: u32) -> u64 {
        if lo >= 64 { 0 } else { self.0 >> lo }
    }

    /// Signed distance, in cache blocks, from `other` to `self`.
    pub const fn block_distance(self, other: Self) -> i64 {
        self.block().distance(other.block())
    }

    /// Returns true if both addresses fall in the same cache block.
    #[inline(always)]
    pub const fn same_block(self, other: Self) -> bool {
        self.block().0 == other.block().0
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl BlockNumber {
    /// Creates a block number from a raw value.
    #[inline(always)]
    pub const fn new(block: u64) -> Self {
        Self(block)
    }

    /// Returns the raw block number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns the block-aligned byte address of this block.
    #[inline(always)]
    pub const fn address(self) -> Address {
        Address(self.0 << LOG2_BLOCK_SIZE)
    }

    /// Signed distance, in blocks, from `other` to `self`.
    pub const fn distance(self, other: Self) -> i64 {
        self.0.wrapping_sub(other.0) as i64
    }

    /// Returns the block `delta` blocks away from this one.
    pub const fn offset(self, delta: i64) -> Self {
        Self(self.0.wrapping_add_signed(delta))
    }

    /// Returns the page this block belongs to.
    pub const fn page(self) -> PageNumber {
        PageNumber(self.0 >> (LOG2_PAGE_SIZE - LOG2_BLOCK_SIZE))
    }
}

impl PageNumber {
    /// Returns the raw page number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}
