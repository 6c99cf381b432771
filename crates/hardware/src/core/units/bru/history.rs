//! Global History Register.
//!
//! A fixed-width shift register of taken/not-taken outcomes. The newest outcome
//! occupies bit 0; bits shifted past the configured width are discarded.

/// Returns a mask covering the low `width` bits.
#[inline(always)]
pub const fn history_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Global History Register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalHistoryRegister {
    /// Outcome bits, newest in bit 0.
    bits: u64,
    /// Register width in bits (1..=64).
    width: u32,
}

impl GlobalHistoryRegister {
    /// Creates an all-zero register of the given width.
    ///
    /// Widths above 64 are clamped to 64; a width of zero is raised to one.
    pub const fn new(width: u32) -> Self {
        let width = if width == 0 {
            1
        } else if width > 64 {
            64
        } else {
            width
        };
        Self { bits: 0, width }
    }

    /// Shifts in one branch outcome.
    #[inline(always)]
    pub const fn push(&mut self, taken: bool) {
        self.bits = ((self.bits << 1) | taken as u64) & history_mask(self.width);
    }

    /// Returns the current history bits.
    #[inline(always)]
    pub const fn value(&self) -> u64 {
        self.bits
    }

    /// Returns the register width in bits.
    #[inline(always)]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of bit positions where `fingerprint` agrees with the current history.
    ///
    /// This is the width minus the Hamming distance over the register width.
    pub const fn matching_bits(&self, fingerprint: u64) -> u32 {
        let diff = (self.bits ^ fingerprint) & history_mask(self.width);
        self.width - diff.count_ones()
    }

    /// Clears the register back to all zeros.
    pub const fn reset(&mut self) {
        self.bits = 0;
    }
}
