//! Saturating counter helpers.
//!
//! Confidence and miss counters are plain `u8` fields whose ceiling depends on
//! the owning structure's configuration, so the clamping lives in free
//! functions rather than in a counter type that would carry its own maximum.

/// Increments `value`, clamping at `max`.
#[inline(always)]
pub const fn saturating_inc(value: u8, max: u8) -> u8 {
    if value >= max { max } else { value + 1 }
}

/// Decrements `value`, clamping at zero.
#[inline(always)]
pub const fn saturating_dec(value: u8) -> u8 {
    value.saturating_sub(1)
}
