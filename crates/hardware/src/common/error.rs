//! Configuration error definitions.
//!
//! Runtime paths in this crate never fail: transient issue failures are retried
//! and capacity exhaustion drops silently. The only fallible step is building a
//! predictor or prefetcher from a configuration, reported through [`ConfigError`].

use thiserror::Error;

/// Reasons a configuration cannot be turned into a working structure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A table, queue or buffer was configured with zero entries.
    #[error("{table} must have at least one entry")]
    ZeroSized {
        /// Name of the offending structure.
        table: &'static str,
    },

    /// A fixed-width field is wider than the 64-bit register holding it.
    #[error("{field} width {width} is outside 1..=64")]
    FieldWidth {
        /// Name of the offending field.
        field: &'static str,
        /// The configured width in bits.
        width: u32,
    },

    /// A confidence threshold that a saturating counter can never reach.
    #[error("confidence threshold {threshold} is unreachable with counter maximum {max}")]
    Threshold {
        /// The configured threshold.
        threshold: u8,
        /// The configured counter maximum.
        max: u8,
    },

    /// A counter maximum of zero leaves no room for confidence.
    #[error("{counter} maximum must be non-zero")]
    ZeroMaximum {
        /// Name of the offending counter.
        counter: &'static str,
    },

    /// The FTQ lookahead window is empty or includes the queue head.
    #[error("lookahead window [{start}, {end}) must be non-empty and start after the FTQ head")]
    LookaheadWindow {
        /// First scanned FTQ offset.
        start: usize,
        /// One past the last scanned FTQ offset.
        end: usize,
    },

    /// The FTQ lookahead window reaches the queue capacity.
    #[error("lookahead window end {end} must be below FTQ capacity {ftq_size}")]
    WindowExceedsFtq {
        /// One past the last scanned FTQ offset.
        end: usize,
        /// FTQ capacity.
        ftq_size: usize,
    },

    /// A prefetch degree of zero would never issue anything.
    #[error("{engine} prefetch degree must be non-zero")]
    ZeroDegree {
        /// Name of the prefetch engine.
        engine: &'static str,
    },

    /// The configuration document could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
