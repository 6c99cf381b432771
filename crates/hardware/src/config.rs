//! Configuration system for the predictors and prefetchers.
//!
//! This module defines all configuration structures and enums used to size the
//! prediction structures. It provides:
//! 1. **Defaults:** Baseline table sizes, counter widths and prefetch windows.
//! 2. **Structures:** Hierarchical config for the branch and prefetch sides.
//! 3. **Enums:** Branch predictor and prefetcher selection.
//! 4. **Validation:** Rejects geometries that would index out of bounds or never fire.
//!
//! Configuration is supplied as JSON by the host (`Config::from_json`) or built
//! with `Config::default()`. Every structural capacity is fixed at construction.

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants.
///
/// These values define the baseline geometry when a field is omitted from the
/// JSON document.
mod defaults {
    /// Entries in the tagged target cache (`Bipt`).
    pub const BIPT_TABLE_SIZE: usize = 4096;

    /// Tag width shared by all target-cache variants.
    pub const TAG_BITS: u32 = 12;

    /// Confidence ceiling of the tagged target cache (3-bit counter).
    pub const BIPT_MAX_CONFIDENCE: u8 = 7;

    /// A `Bipt` prediction needs a candidate strictly above this confidence.
    pub const BIPT_PREDICT_THRESHOLD: u8 = 2;

    /// Entries in the indirect target cache (`Indirect`).
    pub const INDIRECT_TABLE_SIZE: usize = 1024;

    /// Confidence ceiling of the indirect target cache (8-bit counter).
    pub const INDIRECT_MAX_CONFIDENCE: u8 = 255;

    /// An `Indirect` prediction needs a candidate strictly above this confidence.
    pub const INDIRECT_PREDICT_THRESHOLD: u8 = 0;

    /// Global history width in bits.
    pub const HISTORY_BITS: u32 = 16;

    /// Entries in the history-augmented indirect predictor (`HistoryIndirect`).
    pub const HISTORY_TABLE_SIZE: usize = 4096;

    /// Confidence ceiling of the history-augmented predictor (2-bit counter).
    pub const HISTORY_MAX_CONFIDENCE: u8 = 3;

    /// Minimum winning confidence for a history-matched prediction.
    pub const HISTORY_CONFIDENCE_FLOOR: u8 = 2;

    /// Fetch Target Queue capacity.
    pub const FTQ_SIZE: usize = 32;

    /// First FTQ offset scanned for prefetch candidates (head excluded).
    pub const FTQ_LOOKAHEAD_START: usize = 1;

    /// One past the last FTQ offset scanned for prefetch candidates.
    pub const FTQ_LOOKAHEAD_END: usize = 8;

    /// Pending prefetch queue capacity.
    pub const PREFETCH_QUEUE_SIZE: usize = 16;

    /// Prefetches drained from the queue per cycle.
    pub const FDIP_DEGREE: usize = 2;

    /// Outstanding prefetch buffer capacity.
    pub const PREFETCH_BUFFER_SIZE: usize = 32;

    /// Sets tracked by the miss tracker.
    pub const MISS_TRACKER_SETS: usize = 64;

    /// Saturation point of a miss counter; a saturated set is "hot".
    pub const MISS_COUNTER_MAX: u8 = 3;

    /// Cycles between bulk resets of the miss counters.
    pub const MISS_RESET_INTERVAL: u64 = 10_000;

    /// Sets in the stride engine's per-IP tracker.
    pub const TRACKER_SETS: usize = 256;

    /// Ways per tracker set.
    pub const TRACKER_WAYS: usize = 4;

    /// Blocks prefetched by one lookahead burst.
    pub const LOOKAHEAD_DEGREE: u32 = 3;
}

/// Branch target predictor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictor {
    /// Tagged, confidence-weighted target cache trained on every branch.
    #[default]
    #[serde(alias = "BIPT")]
    Bipt,
    /// Target cache restricted to indirect branches.
    #[serde(alias = "FDIP")]
    Indirect,
    /// Indirect target cache indexed and matched with global history.
    #[serde(alias = "FIDP")]
    HistoryIndirect,
}

/// Instruction prefetcher selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Prefetcher {
    /// No prefetching.
    None,
    /// Fetch-directed prefetching driven by the Fetch Target Queue.
    #[default]
    #[serde(alias = "FDIP")]
    Fdip,
    /// Per-IP +1 stride detection with a single lookahead burst.
    StrideLookahead,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use fdip_core::config::{BranchPredictor, Config, Prefetcher};
///
/// let json = r#"{
///     "branch": { "predictor": "HistoryIndirect", "history": { "history_bits": 12 } },
///     "prefetch": { "prefetcher": "StrideLookahead", "lookahead": { "degree": 4 } }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.branch.predictor, BranchPredictor::HistoryIndirect);
/// assert_eq!(config.branch.history.history_bits, 12);
/// assert_eq!(config.prefetch.prefetcher, Prefetcher::StrideLookahead);
/// assert_eq!(config.prefetch.lookahead.degree, 4);
/// assert_eq!(config.prefetch.fdip.ftq_size, 32);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Branch target predictor configuration
    #[serde(default)]
    pub branch: BranchConfig,
    /// Instruction prefetcher configuration
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    ///
    /// Omitted sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the relevant
    /// validation error for an unusable geometry.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.branch.validate()?;
        self.prefetch.validate()
    }
}

fn check_non_zero(table: &'static str, size: usize) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroSized { table });
    }
    Ok(())
}

fn check_width(field: &'static str, width: u32) -> Result<(), ConfigError> {
    if width == 0 || width > 64 {
        return Err(ConfigError::FieldWidth { field, width });
    }
    Ok(())
}

fn check_max(counter: &'static str, max: u8) -> Result<(), ConfigError> {
    if max == 0 {
        return Err(ConfigError::ZeroMaximum { counter });
    }
    Ok(())
}

/// Branch side configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchConfig {
    /// Which predictor the wrapper builds
    #[serde(default)]
    pub predictor: BranchPredictor,

    /// Tagged target cache geometry
    #[serde(default)]
    pub bipt: TargetCacheConfig,

    /// Indirect target cache geometry
    #[serde(default)]
    pub indirect: IndirectConfig,

    /// History-augmented indirect predictor geometry
    #[serde(default)]
    pub history: HistoryIndirectConfig,
}

impl BranchConfig {
    /// Validates all three predictor geometries.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bipt.validate()?;
        self.indirect.validate()?;
        self.history.validate()
    }
}

/// Tagged target cache (`Bipt`) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetCacheConfig {
    /// Number of entries (slots)
    #[serde(default = "TargetCacheConfig::default_table_size")]
    pub table_size: usize,

    /// Tag width in bits
    #[serde(default = "TargetCacheConfig::default_tag_bits")]
    pub tag_bits: u32,

    /// Candidate confidence ceiling
    #[serde(default = "TargetCacheConfig::default_max_confidence")]
    pub max_confidence: u8,

    /// Predict when some candidate's confidence exceeds this value
    #[serde(default = "TargetCacheConfig::default_predict_threshold")]
    pub predict_threshold: u8,
}

impl TargetCacheConfig {
    fn default_table_size() -> usize {
        defaults::BIPT_TABLE_SIZE
    }

    fn default_tag_bits() -> u32 {
        defaults::TAG_BITS
    }

    fn default_max_confidence() -> u8 {
        defaults::BIPT_MAX_CONFIDENCE
    }

    fn default_predict_threshold() -> u8 {
        defaults::BIPT_PREDICT_THRESHOLD
    }

    /// Checks the table is non-empty and the threshold is reachable.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("target cache", self.table_size)?;
        check_width("tag", self.tag_bits)?;
        check_max("target confidence", self.max_confidence)?;
        if self.predict_threshold >= self.max_confidence {
            return Err(ConfigError::Threshold {
                threshold: self.predict_threshold,
                max: self.max_confidence,
            });
        }
        Ok(())
    }
}

impl Default for TargetCacheConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::BIPT_TABLE_SIZE,
            tag_bits: defaults::TAG_BITS,
            max_confidence: defaults::BIPT_MAX_CONFIDENCE,
            predict_threshold: defaults::BIPT_PREDICT_THRESHOLD,
        }
    }
}

/// Indirect target cache (`Indirect`) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IndirectConfig {
    /// Number of entries (slots)
    #[serde(default = "IndirectConfig::default_table_size")]
    pub table_size: usize,

    /// Tag width in bits
    #[serde(default = "IndirectConfig::default_tag_bits")]
    pub tag_bits: u32,

    /// Candidate confidence ceiling
    #[serde(default = "IndirectConfig::default_max_confidence")]
    pub max_confidence: u8,

    /// Predict when some candidate's confidence exceeds this value
    #[serde(default = "IndirectConfig::default_predict_threshold")]
    pub predict_threshold: u8,

    /// Global history width recorded into candidate fingerprints
    #[serde(default = "IndirectConfig::default_history_bits")]
    pub history_bits: u32,
}

impl IndirectConfig {
    fn default_table_size() -> usize {
        defaults::INDIRECT_TABLE_SIZE
    }

    fn default_tag_bits() -> u32 {
        defaults::TAG_BITS
    }

    fn default_max_confidence() -> u8 {
        defaults::INDIRECT_MAX_CONFIDENCE
    }

    fn default_predict_threshold() -> u8 {
        defaults::INDIRECT_PREDICT_THRESHOLD
    }

    fn default_history_bits() -> u32 {
        defaults::HISTORY_BITS
    }

    /// Checks the table is non-empty, widths fit and the threshold is reachable.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("indirect target cache", self.table_size)?;
        check_width("tag", self.tag_bits)?;
        check_width("history", self.history_bits)?;
        check_max("target confidence", self.max_confidence)?;
        if self.predict_threshold >= self.max_confidence {
            return Err(ConfigError::Threshold {
                threshold: self.predict_threshold,
                max: self.max_confidence,
            });
        }
        Ok(())
    }
}

impl Default for IndirectConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::INDIRECT_TABLE_SIZE,
            tag_bits: defaults::TAG_BITS,
            max_confidence: defaults::INDIRECT_MAX_CONFIDENCE,
            predict_threshold: defaults::INDIRECT_PREDICT_THRESHOLD,
            history_bits: defaults::HISTORY_BITS,
        }
    }
}

/// History-augmented indirect predictor (`HistoryIndirect`) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryIndirectConfig {
    /// Number of entries (slots)
    #[serde(default = "HistoryIndirectConfig::default_table_size")]
    pub table_size: usize,

    /// Tag width in bits
    #[serde(default = "HistoryIndirectConfig::default_tag_bits")]
    pub tag_bits: u32,

    /// Global history width in bits (also the fingerprint width)
    #[serde(default = "HistoryIndirectConfig::default_history_bits")]
    pub history_bits: u32,

    /// Candidate confidence ceiling
    #[serde(default = "HistoryIndirectConfig::default_max_confidence")]
    pub max_confidence: u8,

    /// Minimum confidence of the winning candidate
    #[serde(default = "HistoryIndirectConfig::default_confidence_floor")]
    pub confidence_floor: u8,
}

impl HistoryIndirectConfig {
    fn default_table_size() -> usize {
        defaults::HISTORY_TABLE_SIZE
    }

    fn default_tag_bits() -> u32 {
        defaults::TAG_BITS
    }

    fn default_history_bits() -> u32 {
        defaults::HISTORY_BITS
    }

    fn default_max_confidence() -> u8 {
        defaults::HISTORY_MAX_CONFIDENCE
    }

    fn default_confidence_floor() -> u8 {
        defaults::HISTORY_CONFIDENCE_FLOOR
    }

    /// Checks the table is non-empty, widths fit and the floor is reachable.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("history target cache", self.table_size)?;
        check_width("tag", self.tag_bits)?;
        check_width("history", self.history_bits)?;
        check_max("target confidence", self.max_confidence)?;
        if self.confidence_floor > self.max_confidence {
            return Err(ConfigError::Threshold {
                threshold: self.confidence_floor,
                max: self.max_confidence,
            });
        }
        Ok(())
    }
}

impl Default for HistoryIndirectConfig {
    fn default() -> Self {
        Self {
            table_size: defaults::HISTORY_TABLE_SIZE,
            tag_bits: defaults::TAG_BITS,
            history_bits: defaults::HISTORY_BITS,
            max_confidence: defaults::HISTORY_MAX_CONFIDENCE,
            confidence_floor: defaults::HISTORY_CONFIDENCE_FLOOR,
        }
    }
}

/// Prefetch side configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefetchConfig {
    /// Which prefetcher the wrapper builds
    #[serde(default)]
    pub prefetcher: Prefetcher,

    /// FTQ-driven engine geometry
    #[serde(default)]
    pub fdip: FdipConfig,

    /// Stride lookahead engine geometry
    #[serde(default)]
    pub lookahead: LookaheadConfig,
}

impl PrefetchConfig {
    /// Validates both engine geometries.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fdip.validate()?;
        self.lookahead.validate()
    }
}

/// FTQ-driven prefetch engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FdipConfig {
    /// Fetch Target Queue capacity
    #[serde(default = "FdipConfig::default_ftq_size")]
    pub ftq_size: usize,

    /// First scanned FTQ offset (must be at least 1)
    #[serde(default = "FdipConfig::default_lookahead_start")]
    pub lookahead_start: usize,

    /// One past the last scanned FTQ offset; also the FTQ retirement threshold
    #[serde(default = "FdipConfig::default_lookahead_end")]
    pub lookahead_end: usize,

    /// Pending prefetch queue capacity
    #[serde(default = "FdipConfig::default_queue_size")]
    pub queue_size: usize,

    /// Prefetches issued per cycle
    #[serde(default = "FdipConfig::default_degree")]
    pub degree: usize,

    /// Outstanding prefetch buffer capacity
    #[serde(default = "FdipConfig::default_buffer_size")]
    pub buffer_size: usize,

    /// Sets tracked by the miss tracker
    #[serde(default = "FdipConfig::default_miss_tracker_sets")]
    pub miss_tracker_sets: usize,

    /// Miss counter saturation point
    #[serde(default = "FdipConfig::default_miss_counter_max")]
    pub miss_counter_max: u8,

    /// Cycles between miss counter resets
    #[serde(default = "FdipConfig::default_miss_reset_interval")]
    pub miss_reset_interval: u64,
}

impl FdipConfig {
    fn default_ftq_size() -> usize {
        defaults::FTQ_SIZE
    }

    fn default_lookahead_start() -> usize {
        defaults::FTQ_LOOKAHEAD_START
    }

    fn default_lookahead_end() -> usize {
        defaults::FTQ_LOOKAHEAD_END
    }

    fn default_queue_size() -> usize {
        defaults::PREFETCH_QUEUE_SIZE
    }

    fn default_degree() -> usize {
        defaults::FDIP_DEGREE
    }

    fn default_buffer_size() -> usize {
        defaults::PREFETCH_BUFFER_SIZE
    }

    fn default_miss_tracker_sets() -> usize {
        defaults::MISS_TRACKER_SETS
    }

    fn default_miss_counter_max() -> u8 {
        defaults::MISS_COUNTER_MAX
    }

    fn default_miss_reset_interval() -> u64 {
        defaults::MISS_RESET_INTERVAL
    }

    /// Checks capacities are non-zero and the lookahead window ends inside the FTQ.
    ///
    /// The head retires only once the queue grows past the window end, so the
    /// end must be below the FTQ capacity.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("FTQ", self.ftq_size)?;
        check_non_zero("prefetch queue", self.queue_size)?;
        check_non_zero("prefetch buffer", self.buffer_size)?;
        check_non_zero("miss tracker", self.miss_tracker_sets)?;
        check_max("miss counter", self.miss_counter_max)?;
        if self.degree == 0 {
            return Err(ConfigError::ZeroDegree { engine: "FDIP" });
        }
        if self.lookahead_start == 0 || self.lookahead_start >= self.lookahead_end {
            return Err(ConfigError::LookaheadWindow {
                start: self.lookahead_start,
                end: self.lookahead_end,
            });
        }
        if self.lookahead_end >= self.ftq_size {
            return Err(ConfigError::WindowExceedsFtq {
                end: self.lookahead_end,
                ftq_size: self.ftq_size,
            });
        }
        Ok(())
    }
}

impl Default for FdipConfig {
    fn default() -> Self {
        Self {
            ftq_size: defaults::FTQ_SIZE,
            lookahead_start: defaults::FTQ_LOOKAHEAD_START,
            lookahead_end: defaults::FTQ_LOOKAHEAD_END,
            queue_size: defaults::PREFETCH_QUEUE_SIZE,
            degree: defaults::FDIP_DEGREE,
            buffer_size: defaults::PREFETCH_BUFFER_SIZE,
            miss_tracker_sets: defaults::MISS_TRACKER_SETS,
            miss_counter_max: defaults::MISS_COUNTER_MAX,
            miss_reset_interval: defaults::MISS_RESET_INTERVAL,
        }
    }
}

/// Stride lookahead engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LookaheadConfig {
    /// Tracker sets
    #[serde(default = "LookaheadConfig::default_tracker_sets")]
    pub tracker_sets: usize,

    /// Tracker ways per set
    #[serde(default = "LookaheadConfig::default_tracker_ways")]
    pub tracker_ways: usize,

    /// Blocks prefetched by one burst
    #[serde(default = "LookaheadConfig::default_degree")]
    pub degree: u32,
}

impl LookaheadConfig {
    fn default_tracker_sets() -> usize {
        defaults::TRACKER_SETS
    }

    fn default_tracker_ways() -> usize {
        defaults::TRACKER_WAYS
    }

    fn default_degree() -> u32 {
        defaults::LOOKAHEAD_DEGREE
    }

    /// Checks the tracker is non-empty and bursts have a non-zero degree.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_zero("tracker sets", self.tracker_sets)?;
        check_non_zero("tracker ways", self.tracker_ways)?;
        if self.degree == 0 {
            return Err(ConfigError::ZeroDegree {
                engine: "stride lookahead",
            });
        }
        Ok(())
    }
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self {
            tracker_sets: defaults::TRACKER_SETS,
            tracker_ways: defaults::TRACKER_WAYS,
            degree: defaults::LOOKAHEAD_DEGREE,
        }
    }
}
