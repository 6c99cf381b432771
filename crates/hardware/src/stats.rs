//! End-of-run statistics for predictors and prefetchers.
//!
//! This module tracks the counters each structure exposes through its
//! `final_stats` callback. It provides:
//! 1. **Predictor training:** Updates, tag (re)allocations, candidate installs and reinforcements.
//! 2. **Prefetch issue:** Issued, useful, filtered and failed prefetches.
//! 3. **Engine events:** Miss-tracker epoch resets and lookahead burst lifecycle.
//!
//! Statistics are a pure report: nothing in the prediction logic reads them back.
//! All counters saturate rather than wrap.

use serde::Serialize;

/// Training statistics for a target-cache predictor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PredictorStats {
    /// Branch resolutions that trained the target cache.
    pub updates: u64,
    /// Branch resolutions skipped because of their class or a null target.
    pub ignored: u64,
    /// Slots (re)allocated on an invalid slot or tag mismatch.
    pub allocations: u64,
    /// New candidate destinations installed into an entry.
    pub installs: u64,
    /// Candidate confidence increments (saturated increments included).
    pub reinforcements: u64,
    /// Candidate confidence decrements on not-taken resolutions.
    pub weakenings: u64,
}

/// Issue statistics for an instruction prefetcher.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrefetchStats {
    /// Prefetches accepted by the host issue primitive.
    pub issued: u64,
    /// Demand hits on blocks brought in by a prefetch.
    pub useful: u64,
    /// Candidates dropped because an identical prefetch was outstanding.
    pub filtered: u64,
    /// Issue attempts refused by the host (retried on a later cycle).
    pub issue_failures: u64,
    /// Miss tracker epoch resets.
    pub miss_resets: u64,
    /// Lookahead bursts armed.
    pub bursts_armed: u64,
    /// Lookahead bursts terminated at a page boundary.
    pub bursts_page_cross: u64,
}

/// Adds one to a statistics counter without wrapping.
#[inline(always)]
pub(crate) fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

impl PredictorStats {
    /// Serializes the counters to a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the counters to stdout under the given heading.
    pub fn print(&self, name: &str) {
        println!("\n==========================================================");
        println!("{name} PREDICTOR STATISTICS");
        println!("==========================================================");
        println!("bp.updates               {}", self.updates);
        println!("bp.ignored               {}", self.ignored);
        println!("bp.allocations           {}", self.allocations);
        println!("bp.installs              {}", self.installs);
        println!("bp.reinforcements        {}", self.reinforcements);
        println!("bp.weakenings            {}", self.weakenings);
        println!("==========================================================");
    }
}

impl PrefetchStats {
    /// Fraction of issued prefetches that later served a demand hit.
    ///
    /// Returns `None` until at least one prefetch has been issued.
    pub fn accuracy(&self) -> Option<f64> {
        if self.issued == 0 {
            None
        } else {
            Some(self.useful as f64 / self.issued as f64)
        }
    }

    /// Serializes the counters to a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the counters to stdout under the given heading.
    pub fn print(&self, name: &str) {
        println!("\n==========================================================");
        println!("{name} PREFETCHER STATISTICS");
        println!("==========================================================");
        println!("pf.issued                {}", self.issued);
        println!("pf.useful                {}", self.useful);
        println!("pf.filtered              {}", self.filtered);
        println!("pf.issue_failures        {}", self.issue_failures);
        if let Some(acc) = self.accuracy() {
            println!("pf.accuracy              {:.2}%", acc * 100.0);
        }
        println!("----------------------------------------------------------");
        println!("pf.miss_resets           {}", self.miss_resets);
        println!("pf.bursts_armed          {}", self.bursts_armed);
        println!("pf.bursts_page_cross     {}", self.bursts_page_cross);
        println!("==========================================================");
    }
}
