//! Tagged Target Cache.
//!
//! The storage shared by every indirect-target predictor in this crate. Each
//! slot holds a tag and a small fixed-size set of candidate destinations, each
//! with a saturating confidence counter and the history fingerprint seen at its
//! last reinforcement. It provides:
//! 1. **Aliasing Detection:** A tag mismatch reallocates the slot and discards every candidate.
//! 2. **Confidence Training:** Matching candidates are reinforced or weakened, never wrapping.
//! 3. **Replacement:** New destinations take the first zero-confidence slot, else the first
//!    minimum-confidence slot.
//! 4. **History Matching:** Scores candidates by confidence and fingerprint agreement.
//!
//! Index derivation is left to the predictor variants; the cache folds any
//! index into its bounds so a caller can never address outside the table.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per lookup/update where W is `TARGETS_PER_ENTRY` (4)
//! - **Space Complexity:** O(T × W) where T is the table size
//! - **Hardware Cost:** Moderate - one tag compare plus a 4-way candidate scan

use tracing::trace;

use super::history::history_mask;
use crate::common::addr::Address;
use crate::common::constants::{IP_ALIGN_SHIFT, TARGETS_PER_ENTRY};
use crate::common::counter::{saturating_dec, saturating_inc};
use crate::stats::{PredictorStats, bump};

/// One candidate destination for a tracked branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetCandidate {
    /// Predicted destination address.
    pub target: Address,
    /// Saturating confidence counter.
    pub confidence: u8,
    /// Global history at the last reinforcement.
    pub history: u64,
}

impl TargetCandidate {
    /// A slot that has never held a destination (or was cleared).
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.target.is_null() && self.confidence == 0
    }
}

/// A target cache slot: tag, validity and candidate set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PredictorEntry {
    /// Tag of the branch owning this slot.
    pub tag: u64,
    /// Whether the slot has been allocated.
    pub valid: bool,
    /// Candidate destinations.
    pub candidates: [TargetCandidate; TARGETS_PER_ENTRY],
}

impl PredictorEntry {
    /// Returns true if the slot is valid and owned by `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Claims the slot for `tag`, discarding every candidate.
    pub fn reallocate(&mut self, tag: u64) {
        self.tag = tag;
        self.valid = true;
        self.candidates = [TargetCandidate::default(); TARGETS_PER_ENTRY];
    }

    /// Finds the non-empty candidate holding `target`.
    pub fn find(&self, target: Address) -> Option<usize> {
        self.candidates
            .iter()
            .position(|c| !c.is_empty() && c.target == target)
    }

    /// Picks the candidate to overwrite with a new destination.
    ///
    /// Prefers the first zero-confidence slot; otherwise the first slot holding
    /// the minimum confidence.
    pub fn replacement_slot(&self) -> usize {
        if let Some(free) = self.candidates.iter().position(|c| c.confidence == 0) {
            return free;
        }
        let mut victim = 0;
        for (i, c) in self.candidates.iter().enumerate() {
            if c.confidence < self.candidates[victim].confidence {
                victim = i;
            }
        }
        victim
    }

    /// Returns true if some candidate's confidence is strictly above `threshold`.
    pub fn any_above(&self, threshold: u8) -> bool {
        self.candidates.iter().any(|c| c.confidence > threshold)
    }

    /// Selects the candidate that best fits the current history.
    ///
    /// Every candidate with non-zero confidence is scored as
    /// `confidence * width + matching_bits`, where `matching_bits` counts the
    /// positions (within `width`) where its fingerprint agrees with `history`.
    /// The highest score wins and ties keep the earliest slot. The winner is
    /// returned only if its confidence is at least `floor`.
    ///
    /// # Arguments
    ///
    /// * `history` - The current global history bits.
    /// * `width` - The history width in bits.
    /// * `floor` - Minimum confidence for the winner to be accepted.
    pub fn best_history_match(&self, history: u64, width: u32, floor: u8) -> Option<usize> {
        let mask = history_mask(width);
        let mut best: Option<(usize, u32)> = None;

        for (i, c) in self.candidates.iter().enumerate() {
            if c.confidence == 0 {
                continue;
            }
            let matching = width - ((c.history ^ history) & mask).count_ones();
            let score = u32::from(c.confidence) * width + matching;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        best.map(|(i, _)| i)
            .filter(|&i| self.candidates[i].confidence >= floor)
    }
}

/// How a resolution trains the candidate it lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Training {
    /// Increment confidence (saturating at the maximum).
    Reinforce,
    /// Decrement confidence (saturating at zero).
    Weaken,
}

/// Direct-mapped table of [`PredictorEntry`] slots.
#[derive(Clone, Debug)]
pub struct TargetCache {
    entries: Vec<PredictorEntry>,
    tag_bits: u32,
    max_confidence: u8,
}

impl TargetCache {
    /// Creates an empty target cache.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of slots (raised to 1 if zero).
    /// * `tag_bits` - Tag width in bits.
    /// * `max_confidence` - Candidate confidence ceiling.
    pub fn new(size: usize, tag_bits: u32, max_confidence: u8) -> Self {
        Self {
            entries: vec![PredictorEntry::default(); size.max(1)],
            tag_bits,
            max_confidence,
        }
    }

    /// Number of slots in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a target cache has at least one slot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidate confidence ceiling.
    pub const fn max_confidence(&self) -> u8 {
        self.max_confidence
    }

    /// Folds an arbitrary index into the table bounds.
    #[inline(always)]
    pub fn slot(&self, index: u64) -> usize {
        (index % self.entries.len() as u64) as usize
    }

    /// Derives the tag for an instruction pointer: the `tag_bits` bits just
    /// above the alignment shift.
    #[inline(always)]
    pub const fn tag_of(&self, ip: Address) -> u64 {
        ip.slice(IP_ALIGN_SHIFT.saturating_add(self.tag_bits), IP_ALIGN_SHIFT)
    }

    /// Returns the slot at `index` if it is valid and owned by `tag`.
    pub fn lookup(&self, index: u64, tag: u64) -> Option<&PredictorEntry> {
        let entry = &self.entries[self.slot(index)];
        entry.matches(tag).then_some(entry)
    }

    /// Trains the slot at `index` with a resolved destination.
    ///
    /// A tag mismatch or invalid slot is reallocated first, discarding all
    /// previous candidates. The matching candidate is then trained; when no
    /// candidate holds `target`, one is installed at confidence 0 in the
    /// replacement slot before training.
    ///
    /// # Arguments
    ///
    /// * `index` - Raw slot index (folded into bounds).
    /// * `tag` - Tag of the resolving branch.
    /// * `target` - Resolved destination.
    /// * `history` - Fingerprint stored on reinforcement and install.
    /// * `training` - Whether confidence rises or falls.
    /// * `stats` - Counters to update.
    pub fn train(
        &mut self,
        index: u64,
        tag: u64,
        target: Address,
        history: u64,
        training: Training,
        stats: &mut PredictorStats,
    ) {
        let slot = self.slot(index);
        let max = self.max_confidence;
        let entry = &mut self.entries[slot];

        if !entry.matches(tag) {
            trace!(slot, tag, prev_tag = entry.tag, "target cache slot reallocated");
            entry.reallocate(tag);
            bump(&mut stats.allocations);
        }

        let way = if let Some(way) = entry.find(target) {
            way
        } else {
            let way = entry.replacement_slot();
            entry.candidates[way] = TargetCandidate {
                target,
                confidence: 0,
                history,
            };
            bump(&mut stats.installs);
            way
        };

        let candidate = &mut entry.candidates[way];
        match training {
            Training::Reinforce => {
                candidate.confidence = saturating_inc(candidate.confidence, max);
                candidate.history = history;
                bump(&mut stats.reinforcements);
            }
            Training::Weaken => {
                candidate.confidence = saturating_dec(candidate.confidence);
                bump(&mut stats.weakenings);
            }
        }
    }

    /// Invalidates every slot.
    pub fn reset(&mut self) {
        self.entries.fill(PredictorEntry::default());
    }
}
