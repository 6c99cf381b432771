//! Cache Access Types.
//!
//! This module defines the classification of cache accesses reported to the
//! prefetchers. These types are used for the following:
//! 1. **Access Reporting:** Tagging every `cache_operate` event with its origin.
//! 2. **Statistics Tracking:** Categorizing accesses for end-of-run reports.

use serde::{Deserialize, Serialize};

/// Type of cache access that triggered a prefetcher callback.
///
/// The instruction-side prefetchers treat every access the same way, but the
/// type is carried through so hosts can report it and future filters can use it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AccessType {
    /// Demand load (instruction fetch on the instruction side).
    #[default]
    Load,

    /// Read-for-ownership issued ahead of a store.
    Rfo,

    /// Access generated by a prefetcher.
    Prefetch,

    /// Write-back from an upper level.
    Write,

    /// Page-table walk access.
    Translation,
}
