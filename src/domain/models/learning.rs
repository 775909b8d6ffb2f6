//! Outcome of a single learning decision.

use std::fmt;

use super::traffic::GhostKey;

/// Why an observed event was not turned into a ghost record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Status absent, null or zero
    MissingStatus,
    /// Status outside the 2xx range
    NonSuccessStatus(i64),
    /// 2xx event without a method or a path to key it by
    MissingRoute,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStatus => write!(f, "missing status"),
            Self::NonSuccessStatus(status) => write!(f, "non-success status {status}"),
            Self::MissingRoute => write!(f, "missing method or path"),
        }
    }
}

/// What `learn` did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnOutcome {
    /// A ghost record was written under `key`
    Learned {
        /// Key the record was written to
        key: GhostKey,
    },
    /// The event did not qualify
    Skipped {
        /// Why it was not learned
        reason: SkipReason,
    },
    /// The event qualified but the store rejected the write
    WriteFailed {
        /// Key the write was attempted for
        key: GhostKey,
    },
}

impl LearnOutcome {
    /// Whether a ghost record was written.
    pub const fn is_learned(&self) -> bool {
        matches!(self, Self::Learned { .. })
    }
}
