// ============================================================
// Layer 3 — Leave-One-Out Plans
// ============================================================
// A MergePlan says, for one fold, which source is held out
// as the test set and which sources are pooled into training.
//
// For N sources exactly N plans exist. Plan k holds out the
// source chosen by the Rotation:
//
//   Descending (default):  k → N-1-k   (plan 0 tests the last source)
//   Ascending:             k → k
//
// Either way every source is held out exactly once and pooled
// in the other N-1 plans. Nothing here touches the file system.

use serde::{Deserialize, Serialize};

use crate::domain::sink::MergeStats;

/// The part a source plays within one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Merged into the training sink under the header-dedup rule
    Pooled,
    /// Copied verbatim into the test sink
    HeldOut,
}

/// Order in which sources take their turn as the test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Descending,
    Ascending,
}

impl Rotation {
    /// Map a plan index to the index of the source it holds out.
    /// Returns None when `plan_index` is outside `0..source_count`.
    pub fn held_out_index(self, plan_index: usize, source_count: usize) -> Option<usize> {
        if plan_index >= source_count {
            return None;
        }
        match self {
            Rotation::Descending => Some(source_count - 1 - plan_index),
            Rotation::Ascending  => Some(plan_index),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rotation::Descending => write!(f, "descending"),
            Rotation::Ascending  => write!(f, "ascending"),
        }
    }
}

/// One fold: every source index paired with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    index:        usize,
    held_out:     usize,
    source_count: usize,
}

impl MergePlan {
    pub fn new(index: usize, held_out: usize, source_count: usize) -> Self {
        debug_assert!(held_out < source_count);
        Self { index, held_out, source_count }
    }

    /// Position of this plan in the sequence (names Train{k}/Test{k})
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the held-out source
    pub fn held_out(&self) -> usize {
        self.held_out
    }

    /// Number of sources this plan assigns a role to
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    pub fn role_of(&self, source_index: usize) -> Role {
        if source_index == self.held_out {
            Role::HeldOut
        } else {
            Role::Pooled
        }
    }

    /// (source index, role) for every source, in input order
    pub fn assignments(&self) -> impl Iterator<Item = (usize, Role)> + '_ {
        (0..self.source_count).map(move |i| (i, self.role_of(i)))
    }

    /// Indices of the pooled sources, in input order
    pub fn pooled(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.source_count).filter(move |&i| i != self.held_out)
    }
}

/// What executing one plan produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub index:    usize,
    pub held_out: String,
    pub train:    MergeStats,
    pub test:     MergeStats,
}
