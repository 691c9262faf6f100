//! # Certification Tiers
//!
//! Maps the global issue counts of a run onto a five-step ladder. Tiers are
//! checked from the top; the first gate whose limits are all satisfied wins.
//!
//! | Tier     | max errors | max warnings | min passed |
//! |----------|-----------:|-------------:|-----------:|
//! | platinum | 0          | 0            | 10         |
//! | gold     | 0          | 2            | 8          |
//! | silver   | 0          | 5            | 6          |
//! | bronze   | 2          | 8            | 4          |

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Certification tier, totally ordered from `None` to `Platinum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationLevel {
    None,
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl CertificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    /// The tier directly above this one, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::None => Some(Self::Bronze),
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }

    /// The gate for this tier. `None` has no gate.
    pub fn gate(&self) -> Option<TierGate> {
        TIERS.iter().find(|gate| gate.level == *self).copied()
    }
}

impl fmt::Display for CertificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error, warning and passed totals of a run (or of one stage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub errors: usize,
    pub warnings: usize,
    pub passed: usize,
}

impl Add for IssueCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            errors: self.errors + rhs.errors,
            warnings: self.warnings + rhs.warnings,
            passed: self.passed + rhs.passed,
        }
    }
}

impl std::iter::Sum for IssueCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Limits a run must satisfy to reach `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierGate {
    pub level: CertificationLevel,
    pub max_errors: usize,
    pub max_warnings: usize,
    pub min_passed: usize,
}

impl TierGate {
    pub fn admits(&self, counts: IssueCounts) -> bool {
        counts.errors <= self.max_errors
            && counts.warnings <= self.max_warnings
            && counts.passed >= self.min_passed
    }
}

/// Gates from highest to lowest tier.
pub const TIERS: [TierGate; 4] = [
    TierGate {
        level: CertificationLevel::Platinum,
        max_errors: 0,
        max_warnings: 0,
        min_passed: 10,
    },
    TierGate {
        level: CertificationLevel::Gold,
        max_errors: 0,
        max_warnings: 2,
        min_passed: 8,
    },
    TierGate {
        level: CertificationLevel::Silver,
        max_errors: 0,
        max_warnings: 5,
        min_passed: 6,
    },
    TierGate {
        level: CertificationLevel::Bronze,
        max_errors: 2,
        max_warnings: 8,
        min_passed: 4,
    },
];

/// Highest tier whose gate admits `counts`.
pub fn determine(counts: IssueCounts) -> CertificationLevel {
    TIERS
        .iter()
        .find(|gate| gate.admits(counts))
        .map(|gate| gate.level)
        .unwrap_or(CertificationLevel::None)
}
