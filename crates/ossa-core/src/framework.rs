//! # Compliance Framework Identifiers
//!
//! The closed set of frameworks the engine ships evaluators for. Dispatch
//! matches exhaustively on [`FrameworkId`]; adding a variant forces every
//! evaluator table to be updated at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFramework;
use crate::scoring::StagePolicy;

/// A built-in compliance framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrameworkId {
    /// ISO/IEC 42001:2023, AI management systems.
    #[serde(rename = "ISO_42001_2023")]
    Iso42001,
    /// NIST AI Risk Management Framework 1.0.
    #[serde(rename = "NIST_AI_RMF_1_0")]
    NistAiRmf,
    /// Regulation (EU) 2024/1689, the EU AI Act.
    #[serde(rename = "EU_AI_ACT")]
    EuAiAct,
    /// Regulation (EU) 2016/679, GDPR.
    #[serde(rename = "GDPR")]
    Gdpr,
}

impl FrameworkId {
    pub const COUNT: usize = 4;

    pub fn all() -> &'static [FrameworkId] {
        &[Self::Iso42001, Self::NistAiRmf, Self::EuAiAct, Self::Gdpr]
    }

    /// Canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iso42001 => "ISO_42001_2023",
            Self::NistAiRmf => "NIST_AI_RMF_1_0",
            Self::EuAiAct => "EU_AI_ACT",
            Self::Gdpr => "GDPR",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Iso42001 => "ISO/IEC 42001:2023",
            Self::NistAiRmf => "NIST AI RMF 1.0",
            Self::EuAiAct => "EU AI Act",
            Self::Gdpr => "GDPR",
        }
    }

    /// Scoring weights and validity threshold for this framework's stage.
    pub fn policy(&self) -> StagePolicy {
        match self {
            Self::Iso42001 => StagePolicy::new(15, 5, 70),
            Self::NistAiRmf => StagePolicy::new(15, 5, 70),
            Self::EuAiAct => StagePolicy::new(20, 5, 80),
            Self::Gdpr => StagePolicy::new(20, 5, 75),
        }
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkId {
    type Err = UnknownFramework;

    /// Accepts canonical identifiers and common aliases, ignoring case and
    /// treating `-`, `.`, `/`, `:` and spaces as `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '.' | '/' | ':' | ' ' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "ISO_42001_2023" | "ISO_42001" | "ISO_IEC_42001" | "ISO_IEC_42001_2023" => {
                Ok(Self::Iso42001)
            }
            "NIST_AI_RMF_1_0" | "NIST_AI_RMF" | "NIST_AI_RMF_1" => Ok(Self::NistAiRmf),
            "EU_AI_ACT" | "EU_AI_ACT_2024" => Ok(Self::EuAiAct),
            "GDPR" | "EU_GDPR" => Ok(Self::Gdpr),
            _ => Err(UnknownFramework(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids_round_trip() {
        for id in FrameworkId::all() {
            assert_eq!(id.as_str().parse::<FrameworkId>().unwrap(), *id);
        }
        assert_eq!(FrameworkId::all().len(), FrameworkId::COUNT);
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!("ISO_42001".parse::<FrameworkId>().unwrap(), FrameworkId::Iso42001);
        assert_eq!("iso-42001:2023".parse::<FrameworkId>().unwrap(), FrameworkId::Iso42001);
        assert_eq!("NIST_AI_RMF".parse::<FrameworkId>().unwrap(), FrameworkId::NistAiRmf);
        assert_eq!("nist-ai-rmf-1.0".parse::<FrameworkId>().unwrap(), FrameworkId::NistAiRmf);
        assert_eq!("EU_AI_Act".parse::<FrameworkId>().unwrap(), FrameworkId::EuAiAct);
        assert_eq!("gdpr".parse::<FrameworkId>().unwrap(), FrameworkId::Gdpr);
    }

    #[test]
    fn unknown_keeps_original_text() {
        let err = "NOT_REAL".parse::<FrameworkId>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported framework: NOT_REAL");
        let err = "not real".parse::<FrameworkId>().unwrap_err();
        assert_eq!(err.0, "not real");
    }

    #[test]
    fn eu_ai_act_threshold_is_stricter() {
        assert_eq!(FrameworkId::EuAiAct.policy().threshold, 80);
        assert_eq!(FrameworkId::Gdpr.policy().threshold, 75);
        assert_eq!(FrameworkId::Iso42001.policy().weights.error_weight, 15);
    }

    #[test]
    fn serde_uses_canonical_ids() {
        let json = serde_json::to_string(&FrameworkId::NistAiRmf).unwrap();
        assert_eq!(json, "\"NIST_AI_RMF_1_0\"");
    }
}
