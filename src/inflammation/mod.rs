//! Neutrophil-to-lymphocyte ratio (NLR) classification.
//!
//! The NLR is an inflammation biomarker: the plain quotient of the
//! neutrophil and lymphocyte counts, mapped onto an ordered eight-level
//! risk ladder. Two threshold tables are in clinical circulation; both are
//! kept as versioned [`NlrPolicy`] values so persisted assessments stay
//! comparable under the policy they were scored with.

use crate::core::errors::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered inflammation-risk ladder
///
/// Exactly one level applies to any ratio; boundaries are half-open
/// intervals on the ratio axis, so the level is monotonically
/// non-decreasing in the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Optimal,
    LowInflammation,
    Borderline,
    ModerateInflammation,
    HighInflammation,
    SevereInflammation,
    CriticalInflammation,
    ExtremeRisk,
}

impl RiskLevel {
    /// Every level, mildest first
    pub fn all() -> &'static [RiskLevel] {
        &[
            RiskLevel::Optimal,
            RiskLevel::LowInflammation,
            RiskLevel::Borderline,
            RiskLevel::ModerateInflammation,
            RiskLevel::HighInflammation,
            RiskLevel::SevereInflammation,
            RiskLevel::CriticalInflammation,
            RiskLevel::ExtremeRisk,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Optimal => "optimal",
            RiskLevel::LowInflammation => "low-inflammation",
            RiskLevel::Borderline => "borderline",
            RiskLevel::ModerateInflammation => "moderate-inflammation",
            RiskLevel::HighInflammation => "high-inflammation",
            RiskLevel::SevereInflammation => "severe-inflammation",
            RiskLevel::CriticalInflammation => "critical-inflammation",
            RiskLevel::ExtremeRisk => "extreme-risk",
        }
    }

    /// Clinical wording used by report writers
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Optimal => "Optimal",
            RiskLevel::LowInflammation => "Low inflammation",
            RiskLevel::Borderline => "Borderline",
            RiskLevel::ModerateInflammation => "Moderate inflammation",
            RiskLevel::HighInflammation => "High inflammation",
            RiskLevel::SevereInflammation => "Severe inflammation",
            RiskLevel::CriticalInflammation => "Critical inflammation",
            RiskLevel::ExtremeRisk => "Extreme risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Versioned NLR threshold tables
///
/// The two tables map to the same eight labels but disagree on the
/// boundaries; which one applies is an explicit input, defaulted from
/// configuration rather than baked into the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NlrPolicy {
    /// Canonical ladder: strict upper bounds at 1.5 / 2 / 2.5 / 3 / 4 / 6 / 10
    #[default]
    ClinicalV1,
    /// Wider ladder: optimal below 0.7, inclusive bounds at 2 / 3 / 7 / 11 / 17 / 23
    ClinicalV2,
}

impl NlrPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NlrPolicy::ClinicalV1 => "clinical-v1",
            NlrPolicy::ClinicalV2 => "clinical-v2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "clinical-v1" => Some(NlrPolicy::ClinicalV1),
            "clinical-v2" => Some(NlrPolicy::ClinicalV2),
            _ => None,
        }
    }

    /// Map a ratio onto the ladder under this policy
    pub fn classify_ratio(&self, ratio: f64) -> RiskLevel {
        match self {
            NlrPolicy::ClinicalV1 => classify_v1(ratio),
            NlrPolicy::ClinicalV2 => classify_v2(ratio),
        }
    }
}

impl fmt::Display for NlrPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn classify_v1(ratio: f64) -> RiskLevel {
    if ratio < 1.5 {
        RiskLevel::Optimal
    } else if ratio < 2.0 {
        RiskLevel::LowInflammation
    } else if ratio < 2.5 {
        RiskLevel::Borderline
    } else if ratio < 3.0 {
        RiskLevel::ModerateInflammation
    } else if ratio < 4.0 {
        RiskLevel::HighInflammation
    } else if ratio < 6.0 {
        RiskLevel::SevereInflammation
    } else if ratio < 10.0 {
        RiskLevel::CriticalInflammation
    } else {
        RiskLevel::ExtremeRisk
    }
}

fn classify_v2(ratio: f64) -> RiskLevel {
    if ratio < 0.7 {
        RiskLevel::Optimal
    } else if ratio <= 2.0 {
        RiskLevel::LowInflammation
    } else if ratio <= 3.0 {
        RiskLevel::Borderline
    } else if ratio <= 7.0 {
        RiskLevel::ModerateInflammation
    } else if ratio <= 11.0 {
        RiskLevel::HighInflammation
    } else if ratio <= 17.0 {
        RiskLevel::SevereInflammation
    } else if ratio <= 23.0 {
        RiskLevel::CriticalInflammation
    } else {
        RiskLevel::ExtremeRisk
    }
}

/// One classified NLR measurement
///
/// `ratio` is the exact quotient; writers round for display only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NlrAssessment {
    pub neutrophils: f64,
    pub lymphocytes: f64,
    pub ratio: f64,
    pub policy: NlrPolicy,
    pub risk_level: RiskLevel,
}

/// Classify a neutrophil/lymphocyte pair under the given policy.
///
/// Pure: no side effects, no hidden state, safe to call concurrently.
///
/// # Errors
///
/// - [`ScoreError::InvalidInput`] when either count is negative, NaN, or
///   infinite
/// - [`ScoreError::DivisionByZero`] when the lymphocyte count is zero
pub fn classify_nlr(neutrophils: f64, lymphocytes: f64, policy: NlrPolicy) -> Result<NlrAssessment> {
    validate_count("neutrophils", neutrophils)?;
    validate_count("lymphocytes", lymphocytes)?;

    if lymphocytes == 0.0 {
        return Err(ScoreError::DivisionByZero);
    }

    let ratio = neutrophils / lymphocytes;
    Ok(NlrAssessment {
        neutrophils,
        lymphocytes,
        ratio,
        policy,
        risk_level: policy.classify_ratio(ratio),
    })
}

fn validate_count(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        Err(ScoreError::invalid_input(
            field,
            format!("count must be finite, got {value}"),
        ))
    } else if value < 0.0 {
        Err(ScoreError::invalid_input(
            field,
            format!("count must not be negative, got {value}"),
        ))
    } else {
        Ok(())
    }
}
