//! Biological age estimation from biometric panels.
//!
//! Each supplied measurement is translated independently to a partial age
//! through its reference table; the biological age is the arithmetic mean
//! of the partial ages. The differential against chronological age is then
//! classified into a five-band [`AgeStatus`].

pub mod tables;

use crate::core::errors::{Result, ScoreError};
use crate::core::{Gender, MeasurementKind, TestCategory};
use im::Vector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use self::tables::RangeTables;

/// Where a differential age lands relative to chronological age.
///
/// Bands are closed over the normal zone and open toward the extremes:
/// a differential of exactly -7 is already `Rejuvenated`, exactly +7
/// already `Aged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeStatus {
    Rejuvenated,
    TrendingYounger,
    Normal,
    TrendingOlder,
    Aged,
}

impl AgeStatus {
    /// Classify a differential age (biological minus chronological)
    pub fn from_differential(differential: f64) -> Self {
        if differential <= -7.0 {
            AgeStatus::Rejuvenated
        } else if differential < -2.0 {
            AgeStatus::TrendingYounger
        } else if differential <= 3.0 {
            AgeStatus::Normal
        } else if differential < 7.0 {
            AgeStatus::TrendingOlder
        } else {
            AgeStatus::Aged
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeStatus::Rejuvenated => "rejuvenated",
            AgeStatus::TrendingYounger => "trending-younger",
            AgeStatus::Normal => "normal",
            AgeStatus::TrendingOlder => "trending-older",
            AgeStatus::Aged => "aged",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            AgeStatus::Rejuvenated => "Rejuvenated",
            AgeStatus::TrendingYounger => "Trending younger",
            AgeStatus::Normal => "Normal",
            AgeStatus::TrendingOlder => "Trending older",
            AgeStatus::Aged => "Aged",
        }
    }

    /// True for the bands that warrant clinical attention
    pub fn is_concerning(&self) -> bool {
        matches!(self, AgeStatus::TrendingOlder | AgeStatus::Aged)
    }
}

impl fmt::Display for AgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One submitter's measurements, keyed by kind.
///
/// Omitted kinds are simply absent; they never contribute to the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricPanel {
    pub gender: Gender,
    pub measurements: BTreeMap<MeasurementKind, f64>,
}

impl BiometricPanel {
    pub fn new(gender: Gender) -> Self {
        Self {
            gender,
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_measurement(mut self, kind: MeasurementKind, value: f64) -> Self {
        self.measurements.insert(kind, value);
        self
    }

    pub fn insert(&mut self, kind: MeasurementKind, value: f64) {
        self.measurements.insert(kind, value);
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Measurements restricted to one test category, in kind order
    pub fn in_category(
        &self,
        category: TestCategory,
    ) -> impl Iterator<Item = (MeasurementKind, f64)> + '_ {
        self.measurements
            .iter()
            .filter(move |(kind, _)| kind.category() == category)
            .map(|(kind, value)| (*kind, *value))
    }
}

/// Per-measurement contribution to the biological age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialAge {
    pub kind: MeasurementKind,
    pub value: f64,
    pub years: f64,
}

/// Outcome of one estimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeEstimate {
    pub chronological_age: f64,
    pub biological_age: f64,
    /// biological minus chronological; negative means younger than the calendar
    pub differential_age: f64,
    pub status: AgeStatus,
    pub partial_ages: Vector<PartialAge>,
}

impl AgeEstimate {
    fn from_partials(chronological_age: f64, partial_ages: Vector<PartialAge>) -> Self {
        let sum: f64 = partial_ages.iter().map(|p| p.years).sum();
        let biological_age = sum / partial_ages.len() as f64;
        let differential_age = biological_age - chronological_age;
        Self {
            chronological_age,
            biological_age,
            differential_age,
            status: AgeStatus::from_differential(differential_age),
            partial_ages,
        }
    }
}

/// Estimate biological age from every measurement in the panel.
///
/// # Errors
///
/// - [`ScoreError::InvalidInput`] for a non-finite or negative
///   chronological age or measurement value, or an empty panel.
/// - [`ScoreError::MissingRangeTable`] when a value falls outside every
///   band of its reference table, or the dataset lacks a table for the
///   (kind, gender) pair.
pub fn estimate_age(
    chronological_age: f64,
    panel: &BiometricPanel,
    tables: &RangeTables,
) -> Result<AgeEstimate> {
    validate_chronological_age(chronological_age)?;
    let partials = collect_partials(
        panel.gender,
        panel.measurements.iter().map(|(k, v)| (*k, *v)),
        tables,
    )?;
    Ok(AgeEstimate::from_partials(chronological_age, partials))
}

/// Estimate biological age from the measurements of one test category.
///
/// Errors as [`estimate_age`]; a panel with no measurements in the
/// category is treated as empty.
pub fn estimate_category(
    chronological_age: f64,
    panel: &BiometricPanel,
    category: TestCategory,
    tables: &RangeTables,
) -> Result<AgeEstimate> {
    validate_chronological_age(chronological_age)?;
    let partials = collect_partials(panel.gender, panel.in_category(category), tables)?;
    Ok(AgeEstimate::from_partials(chronological_age, partials))
}

fn collect_partials(
    gender: Gender,
    measurements: impl Iterator<Item = (MeasurementKind, f64)>,
    tables: &RangeTables,
) -> Result<Vector<PartialAge>> {
    let mut partials = Vector::new();
    for (kind, value) in measurements {
        validate_measurement(kind, value)?;
        let years = tables.partial_age(kind, gender, value)?;
        partials.push_back(PartialAge { kind, value, years });
    }

    if partials.is_empty() {
        return Err(ScoreError::invalid_input(
            "panel",
            "no measurements to aggregate",
        ));
    }
    Ok(partials)
}

fn validate_chronological_age(age: f64) -> Result<()> {
    if !age.is_finite() {
        return Err(ScoreError::invalid_input(
            "chronological_age",
            format!("must be finite, got {age}"),
        ));
    }
    if age < 0.0 {
        return Err(ScoreError::invalid_input(
            "chronological_age",
            format!("must be non-negative, got {age}"),
        ));
    }
    Ok(())
}

fn validate_measurement(kind: MeasurementKind, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ScoreError::invalid_input(
            "measurement",
            format!("{kind} must be finite, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(ScoreError::invalid_input(
            "measurement",
            format!("{kind} must be non-negative, got {value}"),
        ));
    }
    Ok(())
}
