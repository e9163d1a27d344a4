//! Reference range tables mapping raw measurements to partial ages.
//!
//! A dataset holds one table per (measurement kind, gender scope). Each
//! table is a list of bands: half-open value windows `[value_min,
//! value_max)` paired with the age bracket a value in that window implies.
//! The `inverse` flag marks tables where a higher raw value implies a
//! *younger* age (vital capacity, HDL, telomere length, ...).
//!
//! Datasets are resolved and validated once at load time; a measurement
//! that no band covers surfaces [`ScoreError::MissingRangeTable`] at
//! scoring time instead of being clamped to the nearest bracket.

use crate::core::errors::{Result, ScoreError};
use crate::core::{Gender, MeasurementKind};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// One value window and the age bracket it implies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceBand {
    pub value_min: f64,
    pub value_max: f64,
    pub age_min: u32,
    pub age_max: u32,
}

impl ReferenceBand {
    /// Half-open containment on the value axis
    pub fn contains(&self, value: f64) -> bool {
        self.value_min <= value && value < self.value_max
    }

    /// Midpoint of the implied age bracket
    pub fn partial_age(&self) -> f64 {
        (self.age_min as f64 + self.age_max as f64) / 2.0
    }
}

/// Bands for one measurement kind, optionally scoped to a gender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub kind: MeasurementKind,
    /// `None` applies to any gender; a gender-specific table shadows it
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Higher raw value implies a younger age when set
    #[serde(default)]
    pub inverse: bool,
    pub bands: Vec<ReferenceBand>,
}

impl ReferenceTable {
    /// Scope shown in coverage reports and validation messages
    pub fn scope_label(&self) -> &'static str {
        match self.gender {
            Some(Gender::Male) => "male",
            Some(Gender::Female) => "female",
            None => "any",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TableFile {
    #[serde(default)]
    table: Vec<ReferenceTable>,
}

/// A resolved, validated reference dataset
#[derive(Debug, Clone, Default)]
pub struct RangeTables {
    tables: HashMap<(MeasurementKind, Option<Gender>), ReferenceTable>,
}

impl RangeTables {
    /// Resolve a list of tables into a lookup structure, validating each
    /// table and rejecting duplicates.
    pub fn from_tables(tables: Vec<ReferenceTable>) -> Result<Self> {
        if tables.is_empty() {
            return Err(ScoreError::configuration(
                "reference dataset has no tables",
            ));
        }

        let mut resolved = HashMap::new();
        for mut table in tables {
            table
                .bands
                .sort_by(|a, b| a.value_min.total_cmp(&b.value_min));
            validate_table(&table).map_err(ScoreError::Configuration)?;

            let key = (table.kind, table.gender);
            if let Some(previous) = resolved.insert(key, table) {
                return Err(ScoreError::configuration(format!(
                    "duplicate reference table for {} ({})",
                    previous.kind,
                    previous.scope_label()
                )));
            }
        }

        Ok(Self { tables: resolved })
    }

    /// Parse and resolve a TOML dataset
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(raw)?;
        Self::from_tables(file.table)
    }

    /// Load and resolve a TOML dataset from disk
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// The builtin seed dataset shipped with the crate
    pub fn builtin() -> &'static RangeTables {
        &BUILTIN
    }

    /// Table for a kind, honoring gender scoping: a gender-specific table
    /// wins over an any-gender table.
    pub fn table_for(&self, kind: MeasurementKind, gender: Gender) -> Option<&ReferenceTable> {
        self.tables
            .get(&(kind, Some(gender)))
            .or_else(|| self.tables.get(&(kind, None)))
    }

    /// Partial age implied by one measurement.
    ///
    /// # Errors
    ///
    /// [`ScoreError::MissingRangeTable`] when the dataset has no table for
    /// the (kind, gender) pair or no band covers the value.
    pub fn partial_age(&self, kind: MeasurementKind, gender: Gender, value: f64) -> Result<f64> {
        let table = self
            .table_for(kind, gender)
            .ok_or_else(|| ScoreError::missing_range(kind, gender, value))?;

        table
            .bands
            .iter()
            .find(|band| band.contains(value))
            .map(ReferenceBand::partial_age)
            .ok_or_else(|| ScoreError::missing_range(kind, gender, value))
    }

    /// Kinds the dataset covers for at least one gender scope
    pub fn kinds(&self) -> BTreeSet<MeasurementKind> {
        self.tables.keys().map(|(kind, _)| *kind).collect()
    }

    /// All tables, ordered by (kind, scope) for stable reporting
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceTable> {
        let mut keys: Vec<_> = self.tables.keys().collect();
        keys.sort();
        keys.into_iter().map(move |key| &self.tables[key])
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Structural checks applied per table once bands are sorted by window
fn validate_table(table: &ReferenceTable) -> std::result::Result<(), String> {
    let label = format!("{} ({})", table.kind, table.scope_label());

    if table.bands.is_empty() {
        return Err(format!("reference table {label} has no bands"));
    }

    for band in &table.bands {
        if !band.value_min.is_finite() || !band.value_max.is_finite() {
            return Err(format!("reference table {label} has a non-finite value window"));
        }
        if band.value_min >= band.value_max {
            return Err(format!(
                "reference table {label} has an empty value window [{}, {})",
                band.value_min, band.value_max
            ));
        }
        if band.age_min > band.age_max {
            return Err(format!(
                "reference table {label} has an inverted age bracket {}-{}",
                band.age_min, band.age_max
            ));
        }
    }

    for pair in table.bands.windows(2) {
        if pair[1].value_min < pair[0].value_max {
            return Err(format!(
                "reference table {label} has overlapping value windows at {}",
                pair[1].value_min
            ));
        }

        let direction_ok = if table.inverse {
            pair[1].partial_age() <= pair[0].partial_age()
        } else {
            pair[1].partial_age() >= pair[0].partial_age()
        };
        if !direction_ok {
            return Err(format!(
                "reference table {label} violates its {} direction at {}",
                if table.inverse { "inverse" } else { "forward" },
                pair[1].value_min
            ));
        }
    }

    Ok(())
}

static BUILTIN: Lazy<RangeTables> = Lazy::new(|| {
    RangeTables::from_toml_str(include_str!("builtin_ranges.toml"))
        .expect("builtin reference dataset is structurally valid")
});
