//! Common type definitions used across the scoring engine

pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender category used to scope reference ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four clinical test families a panel measurement can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCategory {
    Biophysical,
    Biochemical,
    Genetic,
    Orthomolecular,
}

impl TestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCategory::Biophysical => "biophysical",
            TestCategory::Biochemical => "biochemical",
            TestCategory::Genetic => "genetic",
            TestCategory::Orthomolecular => "orthomolecular",
        }
    }

    /// Get the display name for this test family
    pub fn display_name(&self) -> &'static str {
        match self {
            TestCategory::Biophysical => "Biophysical",
            TestCategory::Biochemical => "Biochemical",
            TestCategory::Genetic => "Genetic",
            TestCategory::Orthomolecular => "Orthomolecular",
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One measurable biomarker of the biometric panel
///
/// Typed replacement for the loosely-keyed measurement strings the range
/// tables were historically indexed by: unknown kinds fail at parse time
/// instead of falling through lookups at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasurementKind {
    // Biophysical
    BodyFatPercentage,
    BodyMassIndex,
    SystolicPressure,
    DiastolicPressure,
    VisualReaction,
    AuditoryReaction,
    VitalCapacity,
    SkinElasticity,
    // Biochemical
    FastingGlucose,
    GlycatedHemoglobin,
    HdlCholesterol,
    Triglycerides,
    CreatinineClearance,
    Homocysteine,
    // Genetic
    TelomereLength,
    MethylationIndex,
    // Orthomolecular
    VitaminD,
    VitaminB12,
    CoenzymeQ10,
}

impl MeasurementKind {
    /// Every kind the engine knows, in panel order
    pub fn all() -> &'static [MeasurementKind] {
        use MeasurementKind::*;
        &[
            BodyFatPercentage,
            BodyMassIndex,
            SystolicPressure,
            DiastolicPressure,
            VisualReaction,
            AuditoryReaction,
            VitalCapacity,
            SkinElasticity,
            FastingGlucose,
            GlycatedHemoglobin,
            HdlCholesterol,
            Triglycerides,
            CreatinineClearance,
            Homocysteine,
            TelomereLength,
            MethylationIndex,
            VitaminD,
            VitaminB12,
            CoenzymeQ10,
        ]
    }

    /// The test family this kind belongs to
    pub fn category(&self) -> TestCategory {
        use MeasurementKind::*;
        match self {
            BodyFatPercentage | BodyMassIndex | SystolicPressure | DiastolicPressure
            | VisualReaction | AuditoryReaction | VitalCapacity | SkinElasticity => {
                TestCategory::Biophysical
            }
            FastingGlucose | GlycatedHemoglobin | HdlCholesterol | Triglycerides
            | CreatinineClearance | Homocysteine => TestCategory::Biochemical,
            TelomereLength | MethylationIndex => TestCategory::Genetic,
            VitaminD | VitaminB12 | CoenzymeQ10 => TestCategory::Orthomolecular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use MeasurementKind::*;
        match self {
            BodyFatPercentage => "body-fat-percentage",
            BodyMassIndex => "body-mass-index",
            SystolicPressure => "systolic-pressure",
            DiastolicPressure => "diastolic-pressure",
            VisualReaction => "visual-reaction",
            AuditoryReaction => "auditory-reaction",
            VitalCapacity => "vital-capacity",
            SkinElasticity => "skin-elasticity",
            FastingGlucose => "fasting-glucose",
            GlycatedHemoglobin => "glycated-hemoglobin",
            HdlCholesterol => "hdl-cholesterol",
            Triglycerides => "triglycerides",
            CreatinineClearance => "creatinine-clearance",
            Homocysteine => "homocysteine",
            TelomereLength => "telomere-length",
            MethylationIndex => "methylation-index",
            VitaminD => "vitamin-d",
            VitaminB12 => "vitamin-b12",
            CoenzymeQ10 => "coenzyme-q10",
        }
    }

    /// Parse the kebab-case name used on the CLI and in datasets
    pub fn parse(s: &str) -> Option<Self> {
        MeasurementKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
    }

    /// Measurement unit shown next to raw values
    pub fn unit(&self) -> &'static str {
        use MeasurementKind::*;
        match self {
            BodyFatPercentage | GlycatedHemoglobin => "%",
            BodyMassIndex => "kg/m2",
            SystolicPressure | DiastolicPressure => "mmHg",
            VisualReaction | AuditoryReaction => "ms",
            VitalCapacity => "mL",
            SkinElasticity => "s",
            FastingGlucose | HdlCholesterol | Triglycerides => "mg/dL",
            CreatinineClearance => "mL/min",
            Homocysteine => "umol/L",
            TelomereLength => "kb",
            MethylationIndex => "index",
            VitaminD => "ng/mL",
            VitaminB12 => "pg/mL",
            CoenzymeQ10 => "ug/mL",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrips_through_name() {
        for kind in MeasurementKind::all() {
            assert_eq!(MeasurementKind::parse(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert_eq!(MeasurementKind::parse("bone-density"), None);
        assert_eq!(MeasurementKind::parse(""), None);
    }

    #[test]
    fn test_every_category_has_kinds() {
        for category in [
            TestCategory::Biophysical,
            TestCategory::Biochemical,
            TestCategory::Genetic,
            TestCategory::Orthomolecular,
        ] {
            assert!(
                MeasurementKind::all()
                    .iter()
                    .any(|kind| kind.category() == category),
                "no kinds in {category}"
            );
        }
    }
}
