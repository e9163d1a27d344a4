//! Benchmarks for the scoring hot paths.
//!
//! Covers the three engine entry points a host calls per submission:
//! - NLR classification under both threshold policies
//! - Biological age estimation over panels of increasing size
//! - Batch scoring throughput, sequential vs parallel

use bioscore::{
    classify_nlr, estimate_age, BiometricPanel, Gender, MeasurementKind, NlrPolicy, RangeTables,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;
use std::hint::black_box;

/// A male panel covering every measurement kind with in-range values.
fn full_panel() -> BiometricPanel {
    use MeasurementKind::*;
    let values = [
        (BodyFatPercentage, 18.0),
        (BodyMassIndex, 24.0),
        (SystolicPressure, 120.0),
        (DiastolicPressure, 75.0),
        (VisualReaction, 250.0),
        (AuditoryReaction, 200.0),
        (VitalCapacity, 4000.0),
        (SkinElasticity, 2.0),
        (FastingGlucose, 90.0),
        (GlycatedHemoglobin, 5.4),
        (HdlCholesterol, 55.0),
        (Triglycerides, 120.0),
        (CreatinineClearance, 95.0),
        (Homocysteine, 9.0),
        (TelomereLength, 6.8),
        (MethylationIndex, 45.0),
        (VitaminD, 32.0),
        (VitaminB12, 500.0),
        (CoenzymeQ10, 0.9),
    ];

    let mut panel = BiometricPanel::new(Gender::Male);
    for (kind, value) in values {
        panel.insert(kind, value);
    }
    panel
}

/// Panels with per-submitter variation, all values in builtin range.
fn create_panels(count: usize) -> Vec<BiometricPanel> {
    (0..count)
        .map(|i| {
            let mut panel = full_panel();
            panel.insert(MeasurementKind::BodyMassIndex, 19.0 + (i % 17) as f64);
            panel.insert(MeasurementKind::FastingGlucose, 70.0 + (i % 59) as f64);
            panel
        })
        .collect()
}

fn benchmark_nlr_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("nlr_classification");

    for policy in [NlrPolicy::ClinicalV1, NlrPolicy::ClinicalV2] {
        group.bench_with_input(
            BenchmarkId::from_parameter(policy),
            &policy,
            |b, &policy| {
                b.iter(|| {
                    for neutrophils in 1..=20 {
                        let assessment =
                            classify_nlr(black_box(neutrophils as f64), black_box(2.0), policy);
                        black_box(assessment).unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_age_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("age_estimation");
    let tables = RangeTables::builtin();
    let full = full_panel();

    for &size in &[4usize, 10, 19] {
        let mut panel = BiometricPanel::new(Gender::Male);
        for (kind, value) in full.measurements.iter().take(size) {
            panel.insert(*kind, *value);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &panel, |b, panel| {
            b.iter(|| {
                let estimate = estimate_age(black_box(45.0), panel, tables);
                black_box(estimate).unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_batch_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_scoring");
    let tables = RangeTables::builtin();

    for &size in &[100usize, 500, 1000] {
        let panels = create_panels(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", size),
            &panels,
            |b, panels| {
                b.iter(|| {
                    let estimates: Vec<_> = panels
                        .iter()
                        .map(|panel| estimate_age(45.0, panel, tables))
                        .collect();
                    black_box(estimates)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", size),
            &panels,
            |b, panels| {
                b.iter(|| {
                    let estimates: Vec<_> = panels
                        .par_iter()
                        .map(|panel| estimate_age(45.0, panel, tables))
                        .collect();
                    black_box(estimates)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_nlr_classification,
    benchmark_age_estimation,
    benchmark_batch_scoring
);
criterion_main!(benches);
