use bioscore::{classify_nlr, NlrPolicy, RiskLevel, ScoreError};

#[test]
fn test_clinical_anchor_ratios_under_v1() {
    // Quotients chosen to be exact in f64 (lymphocytes is a power of two)
    let cases = [
        (2.8, 2.0, RiskLevel::Optimal),             // ratio 1.4
        (3.6, 2.0, RiskLevel::LowInflammation),     // ratio 1.8
        (10.0, 2.0, RiskLevel::SevereInflammation), // ratio 5.0
        (24.0, 2.0, RiskLevel::ExtremeRisk),        // ratio 12.0
    ];

    for (neutrophils, lymphocytes, expected) in cases {
        let assessment = classify_nlr(neutrophils, lymphocytes, NlrPolicy::ClinicalV1).unwrap();
        assert_eq!(
            assessment.risk_level, expected,
            "ratio {}",
            assessment.ratio
        );
    }
}

#[test]
fn test_policies_disagree_on_the_same_ratio() {
    // Ratio 1.4 is optimal under the strict table but already past the
    // permissive table's 0.7 optimal cutoff
    let v1 = classify_nlr(2.8, 2.0, NlrPolicy::ClinicalV1).unwrap();
    let v2 = classify_nlr(2.8, 2.0, NlrPolicy::ClinicalV2).unwrap();

    assert_eq!(v1.risk_level, RiskLevel::Optimal);
    assert_eq!(v2.risk_level, RiskLevel::LowInflammation);
}

#[test]
fn test_v2_is_more_permissive_at_high_ratios() {
    let v1 = classify_nlr(10.0, 2.0, NlrPolicy::ClinicalV1).unwrap();
    let v2 = classify_nlr(10.0, 2.0, NlrPolicy::ClinicalV2).unwrap();

    assert_eq!(v1.risk_level, RiskLevel::SevereInflammation);
    assert_eq!(v2.risk_level, RiskLevel::ModerateInflammation);
}

#[test]
fn test_assessment_carries_inputs_and_policy() {
    let assessment = classify_nlr(4.5, 1.5, NlrPolicy::ClinicalV2).unwrap();
    assert_eq!(assessment.neutrophils, 4.5);
    assert_eq!(assessment.lymphocytes, 1.5);
    assert_eq!(assessment.ratio, 3.0);
    assert_eq!(assessment.policy, NlrPolicy::ClinicalV2);
    assert_eq!(assessment.risk_level, RiskLevel::Borderline);
}

#[test]
fn test_zero_lymphocytes_is_division_by_zero_not_infinity() {
    let err = classify_nlr(5.0, 0.0, NlrPolicy::ClinicalV1).unwrap_err();
    assert!(matches!(err, ScoreError::DivisionByZero));
}

#[test]
fn test_invalid_inputs_name_the_offending_field() {
    let err = classify_nlr(f64::NAN, 2.0, NlrPolicy::ClinicalV1).unwrap_err();
    match err {
        ScoreError::InvalidInput { field, .. } => assert_eq!(field, "neutrophils"),
        other => panic!("unexpected error: {other}"),
    }

    let err = classify_nlr(2.0, f64::INFINITY, NlrPolicy::ClinicalV1).unwrap_err();
    match err {
        ScoreError::InvalidInput { field, .. } => assert_eq!(field, "lymphocytes"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_zero_neutrophils_is_a_valid_optimal_reading() {
    let assessment = classify_nlr(0.0, 2.0, NlrPolicy::ClinicalV1).unwrap();
    assert_eq!(assessment.ratio, 0.0);
    assert_eq!(assessment.risk_level, RiskLevel::Optimal);
}

#[test]
fn test_error_messages_are_stable() {
    let err = classify_nlr(4.0, 0.0, NlrPolicy::ClinicalV1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "lymphocyte count must be greater than zero"
    );
}
