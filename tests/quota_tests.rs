use bioscore::{check_quota, record_submission, ScoreError, SubmitterAccount, SubmitterRole};

#[test]
fn test_account_record_parses_from_json() {
    let account: SubmitterAccount = serde_json::from_str(
        r#"{ "role": "member", "submissions_used": 3, "submission_limit": 25 }"#,
    )
    .unwrap();

    assert_eq!(account.role, SubmitterRole::Member);
    assert_eq!(account.remaining(), Some(22));
}

#[test]
fn test_fresh_account_record_defaults_usage_to_zero() {
    // Host records for new submitters carry no usage field yet
    let account: SubmitterAccount =
        serde_json::from_str(r#"{ "role": "member", "submission_limit": 10 }"#).unwrap();

    assert_eq!(account.submissions_used, 0);
    assert_eq!(account.remaining(), Some(10));
}

#[test]
fn test_member_quota_drains_to_rejection() {
    let mut account = SubmitterAccount::member(3);

    for used in 0..3 {
        assert_eq!(account.submissions_used, used);
        check_quota(&account).unwrap();
        account = record_submission(account);
    }

    let err = check_quota(&account).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::QuotaExhausted { used: 3, limit: 3 }
    ));
    assert_eq!(
        err.to_string(),
        "submission quota exhausted: 3 of 3 used"
    );
}

#[test]
fn test_zero_limit_member_is_rejected_immediately() {
    let account = SubmitterAccount::member(0);
    assert!(matches!(
        check_quota(&account),
        Err(ScoreError::QuotaExhausted { used: 0, limit: 0 })
    ));
}

#[test]
fn test_administrator_ignores_the_limit() {
    let mut account = SubmitterAccount::administrator();
    for _ in 0..100 {
        check_quota(&account).unwrap();
        account = record_submission(account);
    }

    // Usage is still tracked, it just never gates
    assert_eq!(account.submissions_used, 100);
    assert_eq!(account.remaining(), None);
}

#[test]
fn test_recording_never_mutates_the_input() {
    let before = SubmitterAccount::member(5);
    let after = record_submission(before);

    assert_eq!(before.submissions_used, 0);
    assert_eq!(after.submissions_used, 1);
    assert_eq!(after.role, before.role);
    assert_eq!(after.submission_limit, before.submission_limit);
}
