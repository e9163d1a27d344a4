//! Submission quota guard.
//!
//! The scoring engine itself is stateless; the quota is a precondition the
//! host checks before invoking a scorer, against the submitter's account
//! record. Check-then-increment must happen inside one host transaction so
//! two concurrent submissions cannot both pass the check before either
//! increment lands. Nothing here holds state between calls.

use crate::core::errors::{Result, ScoreError};
use serde::{Deserialize, Serialize};

/// Role attached to a submitter account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitterRole {
    /// Unlimited submissions
    Administrator,
    /// Bounded by `submission_limit`
    Member,
}

impl SubmitterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitterRole::Administrator => "administrator",
            SubmitterRole::Member => "member",
        }
    }
}

/// The quota-bearing slice of a submitter's account record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterAccount {
    pub role: SubmitterRole,
    #[serde(default)]
    pub submissions_used: u32,
    pub submission_limit: u32,
}

impl SubmitterAccount {
    pub fn member(submission_limit: u32) -> Self {
        Self {
            role: SubmitterRole::Member,
            submissions_used: 0,
            submission_limit,
        }
    }

    pub fn administrator() -> Self {
        Self {
            role: SubmitterRole::Administrator,
            submissions_used: 0,
            submission_limit: 0,
        }
    }

    /// Submissions left before the quota rejects; `None` means unlimited
    pub fn remaining(&self) -> Option<u32> {
        match self.role {
            SubmitterRole::Administrator => None,
            SubmitterRole::Member => {
                Some(self.submission_limit.saturating_sub(self.submissions_used))
            }
        }
    }
}

/// Reject a submission that would exceed the account's quota.
///
/// Administrators always pass. The host must run this and
/// [`record_submission`] inside the same transaction.
///
/// # Errors
///
/// [`ScoreError::QuotaExhausted`] when a member account has no
/// submissions remaining.
pub fn check_quota(account: &SubmitterAccount) -> Result<()> {
    match account.role {
        SubmitterRole::Administrator => Ok(()),
        SubmitterRole::Member => {
            if account.submissions_used >= account.submission_limit {
                Err(ScoreError::QuotaExhausted {
                    used: account.submissions_used,
                    limit: account.submission_limit,
                })
            } else {
                Ok(())
            }
        }
    }
}

/// Successor account state after an admitted submission.
///
/// Pure; the caller persists the returned record. Usage is tracked for
/// administrators too, it just never gates them.
pub fn record_submission(account: SubmitterAccount) -> SubmitterAccount {
    SubmitterAccount {
        submissions_used: account.submissions_used.saturating_add(1),
        ..account
    }
}
