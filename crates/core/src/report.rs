use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::amount::parse_amount;
use crate::pattern::PatternAction;

/// What a matcher returns for one `(content, pattern)` test.
///
/// `details` carries every named group that participated in the match plus an
/// optional `error` entry. Groups that did not participate may arrive as
/// `null` and are kept as `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchReport {
    pub success: bool,
    #[serde(default)]
    pub details: BTreeMap<String, Option<String>>,
}

impl MatchReport {
    pub fn matched(details: BTreeMap<String, Option<String>>) -> Self {
        Self { success: true, details }
    }

    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        let mut details = BTreeMap::new();
        details.insert("error".to_string(), Some(message.into()));
        Self { success: false, details }
    }

    /// A non-empty detail value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.details
            .get(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.get("error")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TestFailure {
    #[error("Test failed: pattern did not match")]
    NoMatch,
    #[error("Test failed: {0}")]
    Matcher(String),
    #[error("Test failed: Pattern must capture amount for approval.")]
    MissingAmount,
    #[error("Test failed: Pattern must capture payee for approval.")]
    MissingMerchant,
}

/// Values pulled out of a passing test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extraction {
    pub amount: Option<String>,
    pub merchant: Option<String>,
    pub amount_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TestOutcome {
    Passed(Extraction),
    Failed(TestFailure),
}

/// The judged result of testing `pattern` for a given action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVerdict {
    pub pattern: String,
    pub action: PatternAction,
    pub outcome: TestOutcome,
}

impl TestVerdict {
    /// Judge a matcher report.
    ///
    /// A regex match is not enough for an approve pattern: both `amount` and
    /// `merchant` must have captured something.
    pub fn judge(pattern: impl Into<String>, action: PatternAction, report: &MatchReport) -> Self {
        let outcome = if !report.success {
            match report.error_message() {
                Some(e) => TestOutcome::Failed(TestFailure::Matcher(e.to_string())),
                None => TestOutcome::Failed(TestFailure::NoMatch),
            }
        } else {
            let amount = report.get("amount");
            let merchant = report.get("merchant");
            match action {
                PatternAction::Approve if amount.is_none() => {
                    TestOutcome::Failed(TestFailure::MissingAmount)
                }
                PatternAction::Approve if merchant.is_none() => {
                    TestOutcome::Failed(TestFailure::MissingMerchant)
                }
                _ => TestOutcome::Passed(Extraction {
                    amount: amount.map(str::to_string),
                    merchant: merchant.map(str::to_string),
                    amount_value: amount.and_then(parse_amount),
                }),
            }
        };

        Self {
            pattern: pattern.into(),
            action,
            outcome,
        }
    }

    /// A transport failure counts as a failed test.
    pub fn unreachable(pattern: impl Into<String>, action: PatternAction, reason: &str) -> Self {
        Self {
            pattern: pattern.into(),
            action,
            outcome: TestOutcome::Failed(TestFailure::Matcher(reason.to_string())),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.outcome, TestOutcome::Passed(_))
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        match &self.outcome {
            TestOutcome::Passed(e) => Some(e),
            TestOutcome::Failed(_) => None,
        }
    }

    /// One-line feedback for the user.
    pub fn message(&self) -> String {
        match &self.outcome {
            TestOutcome::Passed(Extraction {
                amount: Some(amount),
                merchant: Some(merchant),
                ..
            }) if self.action == PatternAction::Approve => {
                format!("Test passed, amount: {amount} merchant: {merchant}")
            }
            TestOutcome::Passed(_) => "Test passed".to_string(),
            TestOutcome::Failed(failure) => failure.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn report(pairs: &[(&str, Option<&str>)]) -> MatchReport {
        MatchReport::matched(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
        )
    }

    #[test]
    fn approve_passes_with_both_groups() {
        let r = report(&[("amount", Some("Rs.1,250")), ("merchant", Some("Amazon"))]);
        let verdict = TestVerdict::judge("p", PatternAction::Approve, &r);
        assert!(verdict.passed());
        let e = verdict.extraction().unwrap();
        assert_eq!(e.merchant.as_deref(), Some("Amazon"));
        assert_eq!(e.amount_value, Some(Decimal::from_str("1250").unwrap()));
        assert_eq!(verdict.message(), "Test passed, amount: Rs.1,250 merchant: Amazon");
    }

    #[test]
    fn approve_match_without_amount_fails() {
        let r = report(&[("merchant", Some("Amazon"))]);
        let verdict = TestVerdict::judge("p", PatternAction::Approve, &r);
        assert_eq!(verdict.outcome, TestOutcome::Failed(TestFailure::MissingAmount));
        assert_eq!(
            verdict.message(),
            "Test failed: Pattern must capture amount for approval."
        );
    }

    #[test]
    fn approve_match_with_empty_merchant_fails() {
        let r = report(&[("amount", Some("500")), ("merchant", Some(""))]);
        let verdict = TestVerdict::judge("p", PatternAction::Approve, &r);
        assert_eq!(verdict.outcome, TestOutcome::Failed(TestFailure::MissingMerchant));
    }

    #[test]
    fn null_group_counts_as_missing() {
        let r = report(&[("amount", None), ("merchant", Some("X"))]);
        let verdict = TestVerdict::judge("p", PatternAction::Approve, &r);
        assert_eq!(verdict.outcome, TestOutcome::Failed(TestFailure::MissingAmount));
    }

    #[test]
    fn reject_passes_on_any_match() {
        let verdict = TestVerdict::judge(".*", PatternAction::Reject, &report(&[]));
        assert!(verdict.passed());
        assert_eq!(verdict.message(), "Test passed");
    }

    #[test]
    fn matcher_error_is_passed_through() {
        let r = MatchReport::error("unbalanced parenthesis");
        let verdict = TestVerdict::judge("(", PatternAction::Reject, &r);
        assert_eq!(verdict.message(), "Test failed: unbalanced parenthesis");
    }

    #[test]
    fn no_match_fails() {
        let verdict = TestVerdict::judge("x", PatternAction::Reject, &MatchReport::no_match());
        assert_eq!(verdict.outcome, TestOutcome::Failed(TestFailure::NoMatch));
    }

    #[test]
    fn report_decodes_wire_shape() {
        let json = r#"{"success": true, "details": {"amount": "500", "merchant": "Amazon", "ref": null}}"#;
        let r: MatchReport = serde_json::from_str(json).unwrap();
        assert_eq!(r.get("amount"), Some("500"));
        assert_eq!(r.get("ref"), None);

        let bare: MatchReport = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(bare.details.is_empty());
    }
}
