use thiserror::Error;

use crate::pattern::PatternAction;
use crate::report::TestVerdict;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Pattern must contain at least one '.*'")]
    MissingWildcard,
    #[error("Pattern must contain '?P<amount>' for approval")]
    MissingAmountGroup,
    #[error("Pattern must contain '?P<merchant>' for approval")]
    MissingMerchantGroup,
    #[error("Pattern must contain '?P<amount>' and '?P<merchant>' for approval")]
    MissingNamedGroups,
    #[error("test and ensure it passes before saving")]
    TestNotPassed,
}

/// Whether a passing matcher test is needed before the pattern may be saved.
#[derive(Debug, Clone, Copy)]
pub enum TestGate<'a> {
    NotRequired,
    /// The most recent verdict, if any test has completed.
    Required(Option<&'a TestVerdict>),
}

/// Structural checks a finished pattern must pass, first failure wins.
pub fn validate_pattern(
    pattern: &str,
    action: PatternAction,
    gate: TestGate<'_>,
) -> Result<(), ValidationError> {
    if !pattern.contains(".*") {
        return Err(ValidationError::MissingWildcard);
    }

    if action == PatternAction::Approve {
        let has_amount = pattern.contains("?P<amount>");
        let has_merchant = pattern.contains("?P<merchant>");
        match (has_amount, has_merchant) {
            (false, false) => return Err(ValidationError::MissingNamedGroups),
            (false, true) => return Err(ValidationError::MissingAmountGroup),
            (true, false) => return Err(ValidationError::MissingMerchantGroup),
            (true, true) => {}
        }
    }

    if let TestGate::Required(latest) = gate {
        let passed = latest.is_some_and(|v| v.passed() && v.pattern == pattern && v.action == action);
        if !passed {
            return Err(ValidationError::TestNotPassed);
        }
    }

    Ok(())
}
