use tracing::warn;

use crate::report::TestVerdict;

/// Stamp handed out when a matcher test starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestTicket {
    generation: u64,
}

/// Keeps only the verdict of the most recent test.
///
/// Starting a test or editing the pattern supersedes anything still in flight;
/// responses carrying an older ticket are dropped when they arrive.
#[derive(Debug, Default)]
pub struct TestTracker {
    generation: u64,
    pending_pattern: Option<String>,
    latest: Option<TestVerdict>,
}

impl TestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, pattern: &str) -> TestTicket {
        self.generation += 1;
        self.pending_pattern = Some(pattern.to_string());
        self.latest = None;
        TestTicket {
            generation: self.generation,
        }
    }

    /// Record a verdict. Returns `false` if it was stale and discarded.
    pub fn finish(&mut self, ticket: TestTicket, verdict: TestVerdict) -> bool {
        if ticket.generation != self.generation
            || self.pending_pattern.as_deref() != Some(verdict.pattern.as_str())
        {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale matcher response"
            );
            return false;
        }
        self.pending_pattern = None;
        self.latest = Some(verdict);
        true
    }

    /// The pattern changed; any earlier or in-flight result no longer applies.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.pending_pattern = None;
        self.latest = None;
    }

    pub fn latest(&self) -> Option<&TestVerdict> {
        self.latest.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.pending_pattern.is_some()
    }
}
