use std::collections::BTreeMap;
use std::fmt;

use crate::conversion::pipeline::ConversionOutcome;
use crate::errors::FailureKind;

/// Counts of a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents written
    pub success_count: usize,
    /// Files that could not be converted
    pub failed_count: usize,
    /// Failures per kind
    pub failures_by_kind: BTreeMap<FailureKind, usize>,
}

impl BatchSummary {
    /// Tally outcomes; the order they arrive in does not matter
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a ConversionOutcome>,
    {
        outcomes.into_iter().fold(Self::default(), |mut summary, outcome| {
            match outcome.failure_kind() {
                None => summary.success_count += 1,
                Some(kind) => {
                    summary.failed_count += 1;
                    *summary.failures_by_kind.entry(kind).or_insert(0) += 1;
                }
            }
            summary
        })
    }

    /// Number of outcomes summarized
    pub fn total(&self) -> usize {
        self.success_count + self.failed_count
    }

    /// Lines printed at the end of a batch run
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Completed: {} successful, {} failed",
            self.success_count, self.failed_count
        )];
        if self.failed_count > 0 {
            lines.push("Some files could not be converted due to permission errors.".to_string());
        }
        lines
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report_lines().join("\n"))
    }
}
