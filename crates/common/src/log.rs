//! Append-only collector of step results for a single run

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{Outcome, ResultRecord, SuiteCategory};

/// Ordered, append-only sequence of result records.
///
/// Records are never reordered or deduplicated: a step name may legitimately
/// appear several times in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultLog {
    records: Vec<ResultRecord>,
    #[serde(skip)]
    echo: bool,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo every appended record through the log output as it arrives
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Append a new record and return it
    pub fn record(
        &mut self,
        test_name: impl Into<String>,
        outcome: Outcome,
        category: SuiteCategory,
        message: Option<String>,
    ) -> &ResultRecord {
        self.push(ResultRecord::new(test_name, outcome, category, message))
    }

    /// Append an already built record and return it
    pub fn push(&mut self, record: ResultRecord) -> &ResultRecord {
        if self.echo {
            info!("{}", echo_line(&record));
        }

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// All records so far, in insertion order
    pub fn all(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with the given outcome
    pub fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome() == outcome).count()
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}

impl From<Vec<ResultRecord>> for ResultLog {
    fn from(records: Vec<ResultRecord>) -> Self {
        Self { records, echo: false }
    }
}

/// Live echo line for a record as it is appended
pub fn echo_line(record: &ResultRecord) -> String {
    let mut line = format!(
        "Category: {} | Test: {} | Result: {}",
        record.category(),
        record.test_name(),
        record.outcome()
    );
    if let Some(message) = record.message() {
        line.push_str(&format!(" | Message: {}", message));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut log = ResultLog::new();
        log.record("Login as Admin", Outcome::Passed, SuiteCategory::Admin, None);
        log.record("Open Website", Outcome::Passed, SuiteCategory::Basic, None);

        let names: Vec<&str> = log.all().iter().map(|r| r.test_name()).collect();
        assert_eq!(names, ["Login as Admin", "Open Website"]);
    }

    #[test]
    fn test_repeated_names_are_kept() {
        let mut log = ResultLog::new().with_echo(true);
        for _ in 0..3 {
            log.record(
                "Create New Item",
                Outcome::Passed,
                SuiteCategory::ItemManagement,
                None,
            );
        }
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_record_returns_stored_record() {
        let mut log = ResultLog::new();
        let record = log.record(
            "Create New Item - Watch",
            Outcome::Failed,
            SuiteCategory::ItemManagement,
            Some("Item not found in the table".to_string()),
        );
        assert_eq!(record.message(), Some("Item not found in the table"));
    }

    #[test]
    fn test_count_by_outcome() {
        let mut log = ResultLog::new();
        log.record("a", Outcome::Passed, SuiteCategory::Basic, None);
        log.record("b", Outcome::Failed, SuiteCategory::Basic, Some("x".into()));
        log.record("c", Outcome::Skipped, SuiteCategory::Basic, None);
        log.record("d", Outcome::Passed, SuiteCategory::Admin, None);

        assert_eq!(log.count(Outcome::Passed), 2);
        assert_eq!(log.count(Outcome::Failed), 1);
        assert_eq!(log.count(Outcome::Skipped), 1);
    }

    #[test]
    fn test_echo_line_format() {
        let passed = ResultRecord::passed("Open Website", SuiteCategory::Basic);
        assert_eq!(
            echo_line(&passed),
            "Category: Basic Test Suite | Test: Open Website | Result: Passed"
        );

        let failed = ResultRecord::failed(
            "Test Execution",
            SuiteCategory::Execution,
            "element not found",
        );
        assert_eq!(
            echo_line(&failed),
            "Category: Test Suite Execution | Test: Test Execution | Result: Failed \
             | Message: element not found"
        );
    }

    #[test]
    fn test_log_serializes_as_plain_list() {
        let mut log = ResultLog::new();
        log.record("Open Website", Outcome::Passed, SuiteCategory::Basic, None);

        let json = serde_json::to_string(&log).unwrap();
        let back: ResultLog = serde_json::from_str(&json).unwrap();
        assert!(json.starts_with('['));
        assert_eq!(back.all(), log.all());
    }
}
