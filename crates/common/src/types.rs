//! Core types for Flowcheck

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Outcome of one executed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passed => "Passed",
            Outcome::Failed => "Failed",
            Outcome::Skipped => "Skipped",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passed" => Ok(Outcome::Passed),
            "failed" => Ok(Outcome::Failed),
            "skipped" => Ok(Outcome::Skipped),
            _ => Err(Error::UnknownOutcome(s.to_string())),
        }
    }
}

/// Suite a result belongs to.
///
/// The declaration order is the report order. `Execution` is reserved for
/// failures that escape a suite and abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteCategory {
    Basic,
    ItemManagement,
    Admin,
    Manager,
    Volunteer,
    Deletion,
    Execution,
}

impl SuiteCategory {
    /// The user-journey suites, in report order
    pub const SUITES: [SuiteCategory; 6] = [
        SuiteCategory::Basic,
        SuiteCategory::ItemManagement,
        SuiteCategory::Admin,
        SuiteCategory::Manager,
        SuiteCategory::Volunteer,
        SuiteCategory::Deletion,
    ];

    /// Every category, reserved one last
    pub const ALL: [SuiteCategory; 7] = [
        SuiteCategory::Basic,
        SuiteCategory::ItemManagement,
        SuiteCategory::Admin,
        SuiteCategory::Manager,
        SuiteCategory::Volunteer,
        SuiteCategory::Deletion,
        SuiteCategory::Execution,
    ];

    /// Human-readable suite label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            SuiteCategory::Basic => "Basic Test Suite",
            SuiteCategory::ItemManagement => "Item Management Test Suite",
            SuiteCategory::Admin => "Admin Test Suite",
            SuiteCategory::Manager => "Manager Test Suite",
            SuiteCategory::Volunteer => "Volunteer Test Suite",
            SuiteCategory::Deletion => "Deletion Test Suite",
            SuiteCategory::Execution => "Test Suite Execution",
        }
    }

    /// Snake-case key used in plans and config files
    pub fn key(&self) -> &'static str {
        match self {
            SuiteCategory::Basic => "basic",
            SuiteCategory::ItemManagement => "item_management",
            SuiteCategory::Admin => "admin",
            SuiteCategory::Manager => "manager",
            SuiteCategory::Volunteer => "volunteer",
            SuiteCategory::Deletion => "deletion",
            SuiteCategory::Execution => "execution",
        }
    }
}

impl std::fmt::Display for SuiteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SuiteCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SuiteCategory::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Immutable outcome of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    test_name: String,
    outcome: Outcome,
    category: SuiteCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ResultRecord {
    /// Build a record. Messages are kept only on non-passed outcomes and
    /// only when they carry text.
    pub fn new(
        test_name: impl Into<String>,
        outcome: Outcome,
        category: SuiteCategory,
        message: Option<String>,
    ) -> Self {
        let message = match outcome {
            Outcome::Passed => None,
            _ => message.filter(|m| !m.trim().is_empty()),
        };

        Self {
            test_name: test_name.into(),
            outcome,
            category,
            message,
        }
    }

    pub fn passed(test_name: impl Into<String>, category: SuiteCategory) -> Self {
        Self::new(test_name, Outcome::Passed, category, None)
    }

    pub fn failed(
        test_name: impl Into<String>,
        category: SuiteCategory,
        message: impl Into<String>,
    ) -> Self {
        Self::new(test_name, Outcome::Failed, category, Some(message.into()))
    }

    pub fn skipped(
        test_name: impl Into<String>,
        category: SuiteCategory,
        message: Option<String>,
    ) -> Self {
        Self::new(test_name, Outcome::Skipped, category, message)
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn category(&self) -> SuiteCategory {
        self.category
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
