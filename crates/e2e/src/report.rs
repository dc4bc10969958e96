//! Suite-grouped text report of a completed result log

use colored::Colorize;
use flowcheck_common::{Outcome, ResultRecord, SuiteCategory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

const RULE_WIDTH: usize = 54;
const NAME_WIDTH: usize = 40;
const OUTCOME_WIDTH: usize = 8;

/// Outcome totals over a whole log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn of(records: &[ResultRecord]) -> Self {
        records.iter().fold(Self::default(), |mut tally, record| {
            match record.outcome() {
                Outcome::Passed => tally.passed += 1,
                Outcome::Failed => tally.failed += 1,
                Outcome::Skipped => tally.skipped += 1,
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Renders records grouped by suite in a fixed category order.
///
/// Categories without records are left out. Totals always cover every record,
/// including categories missing from the display order.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    order: Vec<SuiteCategory>,
    color: bool,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self {
            order: SuiteCategory::ALL.to_vec(),
            color: false,
        }
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display categories in this order; later duplicates are ignored
    pub fn with_order(mut self, order: impl IntoIterator<Item = SuiteCategory>) -> Self {
        let mut seen = Vec::new();
        for category in order {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        self.order = seen;
        self
    }

    /// Style the report with ANSI colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn order(&self) -> &[SuiteCategory] {
        &self.order
    }

    /// Render the report to a string
    pub fn render(&self, records: &[ResultRecord]) -> String {
        let mut grouped: HashMap<SuiteCategory, Vec<&ResultRecord>> = HashMap::new();
        for record in records {
            grouped.entry(record.category()).or_default().push(record);
        }

        let mut out = String::new();
        let rule = self.rule();

        for category in &self.order {
            let Some(rows) = grouped.get(category) else {
                continue;
            };

            self.line(&mut out, "");
            self.line(&mut out, &self.heading(category.label()));
            self.line(&mut out, &rule);
            self.line(&mut out, &self.column_header());
            self.line(&mut out, &rule);
            for record in rows {
                self.line(&mut out, &self.row(record));
            }
            self.line(&mut out, &rule);
        }

        let tally = Tally::of(records);
        self.line(&mut out, "");
        self.line(&mut out, &self.heading("Test Summary"));
        self.line(&mut out, &rule);
        self.line(&mut out, &self.summary(&tally));
        self.line(&mut out, &rule);

        out
    }

    /// Render the report into a writer
    pub fn render_to<W: Write>(
        &self,
        records: &[ResultRecord],
        out: &mut W,
    ) -> std::io::Result<()> {
        out.write_all(self.render(records).as_bytes())?;
        out.flush()
    }

    fn line(&self, out: &mut String, text: &str) {
        if self.color {
            out.push_str(text);
        } else {
            out.push_str(text.trim_end());
        }
        out.push('\n');
    }

    fn rule(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        if self.color {
            rule.bright_black().to_string()
        } else {
            rule
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn column_header(&self) -> String {
        let header = format!("  {:<NAME_WIDTH$}| Result", "Test Name");
        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }

    fn row(&self, record: &ResultRecord) -> String {
        let name = format!("{:<NAME_WIDTH$}", record.test_name());
        let outcome = format!("{:<OUTCOME_WIDTH$}", record.outcome().as_str());
        let message = record
            .message()
            .map(|m| format!("Message: {}", m))
            .unwrap_or_default();

        if !self.color {
            return format!("  {}| {} {}", name, outcome, message);
        }

        let outcome = match record.outcome() {
            Outcome::Passed => outcome.green(),
            Outcome::Failed => outcome.red(),
            Outcome::Skipped => outcome.yellow(),
        };
        format!("  {}| {} {}", name.bold(), outcome, message.bright_black())
    }

    fn summary(&self, tally: &Tally) -> String {
        if !self.color {
            let mut line = format!("  Passed: {} | Failed: {}", tally.passed, tally.failed);
            if tally.skipped > 0 {
                line.push_str(&format!(" | Skipped: {}", tally.skipped));
            }
            return line;
        }

        let mut line = format!(
            "  {} {} {} {} {}",
            "Passed:".bold(),
            tally.passed.to_string().green().bold(),
            "|".bold(),
            "Failed:".bold(),
            tally.failed.to_string().red().bold()
        );
        if tally.skipped > 0 {
            line.push_str(&format!(
                " {} {} {}",
                "|".bold(),
                "Skipped:".bold(),
                tally.skipped.to_string().yellow().bold()
            ));
        }
        line
    }
}
