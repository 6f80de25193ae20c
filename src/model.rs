use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extract::stability::{StabilityMap, StabilityTier};

/// One usage table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRow {
    /// Text of the leading cell, with surrounding whitespace trimmed and
    /// otherwise as printed on the page.
    pub date: String,
    pub total: u64,
    /// Installs keyed by version label, e.g. `"8.x"`.
    pub per_version: BTreeMap<String, u64>,
}

impl UsageRow {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.per_version.get(label).copied()
    }
}

/// Usage rows in source order, index 0 being the most recent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTable {
    labels: Vec<String>,
    rows: Vec<UsageRow>,
}

impl UsageTable {
    pub fn new(labels: Vec<String>, rows: Vec<UsageRow>) -> Self {
        Self { labels, rows }
    }

    /// Version labels named by the header, oldest first.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[UsageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Latest reported installs for `label`, 0 when the label is unknown.
    ///
    /// The newest row is sometimes published before its counts are filled
    /// in. When it reads 0 and the row before it does not, the previous row
    /// is used instead. Only one row of lookback is applied.
    pub fn current_usage(&self, label: &str) -> u64 {
        let Some(latest) = self.rows.first().and_then(|row| row.get(label)) else {
            return 0;
        };
        if latest != 0 {
            return latest;
        }

        match self.rows.get(1).and_then(|row| row.get(label)) {
            Some(previous) if previous != 0 => previous,
            _ => latest,
        }
    }
}

/// Counters from the project information region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFacts {
    pub downloads: u64,
    pub installs: u64,
}

/// Everything collected for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    /// Machine name the pages were fetched for
    pub project: String,

    /// Human readable name from the page subtitle
    pub name: Option<String>,

    pub maintenance_status: Option<String>,

    pub development_status: Option<String>,

    /// Text following the `Last modified:` label, e.g. `"March 3, 2020"`
    pub last_modified: Option<String>,

    /// Major version the stability and usage figures refer to
    pub target_major: u32,

    pub usage: UsageTable,

    /// Result of the usage lookup for `target_major`
    pub current_usage: u64,

    pub releases: StabilityMap,

    pub best_stability: StabilityTier,

    /// Recommended release for `target_major`, if any
    pub recommended_release: Option<String>,

    pub has_full_release: bool,

    /// `None` when the page lacks the statistics entry
    pub facts: Option<ProjectFacts>,
}

impl ProjectReport {
    pub fn is_actively_maintained(&self) -> bool {
        self.maintenance_status.as_deref() == Some("Actively maintained")
    }
}
