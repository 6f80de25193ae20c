//! Project information facts.
//!
//! The statistics entry is found by needle rather than by position, because
//! optional page sections shift its place in the list.

use thiserror::Error;

use super::normalize::{parse_count, NumberError};
use crate::model::ProjectFacts;

/// Substring identifying the statistics entry.
pub const STATS_NEEDLE: &str = "sites report using this";

/// Label opening the last-modified entry.
pub const LAST_MODIFIED_LABEL: &str = "Last modified:";

/// Characters of trailing text (`" downloads"`) after the download count.
pub const DOWNLOADS_SUFFIX_LEN: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactsError {
    #[error("No project info entry contains `{needle}`", needle = STATS_NEEDLE)]
    NotFound,

    #[error("Statistics entry has no {0} span")]
    MissingSpan(&'static str),

    #[error("Unreadable {field}: {source}")]
    Number {
        field: &'static str,
        #[source]
        source: NumberError,
    },
}

/// One entry of the project information list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoEntry {
    /// Full text of the entry
    pub text: String,

    /// Text of the bold-emphasis span holding the install count
    pub emphasis: Option<String>,

    /// Text of the small-print span holding the download count
    pub small_print: Option<String>,

    /// Text of the first link, e.g. the maintenance status value
    pub link: Option<String>,
}

impl InfoEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_emphasis(mut self, emphasis: impl Into<String>) -> Self {
        self.emphasis = Some(emphasis.into());
        self
    }

    pub fn with_small_print(mut self, small_print: impl Into<String>) -> Self {
        self.small_print = Some(small_print.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn is_stats(&self) -> bool {
        self.text.contains(STATS_NEEDLE)
    }
}

/// Locates the statistics entry and reads its download and install counts.
pub fn extract(entries: &[InfoEntry]) -> Result<ProjectFacts, FactsError> {
    let stats = entries
        .iter()
        .find(|entry| entry.is_stats())
        .ok_or(FactsError::NotFound)?;

    let installs = stats
        .emphasis
        .as_deref()
        .ok_or(FactsError::MissingSpan("emphasis"))?;
    let downloads = stats
        .small_print
        .as_deref()
        .ok_or(FactsError::MissingSpan("small-print"))?;

    from_raw(downloads, installs)
}

/// Text following the `Last modified:` label, from the first entry that
/// starts with it.
pub fn last_modified(entries: &[InfoEntry]) -> Option<String> {
    entries.iter().find_map(|entry| {
        entry
            .text
            .trim_start()
            .strip_prefix(LAST_MODIFIED_LABEL)
            .map(|rest| rest.trim().to_string())
    })
}

/// Normalizes the two raw counts.
///
/// `downloads` still carries its trailing suffix, which is cut before parsing.
pub fn from_raw(downloads: &str, installs: &str) -> Result<ProjectFacts, FactsError> {
    let number = |field| move |source| FactsError::Number { field, source };

    Ok(ProjectFacts {
        downloads: parse_count(strip_suffix(downloads)).map_err(number("downloads"))?,
        installs: parse_count(installs).map_err(number("installs"))?,
    })
}

fn strip_suffix(raw: &str) -> &str {
    let raw = raw.trim();
    let keep = raw.chars().count().saturating_sub(DOWNLOADS_SUFFIX_LEN);
    match raw.char_indices().nth(keep) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_entry() -> InfoEntry {
        InfoEntry::new("Reported installs: 15,321 sites report using this module. 1,234,567 downloads")
            .with_emphasis("15,321")
            .with_small_print("1,234,567 downloads")
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract(&[]), Err(FactsError::NotFound));
    }

    #[test]
    fn test_extract_finds_entry_by_needle() {
        let entries = vec![
            InfoEntry::new("Maintenance status: Actively maintained"),
            InfoEntry::new("Development status: Under active development"),
            InfoEntry::new("Automated tests: Enabled").with_emphasis("999"),
            stats_entry(),
        ];

        assert_eq!(
            extract(&entries),
            Ok(ProjectFacts {
                downloads: 1_234_567,
                installs: 15_321,
            })
        );
    }

    #[test]
    fn test_extract_uses_first_match() {
        let second = InfoEntry::new("2 sites report using this")
            .with_emphasis("2")
            .with_small_print("2 downloads");
        let entries = vec![stats_entry(), second];
        assert_eq!(extract(&entries).unwrap().installs, 15_321);
    }

    #[test]
    fn test_extract_missing_spans() {
        let entries = vec![InfoEntry::new("3 sites report using this").with_emphasis("3")];
        assert_eq!(extract(&entries), Err(FactsError::MissingSpan("small-print")));
    }

    #[test]
    fn test_malformed_counts_are_errors() {
        assert!(matches!(
            from_raw("lots downloads", "12"),
            Err(FactsError::Number {
                field: "downloads",
                ..
            })
        ));
        assert!(matches!(
            from_raw("12 downloads", "twelve"),
            Err(FactsError::Number {
                field: "installs",
                ..
            })
        ));
    }

    #[test]
    fn test_last_modified() {
        let entries = vec![
            InfoEntry::new("Maintenance status: Actively maintained"),
            stats_entry(),
            InfoEntry::new("Last modified: March 3, 2020 "),
        ];
        assert_eq!(last_modified(&entries).as_deref(), Some("March 3, 2020"));
        assert_eq!(last_modified(&entries[..2]), None);
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(strip_suffix("1,234 downloads"), "1,234");
        assert_eq!(strip_suffix("short"), "");
    }
}
