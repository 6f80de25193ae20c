//! Usage table parsing.
//!
//! Turns the raw header and body cell rows of a usage table into a
//! [`UsageTable`] keyed by major version label.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use super::columns::{self, LayoutError};
use super::normalize::{parse_count, NumberError};
use crate::model::{UsageRow, UsageTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Unreadable version label in header cell {cell}: '{text}'")]
    HeaderLabel { cell: usize, text: String },

    #[error("Row {row}: {source}")]
    Layout {
        row: usize,
        #[source]
        source: LayoutError,
    },

    #[error("Header: {0}")]
    Header(#[from] LayoutError),

    #[error("Row {row}, cell {cell}: {source}")]
    Count {
        row: usize,
        cell: usize,
        #[source]
        source: NumberError,
    },
}

/// Reads the major number from a header label such as `"8.x"` or `"10.x"`.
///
/// Only the first two characters are considered, and the integer part is
/// whatever precedes the `.`.
pub fn parse_major_label(text: &str) -> Option<u32> {
    let head: String = text.trim().chars().take(2).collect();
    head.split('.').next()?.parse().ok()
}

/// Highest major version named by the header.
pub fn highest_major<S: AsRef<str>>(header: &[S]) -> Result<u32, UsageError> {
    let cell = columns::highest_major_cell(header.len())?;
    let text = header[cell].as_ref();
    parse_major_label(text).ok_or_else(|| UsageError::HeaderLabel {
        cell,
        text: text.to_string(),
    })
}

/// Parses a usage table.
///
/// An empty header means the project has no usage data, which yields an
/// empty table rather than an error.
pub fn parse<H, C>(header: &[H], rows: &[Vec<C>]) -> Result<UsageTable, UsageError>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    if header.is_empty() {
        debug!("No usage header, project has no usage data");
        return Ok(UsageTable::default());
    }

    let highest = highest_major(header)?;
    debug!(
        highest_major = highest,
        columns = header.len(),
        rows = rows.len(),
        "Parsing usage table"
    );

    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(index, row, header.len(), highest))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UsageTable::new(labels(header.len(), highest)?, rows))
}

/// The fixed label set named by the header, oldest major first.
fn labels(header_width: usize, highest: u32) -> Result<Vec<String>, UsageError> {
    let layout = columns::layout(header_width, header_width, highest)?;
    Ok(layout
        .versions
        .iter()
        .rev()
        .map(|column| columns::version_label(column.major))
        .collect())
}

fn parse_row<C: AsRef<str>>(
    index: usize,
    cells: &[C],
    header_width: usize,
    highest: u32,
) -> Result<UsageRow, UsageError> {
    let layout = columns::layout(header_width, cells.len(), highest).map_err(|source| {
        UsageError::Layout { row: index, source }
    })?;

    let count = |cell: usize| {
        parse_count(cells[cell].as_ref()).map_err(|source| UsageError::Count {
            row: index,
            cell,
            source,
        })
    };

    let mut per_version = BTreeMap::new();
    for column in &layout.versions {
        per_version.insert(columns::version_label(column.major), count(column.cell)?);
    }

    Ok(UsageRow {
        date: cells[0].as_ref().trim().to_string(),
        total: count(layout.total_cell)?,
        per_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    const HEADER: [&str; 5] = ["Week", "6.x", "7.x", "8.x", "Total"];

    #[test]
    fn test_parse_major_label() {
        assert_eq!(parse_major_label("8.x"), Some(8));
        assert_eq!(parse_major_label(" 7.x "), Some(7));
        assert_eq!(parse_major_label("10.x"), Some(10));
        assert_eq!(parse_major_label("Total"), None);
        assert_eq!(parse_major_label(""), None);
    }

    #[test]
    fn test_empty_header_yields_empty_table() {
        let header: Vec<String> = vec![];
        let rows = vec![row(&["Jan 2020", "1", "2"])];
        let table = parse(&header, &rows).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_two_version_table() {
        let header = ["Week", "7.x", "8.x", "Total"];
        let rows = vec![row(&["Jan 2020", "300,000", "15,000", "315,000"])];
        let table = parse(&header, &rows).unwrap();

        assert_eq!(table.labels(), vec!["7.x", "8.x"]);
        let first = &table.rows()[0];
        assert_eq!(first.total, 315_000);
        assert_eq!(first.per_version["7.x"], 300_000);
        assert_eq!(first.per_version["8.x"], 15_000);
        assert_eq!(first.per_version.len(), 2);
        assert_eq!(first.per_version.values().sum::<u64>(), first.total);
        assert_eq!(table.current_usage("8.x"), 15_000);
    }

    #[test]
    fn test_five_cell_header_end_to_end() {
        let rows = vec![row(&["Jan 2020", "12", "3,456", "6,532", "10,000"])];
        let table = parse(&HEADER, &rows).unwrap();

        assert_eq!(table.len(), 1);
        let first = &table.rows()[0];
        assert_eq!(first.date, "Jan 2020");
        assert_eq!(first.total, 10_000);
        assert_eq!(first.per_version["6.x"], 12);
        assert_eq!(first.per_version["7.x"], 3456);
        assert_eq!(first.per_version["8.x"], 6532);
        assert_eq!(first.per_version.values().sum::<u64>(), first.total);
    }

    #[test]
    fn test_date_is_trimmed() {
        let rows = vec![row(&["\n  Jan 2020  ", "1", "2", "3", "6"])];
        let table = parse(&HEADER, &rows).unwrap();
        assert_eq!(table.rows()[0].date, "Jan 2020");
    }

    #[test]
    fn test_keys_constant_across_rows() {
        let rows = vec![
            row(&["Mar 2020", "10", "20", "30", "60"]),
            row(&["Feb 2020", "11", "21", "31", "63"]),
            row(&["Jan 2020", "12", "22", "32", "66"]),
        ];
        let table = parse(&HEADER, &rows).unwrap();

        let key_sets: BTreeSet<Vec<&String>> = table
            .rows()
            .iter()
            .map(|r| r.per_version.keys().collect())
            .collect();
        assert_eq!(key_sets.len(), 1);
        assert_eq!(table.labels(), vec!["6.x", "7.x", "8.x"]);
    }

    #[test]
    fn test_narrow_row_keeps_newest_labels() {
        let rows = vec![
            row(&["Feb 2020", "1", "2", "3", "6"]),
            row(&["Jan 2010", "5", "9", "14"]),
        ];
        let table = parse(&HEADER, &rows).unwrap();
        let old = &table.rows()[1];
        assert_eq!(old.total, 14);
        assert_eq!(old.per_version.len(), 2);
        assert_eq!(old.per_version["8.x"], 9);
        assert_eq!(old.per_version["7.x"], 5);
    }

    #[test]
    fn test_preserves_source_order() {
        let rows = vec![
            row(&["Mar 2020", "1", "2", "3", "6"]),
            row(&["Jan 2020", "1", "2", "3", "6"]),
        ];
        let table = parse(&HEADER, &rows).unwrap();
        let dates: Vec<&str> = table.rows().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["Mar 2020", "Jan 2020"]);
    }

    #[test]
    fn test_malformed_count_is_fatal() {
        let rows = vec![row(&["Jan 2020", "12", "oops", "6", "18"])];
        let err = parse(&HEADER, &rows).unwrap_err();
        assert_eq!(
            err,
            UsageError::Count {
                row: 0,
                cell: 2,
                source: NumberError::Invalid("oops".to_string())
            }
        );
    }

    #[test]
    fn test_unreadable_header_label() {
        let header = ["Week", "Foo", "Bar", "Total"];
        let err = parse(&header, &Vec::<Vec<String>>::new()).unwrap_err();
        assert_eq!(
            err,
            UsageError::HeaderLabel {
                cell: 2,
                text: "Bar".to_string()
            }
        );
    }

    #[test]
    fn test_row_wider_than_header() {
        let rows = vec![row(&["Jan 2020", "1", "2", "3", "4", "10"])];
        let err = parse(&HEADER, &rows).unwrap_err();
        assert!(matches!(err, UsageError::Layout { row: 0, .. }));
    }
}
