//! Column-to-version arithmetic for usage tables.
//!
//! A usage table row looks like `[date, v_low, ..., v_high, total]`. For a
//! row of `n` cells:
//!
//! - cell `n - 1` is the total,
//! - cells `1..=n - 2` are per-version installs, the newest major last.
//!
//! The highest major is named by header cell `header_width - 2`. Labels are
//! derived from each row's own width, so a narrower row loses its oldest
//! columns, never its newest.

use thiserror::Error;

/// Cells ahead of the first count.
pub const LEADING_CELLS: usize = 1;

/// Narrowest row that still carries a date and a total.
pub const MIN_ROW_WIDTH: usize = 2;

/// Narrowest header that still names a version column.
pub const MIN_HEADER_WIDTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Header has {width} cells, at least {min} are required", min = MIN_HEADER_WIDTH)]
    HeaderTooNarrow { width: usize },

    #[error("Row has {width} cells, at least {min} are required", min = MIN_ROW_WIDTH)]
    RowTooNarrow { width: usize },

    #[error("Row has {row_width} cells but the header only has {header_width}")]
    RowWiderThanHeader { row_width: usize, header_width: usize },

    #[error("Highest major {highest} cannot label {columns} version columns")]
    LabelUnderflow { highest: u32, columns: usize },
}

/// One per-version count cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionColumn {
    /// Index into the row.
    pub cell: usize,
    pub major: u32,
}

/// Where the total and the version counts sit in one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Index into the row.
    pub total_cell: usize,

    /// Version columns, newest major first.
    pub versions: Vec<VersionColumn>,
}

/// Index of the header cell naming the highest major.
pub fn highest_major_cell(header_width: usize) -> Result<usize, LayoutError> {
    if header_width < MIN_HEADER_WIDTH {
        return Err(LayoutError::HeaderTooNarrow {
            width: header_width,
        });
    }
    Ok(header_width - 2)
}

/// Lays out a row of `row_width` cells against a header of `header_width`.
pub fn layout(
    header_width: usize,
    row_width: usize,
    highest_major: u32,
) -> Result<ColumnLayout, LayoutError> {
    highest_major_cell(header_width)?;
    if row_width < MIN_ROW_WIDTH {
        return Err(LayoutError::RowTooNarrow { width: row_width });
    }
    if row_width > header_width {
        return Err(LayoutError::RowWiderThanHeader {
            row_width,
            header_width,
        });
    }

    // Everything between the date and the total; none for `[date, total]`.
    let columns = row_width - LEADING_CELLS - 1;
    let lowest = highest_major
        .checked_sub(columns.saturating_sub(1) as u32)
        .ok_or(LayoutError::LabelUnderflow {
            highest: highest_major,
            columns,
        })?;

    let versions = (0..columns)
        .rev()
        .map(|offset| VersionColumn {
            cell: offset + LEADING_CELLS,
            major: lowest + offset as u32,
        })
        .collect();

    Ok(ColumnLayout {
        total_cell: row_width - 1,
        versions,
    })
}

/// Label used as the per-version key, e.g. `"8.x"`.
pub fn version_label(major: u32) -> String {
    format!("{major}.x")
}
