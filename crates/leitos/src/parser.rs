use std::sync::LazyLock;

use regex::Regex;

use crate::types::BedRow;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid {field} count in row {row}: {token:?}")]
    InvalidCount {
        row: usize,
        field: &'static str,
        token: String,
    },
    #[error("No DD/MM/YYYY date found in: {0:?}")]
    MissingDate(String),
    #[error("Page region not found or empty: {0}")]
    MissingRegion(String),
}

// Label line, then caption + total, then caption + occupied.
static RE_BED_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<label>.+)\n(?:.+\n(?P<total>[0-9,.]+)\n)(?:.+\n(?P<occupied>[0-9,.]+)\n)")
        .expect("invalid regex: bed row")
});

static RE_REPORT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2}/[0-9]{2}/[0-9]{4})").expect("invalid regex: date"));

/// Parses a bed count, dropping the `,` and `.` digit-group separators.
fn parse_count(token: &str, row: usize, field: &'static str) -> Result<u32, ParseError> {
    let digits: String = token.chars().filter(|c| !matches!(c, ',' | '.')).collect();
    digits.parse::<u32>().map_err(|_| ParseError::InvalidCount {
        row,
        field,
        token: token.to_string(),
    })
}

/// Finds every bed row in the rendered table text, in the order they appear.
///
/// The number of rows is not checked here; text without any row yields an
/// empty vector.
pub fn extract_rows(raw_table_text: &str) -> Result<Vec<BedRow>, ParseError> {
    RE_BED_ROW
        .captures_iter(raw_table_text)
        .enumerate()
        .map(|(row, caps)| -> Result<BedRow, ParseError> {
            Ok(BedRow {
                label: caps["label"].trim().to_string(),
                total: parse_count(&caps["total"], row, "total")?,
                occupied: parse_count(&caps["occupied"], row, "occupied")?,
            })
        })
        .collect()
}

/// Returns the first `DD/MM/YYYY` date in the "last updated" label.
pub fn extract_report_date(raw_date_text: &str) -> Result<String, ParseError> {
    RE_REPORT_DATE
        .find(raw_date_text)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ParseError::MissingDate(raw_date_text.trim().to_string()))
}
