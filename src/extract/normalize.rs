//! Numeric text normalization shared by the usage and facts extractors.

use thiserror::Error;

/// Malformed numeric text.
///
/// This is the one hard failure of the extraction core: it means the source
/// layout changed and a silent zero would corrupt usage trends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("Expected a number but found empty text")]
    Empty,

    #[error("Not a number: '{0}'")]
    Invalid(String),
}

/// Strips thousands separators and surrounding whitespace.
pub fn strip_separators(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '\u{a0}')
        .collect()
}

/// Coerces numeric text such as `"12,345"` into an integer.
pub fn parse_count(raw: &str) -> Result<u64, NumberError> {
    let cleaned = strip_separators(raw);
    if cleaned.is_empty() {
        return Err(NumberError::Empty);
    }
    cleaned
        .parse::<u64>()
        .map_err(|_| NumberError::Invalid(raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_with_separators() {
        assert_eq!(parse_count("12,345"), Ok(12345));
        assert_eq!(parse_count(" 1,000,000 "), Ok(1_000_000));
        assert_eq!(parse_count("0"), Ok(0));
    }

    #[test]
    fn test_parse_count_rejects_garbage() {
        assert_eq!(parse_count(""), Err(NumberError::Empty));
        assert_eq!(parse_count(" , "), Err(NumberError::Empty));
        assert_eq!(
            parse_count("n/a"),
            Err(NumberError::Invalid("n/a".to_string()))
        );
        assert!(parse_count("-5").is_err());
    }
}
