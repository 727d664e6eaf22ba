use crate::types::{ExtractError, ExtractResult};
use chrono::NaiveDate;
use regex::Regex;

/// How to recover an acquisition date from a filename.
///
/// Two strategies cover the naming conventions seen in practice: a fixed
/// token position for names like `Monthly_Precip_2020-01.tif`, and a
/// pattern search for names that embed a date anywhere
/// (`S1_2020_03_15_VV.tif`).
#[derive(Debug, Clone)]
pub enum DateStrategy {
    /// Split on `delimiter`, take the last token, strip `suffix` if
    /// present, parse the remainder with the chrono `format` string.
    TokenSplit {
        delimiter: char,
        suffix: String,
        format: String,
    },
    /// Search the filename for a date-shaped substring. Underscore
    /// separators are normalized to dashes before parsing.
    PatternSearch { pattern: Regex },
}

impl DateStrategy {
    /// A token-split strategy with an explicit delimiter, suffix and
    /// chrono format.
    pub fn token_split(delimiter: char, suffix: &str, format: &str) -> Self {
        DateStrategy::TokenSplit {
            delimiter,
            suffix: suffix.to_string(),
            format: format.to_string(),
        }
    }

    /// A pattern-search strategy from a user-supplied regular expression.
    pub fn pattern_search(pattern: &str) -> ExtractResult<Self> {
        let compiled = Regex::new(pattern).map_err(|e| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(DateStrategy::PatternSearch { pattern: compiled })
    }

    /// Monthly composites named `*_YYYY-MM.tif` (e.g. monthly precipitation).
    pub fn monthly_suffix() -> Self {
        Self::token_split('_', ".tif", "%Y-%m")
    }

    /// Daily composites with a trailing `*_YYYY-MM-DD.tif` date token.
    pub fn daily_suffix() -> Self {
        Self::token_split('_', ".tif", "%Y-%m-%d")
    }

    /// `YYYY-MM-DD` anywhere in the filename.
    pub fn embedded_date() -> Self {
        DateStrategy::PatternSearch {
            pattern: Regex::new(r"\d{4}-\d{2}-\d{2}").expect("hard-coded date pattern"),
        }
    }

    /// `YYYY_MM_DD` anywhere in the filename (SAR scene convention).
    pub fn embedded_date_underscored() -> Self {
        DateStrategy::PatternSearch {
            pattern: Regex::new(r"\d{4}_\d{2}_\d{2}").expect("hard-coded date pattern"),
        }
    }
}

/// Extract the acquisition date embedded in `filename` under `strategy`.
///
/// Dates are naive calendar dates; month-granularity sources resolve to
/// the first day of the month. Failure is always the recoverable
/// [`ExtractError::DateParse`], never a panic, so a batch can skip the
/// file and continue.
pub fn parse_date(filename: &str, strategy: &DateStrategy) -> ExtractResult<NaiveDate> {
    match strategy {
        DateStrategy::TokenSplit {
            delimiter,
            suffix,
            format,
        } => {
            let token = filename.rsplit(*delimiter).next().unwrap_or(filename);
            let token = token.strip_suffix(suffix.as_str()).unwrap_or(token);
            parse_date_token(token, format).ok_or_else(|| ExtractError::DateParse {
                filename: filename.to_string(),
                reason: format!("token '{}' does not match format '{}'", token, format),
            })
        }
        DateStrategy::PatternSearch { pattern } => {
            let found = pattern
                .find(filename)
                .ok_or_else(|| ExtractError::DateParse {
                    filename: filename.to_string(),
                    reason: format!("no match for pattern '{}'", pattern.as_str()),
                })?;
            let normalized = found.as_str().replace('_', "-");
            parse_date_token(&normalized, "%Y-%m-%d")
                .or_else(|| parse_date_token(&normalized, "%Y-%m"))
                .ok_or_else(|| ExtractError::DateParse {
                    filename: filename.to_string(),
                    reason: format!(
                        "matched '{}' but it is not a calendar date",
                        found.as_str()
                    ),
                })
        }
    }
}

/// Parse one date token, pinning month-granularity tokens to day 1.
///
/// Formats without a day field (e.g. `%Y-%m`) cannot fill a `NaiveDate`
/// on their own, so the token is retried with `-01` appended.
fn parse_date_token(token: &str, format: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(token, format) {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("{}-01", token), &format!("{}-%d", format)).ok()
}
