//! Human-facing quotation numbers.
//!
//! Two schemes are supported:
//!
//! ```text
//! daily   2024-05-01-0001   counter restarts every contract date
//! global  2024-00001        one counter for all dates, year prefix
//! ```
//!
//! Persistent allocation lives in the db crate; this module only knows how
//! numbers are scoped, formatted and parsed.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;

/// Counter width for the daily scheme.
const DAILY_WIDTH: usize = 4;

/// Counter width for the global scheme.
const GLOBAL_WIDTH: usize = 5;

/// Counter scope key used by the global scheme.
pub const GLOBAL_SCOPE: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceScheme {
    #[default]
    Daily,
    Global,
}

impl SequenceScheme {
    /// Parse from the `SEQUENCE_SCHEME` setting.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "global" => Ok(Self::Global),
            other => Err(CoreError::Validation(format!(
                "Unknown sequence scheme '{other}'. Must be one of: daily, global"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Global => "global",
        }
    }

    /// Key of the counter a number for `date` is drawn from.
    pub fn scope(self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y-%m-%d").to_string(),
            Self::Global => GLOBAL_SCOPE.to_string(),
        }
    }

    /// Format the identifier for `counter` on `date`.
    ///
    /// Counters wider than the padding are printed in full.
    pub fn format(self, date: NaiveDate, counter: u64) -> String {
        match self {
            Self::Daily => format!("{}-{counter:0DAILY_WIDTH$}", date.format("%Y-%m-%d")),
            Self::Global => format!("{}-{counter:0GLOBAL_WIDTH$}", date.year()),
        }
    }

    /// Extract the counter from `identifier` if it belongs to this scheme's
    /// scope for `date`.
    pub fn counter_of(self, date: NaiveDate, identifier: &str) -> Option<u64> {
        let digits = match self {
            Self::Daily => {
                let prefix = format!("{}-", date.format("%Y-%m-%d"));
                identifier.strip_prefix(&prefix)?
            }
            Self::Global => {
                let (year, rest) = identifier.split_once('-')?;
                if year.len() != 4 || !is_ascii_digits(year) {
                    return None;
                }
                rest
            }
        };
        if !is_ascii_digits(digits) {
            return None;
        }
        digits.parse().ok()
    }

    /// POSIX regex matching identifiers of this scope, with the counter as
    /// the first capture group. Used with PostgreSQL's `~` and
    /// `substring(... from ...)`.
    pub fn sql_pattern(self, date: NaiveDate) -> String {
        match self {
            Self::Daily => format!("^{}-([0-9]+)$", date.format("%Y-%m-%d")),
            Self::Global => "^[0-9]{4}-([0-9]+)$".to_string(),
        }
    }
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Compute the identifier following the highest existing counter in scope.
///
/// Identifiers from other dates (daily) or other schemes are ignored. With
/// nothing in scope the counter starts at 1.
pub fn next_sequence<I, S>(scheme: SequenceScheme, date: NaiveDate, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let last = existing
        .into_iter()
        .filter_map(|id| scheme.counter_of(date, id.as_ref()))
        .max()
        .unwrap_or(0);
    scheme.format(date, last + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn scheme_from_name() {
        assert_eq!(SequenceScheme::from_name("daily").unwrap(), SequenceScheme::Daily);
        assert_eq!(SequenceScheme::from_name(" GLOBAL ").unwrap(), SequenceScheme::Global);
        assert!(SequenceScheme::from_name("weekly").is_err());
    }

    #[test]
    fn daily_next_after_existing() {
        let existing = ["2024-05-01-0001", "2024-05-01-0002"];
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), existing),
            "2024-05-01-0003"
        );
    }

    #[test]
    fn daily_first_of_the_day() {
        let existing = ["2024-04-30-0007"];
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), existing),
            "2024-05-01-0001"
        );
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), Vec::<String>::new()),
            "2024-05-01-0001"
        );
    }

    #[test]
    fn daily_uses_max_not_last() {
        let existing = ["2024-05-01-0009", "2024-05-01-0002"];
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), existing),
            "2024-05-01-0010"
        );
    }

    #[test]
    fn daily_counter_grows_past_padding() {
        assert_eq!(
            SequenceScheme::Daily.format(may_first(), 12_345),
            "2024-05-01-12345"
        );
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), ["2024-05-01-9999"]),
            "2024-05-01-10000"
        );
    }

    #[test]
    fn daily_ignores_malformed_identifiers() {
        let existing = ["2024-05-01-abc", "2024-05-01-", "2024-05-01-0003x", "misc"];
        assert_eq!(
            next_sequence(SequenceScheme::Daily, may_first(), existing),
            "2024-05-01-0001"
        );
    }

    #[test]
    fn global_counts_across_dates() {
        let existing = ["2023-00041", "2024-00042", "2024-05-01-0100"];
        assert_eq!(
            next_sequence(SequenceScheme::Global, may_first(), existing),
            "2024-00043"
        );
    }

    #[test]
    fn scopes() {
        assert_eq!(SequenceScheme::Daily.scope(may_first()), "2024-05-01");
        assert_eq!(SequenceScheme::Global.scope(may_first()), GLOBAL_SCOPE);
    }

    #[test]
    fn sql_patterns() {
        assert_eq!(
            SequenceScheme::Daily.sql_pattern(may_first()),
            "^2024-05-01-([0-9]+)$"
        );
        assert_eq!(
            SequenceScheme::Global.sql_pattern(may_first()),
            "^[0-9]{4}-([0-9]+)$"
        );
    }

    #[test]
    fn sequential_allocation_has_no_gaps() {
        let mut issued: Vec<String> = Vec::new();
        for expected in 1..=25_u64 {
            let next = next_sequence(SequenceScheme::Daily, may_first(), &issued);
            assert_eq!(SequenceScheme::Daily.counter_of(may_first(), &next), Some(expected));
            issued.push(next);
        }
    }
}
