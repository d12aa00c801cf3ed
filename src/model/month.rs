//! Month identification from input file names.

use crate::{Error, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::Path;

/// The month a transaction export belongs to, taken from the leading date in
/// the file's name. Both `2020-01-05-transactions.csv` and `2020-01.csv`
/// identify January 2020.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

const FULL_DATE_LEN: usize = "2020-01-01".len();
const YEAR_MONTH_LEN: usize = "2020-01".len();

impl MonthKey {
    /// Parses the month from the leading `YYYY-MM-DD` or `YYYY-MM` prefix of
    /// the file's name. This is validated before any file content is read;
    /// a file name without a date prefix is a user-facing argument error.
    pub fn from_filename(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(prefix) = name.get(..FULL_DATE_LEN) {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Ok(Self(date));
            }
        }
        if let Some(prefix) = name.get(..YEAR_MONTH_LEN) {
            if let Ok(date) = NaiveDate::parse_from_str(&format!("{prefix}-01"), "%Y-%m-%d") {
                return Ok(Self(date));
            }
        }
        Err(Error::BadMonthPrefix(name))
    }

    /// The `YYYY-MM` label used for history keys and output file names.
    pub fn label(&self) -> String {
        self.0.format("%Y-%m").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_full_date_prefix() {
        let key = MonthKey::from_filename(Path::new("2020-01-05-transactions.csv")).unwrap();
        assert_eq!(key.label(), "2020-01");
    }

    #[test]
    fn test_year_month_prefix() {
        let key = MonthKey::from_filename(Path::new("2021-11.csv")).unwrap();
        assert_eq!(key.label(), "2021-11");
    }

    #[test]
    fn test_prefix_uses_file_name_not_directory() {
        let path = PathBuf::from("not-a-date").join("2020-03-14-export.csv");
        let key = MonthKey::from_filename(&path).unwrap();
        assert_eq!(key.label(), "2020-03");
    }

    #[test]
    fn test_rejects_names_without_a_date() {
        assert!(MonthKey::from_filename(Path::new("transactions.csv")).is_err());
        assert!(MonthKey::from_filename(Path::new("2020-13-01.csv")).is_err());
        assert!(MonthKey::from_filename(Path::new("20-01-01.csv")).is_err());
    }
}
