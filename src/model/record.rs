//! One row from a bank transaction export.

use crate::{Error, Result};
use anyhow::Context;
use std::path::Path;

pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const DESCRIPTION_STR: &str = "Description";
pub(crate) const TRANSACTION_DATE_STR: &str = "Transaction Date";
pub(crate) const DEBIT_STR: &str = "Debit";
pub(crate) const CREDIT_STR: &str = "Credit";

/// Represents a single row from a transaction export.
///
/// All fields are kept as the raw strings from the file: the debit amount is
/// parsed only when a record is actually aggregated, and detail line items
/// echo the amount exactly as the bank formatted it.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Record {
    /// The category label assigned by the bank, subject to mapping.
    pub source_category: String,
    pub description: String,
    pub date: String,
    /// Money spent. Empty for credit rows.
    pub debit: String,
    /// Incoming funds. A non-empty value marks the row as income.
    pub credit: String,
}

impl Record {
    /// Reads every record from a transaction export file. The first line is
    /// a header row; its fields are trimmed of surrounding whitespace and
    /// used to locate the expected columns for all subsequent rows.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Unable to open transaction file {}", path.display()))?;

        let header = Header::new(
            reader
                .headers()
                .with_context(|| format!("Unable to read the header row of {}", path.display()))?
                .iter(),
        )?;

        let mut records = Vec::new();
        for (row_ix, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("Unable to read row {} of {}", row_ix + 2, path.display())
            })?;
            records.push(header.record(&row));
        }
        Ok(records)
    }
}

/// Column positions of the expected fields, discovered from the trimmed
/// header row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct Header {
    category: usize,
    description: usize,
    date: usize,
    debit: usize,
    credit: usize,
}

impl Header {
    /// Locates each expected column in the header row. Extra columns are
    /// ignored; a missing expected column is fatal since every row would be
    /// unusable.
    pub(crate) fn new<S: AsRef<str>>(fields: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut category = None;
        let mut description = None;
        let mut date = None;
        let mut debit = None;
        let mut credit = None;

        for (ix, field) in fields.into_iter().enumerate() {
            match field.as_ref().trim() {
                CATEGORY_STR => category = Some(ix),
                DESCRIPTION_STR => description = Some(ix),
                TRANSACTION_DATE_STR => date = Some(ix),
                DEBIT_STR => debit = Some(ix),
                CREDIT_STR => credit = Some(ix),
                _ => {}
            }
        }

        let require = |col: Option<usize>, name: &str| {
            col.ok_or_else(|| Error::MalformedRecord(format!("missing column '{name}'")))
        };
        Ok(Self {
            category: require(category, CATEGORY_STR)?,
            description: require(description, DESCRIPTION_STR)?,
            date: require(date, TRANSACTION_DATE_STR)?,
            debit: require(debit, DEBIT_STR)?,
            credit: require(credit, CREDIT_STR)?,
        })
    }

    /// Extracts a `Record` from one data row. Fields beyond the end of a
    /// short row read as empty, the same as an empty cell.
    pub(crate) fn record(&self, row: &csv::StringRecord) -> Record {
        let get = |ix: usize| row.get(ix).unwrap_or_default().to_string();
        Record {
            source_category: get(self.category),
            description: get(self.description),
            date: get(self.date),
            debit: get(self.debit),
            credit: get(self.credit),
        }
    }
}
