//! The failure taxonomy for a run. Every variant except the adapter-level
//! `Other` is fatal by policy: the tool is a single-shot batch pipeline with
//! no partial or degraded mode.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The category store or history file is missing, unreadable or
    /// unwritable. Raised before processing (load) or after all
    /// classification completes (save), never in between, so the on-disk
    /// store is never left half-written.
    #[error("The store file at '{}' is unavailable: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    /// A transaction row that cannot be aggregated, most commonly a debit
    /// amount that does not parse as a number. Aborts the run rather than
    /// producing silently wrong totals.
    #[error("Malformed transaction record: {0}")]
    MalformedRecord(String),

    /// An average was requested over zero months. Unreachable once the
    /// current month has been merged; guarded anyway.
    #[error("Cannot compute averages over an empty history")]
    EmptyHistory,

    /// An input file name that does not begin with a date, reported before
    /// any file content is read.
    #[error("File name '{0}' does not begin with a YYYY-MM-DD or YYYY-MM date")]
    BadMonthPrefix(String),

    /// The mapping resolved a category that is not in the taxonomy. Totals
    /// must cover exactly the taxonomy, so this is a store consistency
    /// failure rather than a record failure.
    #[error("Category '{0}' is not in the taxonomy")]
    UnknownCategory(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
