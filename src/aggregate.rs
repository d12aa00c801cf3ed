//! Folds transaction records into per-category totals and line items.
//!
//! A [`Session`] is one classification session shared across every input
//! file of a run: it owns the taxonomy, the (mutable) mapping and the
//! accumulating totals, so a rule learned while processing one file applies
//! to the files after it.

use crate::classify::{classify, Classification};
use crate::model::{Amount, Record};
use crate::resolve::Resolve;
use crate::store::CategoryStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Always excluded from aggregation, whichever side of the ledger it lands
/// on. Card autopay payments show up in exports as a transfer, not spending.
pub const AUTOPAY_DESCRIPTION: &str = "CAPITAL ONE AUTOPAY PYMT";

/// One aggregated line item, echoing the amount exactly as the export
/// formatted it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: String,
    pub date: String,
}

/// The aggregation result for one month: per-category totals and the line
/// items behind them, both covering exactly the taxonomy.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub totals: BTreeMap<String, Amount>,
    pub transactions: BTreeMap<String, Vec<LineItem>>,
}

/// A mutable aggregation session. Feed it files with [`Session::ingest`] in
/// the order given on the command line, then take the results and the
/// updated store with [`Session::finish`].
pub struct Session<R> {
    store: CategoryStore,
    resolver: R,
    totals: BTreeMap<String, Amount>,
    details: BTreeMap<String, Vec<LineItem>>,
    aggregated: usize,
    skipped: usize,
    learned: usize,
}

impl<R: Resolve> Session<R> {
    /// Starts a session with zeroed totals and empty line item lists for
    /// every taxonomy category, so categories without spending still appear
    /// in the output as exactly 0.
    pub fn new(store: CategoryStore, resolver: R) -> Self {
        let mut totals = BTreeMap::new();
        let mut details = BTreeMap::new();
        for category in store.taxonomy() {
            totals.insert(category.clone(), Amount::default());
            details.insert(category.clone(), Vec::new());
        }
        Self {
            store,
            resolver,
            totals,
            details,
            aggregated: 0,
            skipped: 0,
            learned: 0,
        }
    }

    /// Processes one file's records in row order, accumulating into the
    /// session's totals.
    ///
    /// Skip rules come before classification: the autopay denylist entry is
    /// always excluded, and a record with a non-empty credit field is income
    /// and never reaches the classifier. Everything else is classified, with
    /// unknowns delegated to the resolver; a learned rule is applied to the
    /// in-memory mapping immediately so later rows benefit.
    pub fn ingest(&mut self, records: impl IntoIterator<Item = Record>) -> Result<()> {
        for record in records {
            if record.description == AUTOPAY_DESCRIPTION {
                debug!("Skipping autopay record on {}", record.date);
                self.skipped += 1;
                continue;
            }
            if !record.credit.is_empty() {
                debug!(
                    "Skipping credit record '{}' on {}",
                    record.description, record.date
                );
                self.skipped += 1;
                continue;
            }

            let category = match classify(&record, self.store.mapper()) {
                Classification::Resolved(category) => category,
                Classification::Unknown => {
                    let resolution = self.resolver.resolve(&record, self.store.taxonomy())?;
                    if resolution.learn {
                        self.store.mapper_mut().learn(
                            &record.source_category,
                            &record.description,
                            &resolution.category,
                        );
                        self.learned += 1;
                        debug!(
                            "Learned rule: {} / {} -> {}",
                            record.source_category, record.description, resolution.category
                        );
                    }
                    resolution.category
                }
            };

            let amount = Amount::from_str(&record.debit).map_err(|_| {
                Error::MalformedRecord(format!(
                    "cannot parse debit amount '{}' for '{}' on {}",
                    record.debit, record.description, record.date
                ))
            })?;

            let Some(total) = self.totals.get_mut(&category) else {
                return Err(Error::UnknownCategory(category));
            };
            // Rounding after every accumulation, not just at the end, keeps
            // totals identical to those already in history files.
            *total = (*total + amount).round_dp(2);
            self.details.entry(category).or_default().push(LineItem {
                description: record.description,
                amount: record.debit,
                date: record.date,
            });
            self.aggregated += 1;
        }
        Ok(())
    }

    /// The number of records aggregated so far.
    pub fn aggregated(&self) -> usize {
        self.aggregated
    }

    /// The number of records excluded by the skip rules so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The number of rules learned so far.
    pub fn learned(&self) -> usize {
        self.learned
    }

    /// Ends the session, yielding the month's report and the store with any
    /// learned rules, ready to be persisted by the caller.
    pub fn finish(self) -> (Report, CategoryStore) {
        (
            Report {
                totals: self.totals,
                transactions: self.details,
            },
            self.store,
        )
    }
}
