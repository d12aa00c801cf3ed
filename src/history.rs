//! The multi-month history and its derived averages.
//!
//! The history file is loaded once per run, the current month's totals are
//! inserted (overwriting any previous entry for that month, so re-running a
//! corrected export is idempotent), the averages are recomputed from scratch
//! and the file is rewritten in place.

use crate::model::{Amount, MonthKey};
use crate::{utils, Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Per-category totals for one month.
pub type MonthTotals = BTreeMap<String, Amount>;

#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct History {
    // Field order is serialization order: keep the keys sorted in the file.
    /// Derived from `months`; stored so the file is readable on its own.
    #[serde(default)]
    averages: MonthTotals,
    #[serde(default)]
    months: BTreeMap<String, MonthTotals>,
}

impl History {
    /// Loads the history. The file must already exist; a first run starts
    /// from a file containing `{}`.
    pub fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })
    }

    /// Inserts or overwrites the month's totals, then recomputes every
    /// average from the updated months. Returns the fresh averages.
    ///
    /// Averages are always recomputed from scratch rather than adjusted
    /// incrementally, and a category absent from a month counts as zero: the
    /// divisor is the number of months in history, not the number of months
    /// the category appears in.
    pub fn merge(&mut self, month: &MonthKey, totals: MonthTotals) -> Result<&MonthTotals> {
        self.months.insert(month.label(), totals);
        self.averages = self.compute_averages()?;
        Ok(&self.averages)
    }

    fn compute_averages(&self) -> Result<MonthTotals> {
        if self.months.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let month_count = Decimal::from(self.months.len());

        let categories: BTreeSet<&String> =
            self.months.values().flat_map(|totals| totals.keys()).collect();

        let mut averages = MonthTotals::new();
        for category in categories {
            let sum: Decimal = self
                .months
                .values()
                .filter_map(|totals| totals.get(category))
                .map(|amount| amount.value())
                .sum();
            averages.insert(category.clone(), Amount::new(sum / month_count));
        }
        Ok(averages)
    }

    pub fn months(&self) -> &BTreeMap<String, MonthTotals> {
        &self.months
    }

    pub fn averages(&self) -> &MonthTotals {
        &self.averages
    }

    /// Rewrites the history file in place: sorted keys, 2-space indentation,
    /// written back over the same file the run loaded.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        utils::rewrite_in_place(path, data).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })
    }
}
