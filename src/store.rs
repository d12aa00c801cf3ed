//! The category store: the fixed internal taxonomy plus the learned mapping
//! from bank category names to internal categories.
//!
//! The store lives in a single JSON document:
//!
//! ```json
//! {
//!   "categoryMapper": {
//!     "Gas/Automotive": "Car",
//!     "Merchandise": {
//!       "AMZN Mktp US": "Stuff",
//!       "COSTCO WHSE": "Food"
//!     }
//!   },
//!   "internalCategories": ["Car", "Food", "Stuff"]
//! }
//! ```
//!
//! A mapper value is either a single internal category for the whole source
//! category, or a per-description override table. The file is rewritten with
//! sorted keys and 2-space indentation so diffs stay reviewable.

use crate::{utils, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The taxonomy and mapping, loaded once per run and saved exactly once,
/// after all classification completes. A run that aborts mid-way never
/// touches the file, so a half-learned mapping is never persisted.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryStore {
    // Field order is serialization order: keep the keys sorted in the file.
    #[serde(rename = "categoryMapper")]
    category_mapper: CategoryMapper,
    #[serde(rename = "internalCategories")]
    internal_categories: Vec<String>,
}

impl CategoryStore {
    pub fn new(internal_categories: Vec<String>, category_mapper: CategoryMapper) -> Self {
        Self {
            category_mapper,
            internal_categories,
        }
    }

    /// Loads the store. There is no partial mode of operation without a
    /// taxonomy, so any failure here is fatal for the whole run.
    pub fn load(path: &Path) -> Result<Self> {
        utils::deserialize(path).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })
    }

    /// Writes the combined blob back, keys sorted, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        utils::write(path, data).map_err(|e| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })
    }

    /// The ordered list of internal categories. Every run's totals cover
    /// exactly this set.
    pub fn taxonomy(&self) -> &[String] {
        &self.internal_categories
    }

    pub fn mapper(&self) -> &CategoryMapper {
        &self.category_mapper
    }

    pub fn mapper_mut(&mut self) -> &mut CategoryMapper {
        &mut self.category_mapper
    }
}

/// Maps a source category name to how it should be resolved.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMapper(BTreeMap<String, MapEntry>);

/// How one source category resolves.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapEntry {
    /// Every record with this source category maps to one internal category.
    Direct(String),
    /// Records resolve by exact description lookup; descriptions not in the
    /// table remain unknown.
    ByDescription(BTreeMap<String, String>),
}

impl CategoryMapper {
    pub fn get(&self, source_category: &str) -> Option<&MapEntry> {
        self.0.get(source_category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Records an operator's learn-instruction: `source_category` records
    /// with exactly this `description` resolve to `category` from now on.
    ///
    /// Merges into an existing description table. A `Direct` entry is
    /// upgraded to a table holding only the new rule, so descriptions that
    /// previously resolved through the direct mapping become unknown again
    /// and re-prompt.
    pub fn learn(
        &mut self,
        source_category: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) {
        let source_category = source_category.into();
        let description = description.into();
        let category = category.into();
        match self.0.get_mut(&source_category) {
            Some(MapEntry::ByDescription(table)) => {
                table.insert(description, category);
            }
            Some(entry @ MapEntry::Direct(_)) => {
                *entry = MapEntry::ByDescription(BTreeMap::from([(description, category)]));
            }
            None => {
                self.0.insert(
                    source_category,
                    MapEntry::ByDescription(BTreeMap::from([(description, category)])),
                );
            }
        }
    }
}

impl From<BTreeMap<String, MapEntry>> for CategoryMapper {
    fn from(value: BTreeMap<String, MapEntry>) -> Self {
        Self(value)
    }
}
