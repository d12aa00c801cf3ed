//! Deterministic resolution of a transaction record against the mapping.

use crate::model::Record;
use crate::store::{CategoryMapper, MapEntry};

/// The outcome of classifying one record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Classification {
    /// The record maps to this internal category.
    Resolved(String),
    /// The mapping has no answer; the record needs interactive resolution.
    Unknown,
}

/// Resolves the record's internal category from the mapping. Lookups are
/// exact and case-sensitive, with no whitespace or case normalization, so
/// rule files stay auditable and predictable.
pub fn classify(record: &Record, mapper: &CategoryMapper) -> Classification {
    match mapper.get(&record.source_category) {
        None => Classification::Unknown,
        Some(MapEntry::Direct(category)) => Classification::Resolved(category.clone()),
        Some(MapEntry::ByDescription(table)) => match table.get(&record.description) {
            Some(category) => Classification::Resolved(category.clone()),
            None => Classification::Unknown,
        },
    }
}
