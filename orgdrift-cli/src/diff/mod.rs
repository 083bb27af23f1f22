//! Inventory diff engine
//!
//! This module provides functions to:
//! - Compare two inventories category by category
//! - Categorize entities as added, removed, or modified
//! - Record attribute-level changes for modified entities
//! - Aggregate per-category and overall counts
//!
//! Everything here is pure. Output order follows the input sequences, never
//! hash iteration order, so repeated runs produce identical results.

pub mod entity;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::inventory::{Inventory, InventoryMetadata};

pub use entity::{Entity, EntityKind, EntityRecord, InventoryObject, QualifiedField};

/// Old and new value of one tracked attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub old: Value,
    pub new: Value,
}

/// An entity present in both inventories with at least one changed attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedEntity {
    pub key: String,
    /// Changes in tracked-attribute order
    pub changes: Vec<AttributeChange>,
}

impl ModifiedEntity {
    pub fn change(&self, attribute: &str) -> Option<&AttributeChange> {
        self.changes.iter().find(|c| c.attribute == attribute)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl DiffCounts {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// Diff of a single inventory category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDiff {
    pub kind: EntityKind,
    /// Keys only in the target, in target order
    pub added: Vec<String>,
    /// Keys only in the source, in source order
    pub removed: Vec<String>,
    /// Entities in both with differing attributes, in source order
    pub modified: Vec<ModifiedEntity>,
    pub counts: DiffCounts,
}

impl CategoryDiff {
    pub fn has_changes(&self) -> bool {
        self.counts.total() > 0
    }

    pub fn modified_entry(&self, key: &str) -> Option<&ModifiedEntity> {
        self.modified.iter().find(|m| m.key == key)
    }
}

/// Totals across all compared categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_added: usize,
    pub total_removed: usize,
    pub total_modified: usize,
    /// Number of categories with at least one change
    pub categories_changed: usize,
}

impl DiffSummary {
    fn from_categories(categories: &[CategoryDiff]) -> Self {
        categories.iter().fold(Self::default(), |mut summary, c| {
            summary.total_added += c.counts.added;
            summary.total_removed += c.counts.removed;
            summary.total_modified += c.counts.modified;
            if c.has_changes() {
                summary.categories_changed += 1;
            }
            summary
        })
    }

    pub fn total_changes(&self) -> usize {
        self.total_added + self.total_removed + self.total_modified
    }
}

/// Structured comparison of two inventories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub source: InventoryMetadata,
    pub target: InventoryMetadata,
    /// One entry per compared category, in [`EntityKind::ALL`] order
    pub categories: Vec<CategoryDiff>,
    pub summary: DiffSummary,
}

impl DiffResult {
    pub fn category(&self, kind: EntityKind) -> Option<&CategoryDiff> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    pub fn has_changes(&self) -> bool {
        self.summary.total_changes() > 0
    }

    /// Log the diff summary; callers opt in, the engine itself never logs
    pub fn log_summary(&self) {
        log::info!(
            "Diff {} -> {}: {} added, {} removed, {} modified across {} categories",
            display_source(&self.source),
            display_source(&self.target),
            self.summary.total_added,
            self.summary.total_removed,
            self.summary.total_modified,
            self.summary.categories_changed
        );
        for category in self.categories.iter().filter(|c| c.has_changes()) {
            log::debug!(
                "  {}: +{} -{} ~{}",
                category.kind,
                category.counts.added,
                category.counts.removed,
                category.counts.modified
            );
        }
    }
}

fn display_source(metadata: &InventoryMetadata) -> String {
    match &metadata.captured_at {
        Some(at) => format!("{}@{}", metadata.org_id, at.to_rfc3339()),
        None => metadata.org_id.clone(),
    }
}

/// Attributes and categories to leave out of a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// `category.attribute`, `*.attribute`, or a bare `attribute` for every
    /// category (e.g., `fields.length`, `*.label`)
    #[serde(default)]
    pub ignore_attributes: Vec<String>,
    #[serde(default)]
    pub skip_categories: Vec<EntityKind>,
}

impl DiffOptions {
    pub fn ignores(&self, kind: EntityKind, attribute: &str) -> bool {
        self.ignore_attributes.iter().any(|rule| match rule.split_once('.') {
            Some((category, attr)) => {
                attr == attribute && (category == "*" || category == kind.as_str())
            }
            None => rule == attribute,
        })
    }

    /// Category prefixes of ignore rules that name no category
    pub fn unknown_categories(&self) -> Vec<&str> {
        self.ignore_attributes
            .iter()
            .filter_map(|rule| rule.split_once('.').map(|(category, _)| category))
            .filter(|category| *category != "*" && category.parse::<EntityKind>().is_err())
            .collect()
    }

    pub fn skips(&self, kind: EntityKind) -> bool {
        self.skip_categories.contains(&kind)
    }
}

/// Compare two inventories with default options
pub fn diff(source: &Inventory, target: &Inventory) -> DiffResult {
    diff_with_options(source, target, &DiffOptions::default())
}

/// Compare two inventories
///
/// Both inventories must use the same identity-key convention per category.
/// Duplicate keys within a category are a caller error; the first
/// occurrence is used.
pub fn diff_with_options(
    source: &Inventory,
    target: &Inventory,
    options: &DiffOptions,
) -> DiffResult {
    for category in options.unknown_categories() {
        log::warn!("Ignore rule names unknown category '{}'; it has no effect", category);
    }

    let categories: Vec<CategoryDiff> = EntityKind::ALL
        .into_iter()
        .filter(|kind| !options.skips(*kind))
        .map(|kind| {
            diff_records(
                kind,
                &kind.records(source),
                &kind.records(target),
                options,
            )
        })
        .collect();

    let summary = DiffSummary::from_categories(&categories);

    DiffResult {
        source: source.metadata.clone(),
        target: target.metadata.clone(),
        categories,
        summary,
    }
}

/// Compare the records of one category
pub fn diff_records(
    kind: EntityKind,
    source: &[EntityRecord],
    target: &[EntityRecord],
    options: &DiffOptions,
) -> CategoryDiff {
    let source_map = index_by_key(source);
    let target_map = index_by_key(target);

    let mut added = Vec::new();
    let mut seen = HashSet::new();
    for record in target {
        if seen.insert(record.key.as_str()) && !source_map.contains_key(record.key.as_str()) {
            added.push(record.key.clone());
        }
    }

    let mut removed = Vec::new();
    let mut modified = Vec::new();
    let mut seen = HashSet::new();
    for record in source {
        if !seen.insert(record.key.as_str()) {
            continue;
        }
        match target_map.get(record.key.as_str()) {
            None => removed.push(record.key.clone()),
            Some(target_record) => {
                let changes = compare_attributes(kind, record, target_record, options);
                if !changes.is_empty() {
                    modified.push(ModifiedEntity {
                        key: record.key.clone(),
                        changes,
                    });
                }
            }
        }
    }

    let counts = DiffCounts {
        added: added.len(),
        removed: removed.len(),
        modified: modified.len(),
    };

    CategoryDiff {
        kind,
        added,
        removed,
        modified,
        counts,
    }
}

/// Key -> record map where the first occurrence of a key wins
fn index_by_key(records: &[EntityRecord]) -> HashMap<&str, &EntityRecord> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        map.entry(record.key.as_str()).or_insert(record);
    }
    map
}

fn compare_attributes(
    kind: EntityKind,
    source: &EntityRecord,
    target: &EntityRecord,
    options: &DiffOptions,
) -> Vec<AttributeChange> {
    source
        .attributes
        .iter()
        .filter(|(name, _)| !options.ignores(kind, name))
        .filter_map(|(name, old)| {
            let new = target.attribute(name).unwrap_or(&Value::Null);
            (old != new).then(|| AttributeChange {
                attribute: name.to_string(),
                old: old.clone(),
                new: new.clone(),
            })
        })
        .collect()
}
