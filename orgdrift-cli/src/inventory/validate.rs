//! Inventory well-formedness checks
//!
//! The graph builder and diff engine assume unique keys per category and do
//! not check. Callers that want to catch a malformed scan early run these
//! checks first.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::models::Inventory;
use crate::diff::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// Breaks the unique-key precondition
    Error,
    /// Expected with partial scope, reported for completeness
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryIssue {
    DuplicateKey { kind: EntityKind, key: String },
    EmptyKey { kind: EntityKind, position: usize },
    DanglingReference { object: String, target: String },
}

impl InventoryIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Self::DuplicateKey { .. } | Self::EmptyKey { .. } => IssueSeverity::Error,
            Self::DanglingReference { .. } => IssueSeverity::Info,
        }
    }
}

impl fmt::Display for InventoryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey { kind, key } => {
                write!(f, "Duplicate key in {}: {}", kind, key)
            }
            Self::EmptyKey { kind, position } => {
                write!(f, "Empty key in {} at position {}", kind, position)
            }
            Self::DanglingReference { object, target } => {
                write!(f, "{} references {} which is not in the inventory", object, target)
            }
        }
    }
}

/// Check an inventory for key collisions and dangling references
pub fn validate_inventory(inventory: &Inventory) -> Vec<InventoryIssue> {
    let mut issues = Vec::new();

    for kind in EntityKind::ALL {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for (position, record) in kind.records(inventory).into_iter().enumerate() {
            if record.key.trim().is_empty() {
                issues.push(InventoryIssue::EmptyKey { kind, position });
                continue;
            }
            if !seen.insert(record.key.clone()) && reported.insert(record.key.clone()) {
                issues.push(InventoryIssue::DuplicateKey {
                    kind,
                    key: record.key,
                });
            }
        }
    }

    let names: HashSet<&str> = inventory.objects.iter().map(|o| o.name.as_str()).collect();
    for object in &inventory.objects {
        for lookup in &object.lookups {
            if !names.contains(lookup.target.as_str()) {
                issues.push(InventoryIssue::DanglingReference {
                    object: object.name.clone(),
                    target: lookup.target.clone(),
                });
            }
        }
    }

    issues
}

/// Whether any issue breaks the unique-key precondition
pub fn has_errors(issues: &[InventoryIssue]) -> bool {
    issues.iter().any(|i| i.severity() == IssueSeverity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{FieldInfo, Flow, RelationshipRef, SchemaObject};

    fn make_object(name: &str, targets: &[&str]) -> SchemaObject {
        SchemaObject {
            name: name.to_string(),
            lookups: targets
                .iter()
                .map(|t| RelationshipRef {
                    field: None,
                    target: t.to_string(),
                    is_master_detail: false,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_inventory() {
        let inventory = Inventory {
            objects: vec![make_object("Account", &[]), make_object("Contact", &["Account"])],
            ..Default::default()
        };

        assert!(validate_inventory(&inventory).is_empty());
    }

    #[test]
    fn test_duplicate_keys_reported_once() {
        let inventory = Inventory {
            flows: vec![
                Flow { api_name: "Onboarding".to_string(), ..Default::default() },
                Flow { api_name: "Onboarding".to_string(), ..Default::default() },
                Flow { api_name: "Onboarding".to_string(), ..Default::default() },
            ],
            ..Default::default()
        };

        let issues = validate_inventory(&inventory);

        assert_eq!(
            issues,
            vec![InventoryIssue::DuplicateKey {
                kind: EntityKind::Flows,
                key: "Onboarding".to_string(),
            }]
        );
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_duplicate_field_within_object() {
        let mut account = make_object("Account", &[]);
        account.fields = vec![
            FieldInfo { name: "Name".to_string(), ..Default::default() },
            FieldInfo { name: "Name".to_string(), ..Default::default() },
        ];
        let inventory = Inventory {
            objects: vec![account],
            ..Default::default()
        };

        let issues = validate_inventory(&inventory);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "Duplicate key in fields: Account.Name");
    }

    #[test]
    fn test_dangling_reference_is_informational() {
        let inventory = Inventory {
            objects: vec![make_object("Case", &["User"])],
            ..Default::default()
        };

        let issues = validate_inventory(&inventory);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), IssueSeverity::Info);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_empty_key() {
        let inventory = Inventory {
            objects: vec![make_object("", &[])],
            ..Default::default()
        };

        let issues = validate_inventory(&inventory);

        assert!(issues.contains(&InventoryIssue::EmptyKey {
            kind: EntityKind::Objects,
            position: 0,
        }));
    }
}
