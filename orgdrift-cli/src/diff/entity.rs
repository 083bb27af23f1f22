//! Entity identity and tracked attributes
//!
//! Every inventory category has a natural key and a fixed list of attributes
//! that count as "changed" when their values differ. Values are carried as
//! `serde_json::Value` so comparison is deep value equality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::inventory::{
    ApexClass, ApexTrigger, ApprovalProcess, Dashboard, FieldInfo, Flow, InstalledPackage,
    Inventory, PermissionSet, Profile, Report, SchemaObject, ValidationRule, WorkflowRule,
};

/// Inventory category, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Objects,
    Fields,
    Flows,
    ApexTriggers,
    ValidationRules,
    WorkflowRules,
    ApprovalProcesses,
    ApexClasses,
    Reports,
    Dashboards,
    Profiles,
    PermissionSets,
    Packages,
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        Self::Objects,
        Self::Fields,
        Self::Flows,
        Self::ApexTriggers,
        Self::ValidationRules,
        Self::WorkflowRules,
        Self::ApprovalProcesses,
        Self::ApexClasses,
        Self::Reports,
        Self::Dashboards,
        Self::Profiles,
        Self::PermissionSets,
        Self::Packages,
    ];

    /// Machine name, also used as the prefix in attribute ignore rules
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Objects => "objects",
            Self::Fields => "fields",
            Self::Flows => "flows",
            Self::ApexTriggers => "apex_triggers",
            Self::ValidationRules => "validation_rules",
            Self::WorkflowRules => "workflow_rules",
            Self::ApprovalProcesses => "approval_processes",
            Self::ApexClasses => "apex_classes",
            Self::Reports => "reports",
            Self::Dashboards => "dashboards",
            Self::Profiles => "profiles",
            Self::PermissionSets => "permission_sets",
            Self::Packages => "packages",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Objects => "Objects",
            Self::Fields => "Fields",
            Self::Flows => "Flows",
            Self::ApexTriggers => "Apex Triggers",
            Self::ValidationRules => "Validation Rules",
            Self::WorkflowRules => "Workflow Rules",
            Self::ApprovalProcesses => "Approval Processes",
            Self::ApexClasses => "Apex Classes",
            Self::Reports => "Reports",
            Self::Dashboards => "Dashboards",
            Self::Profiles => "Profiles",
            Self::PermissionSets => "Permission Sets",
            Self::Packages => "Packages",
        }
    }

    /// Key/attribute records for this category of an inventory, in
    /// inventory order
    pub fn records(&self, inventory: &Inventory) -> Vec<EntityRecord> {
        match self {
            Self::Objects => inventory
                .objects
                .iter()
                .map(|object| InventoryObject { object, inventory }.record())
                .collect(),
            Self::Fields => inventory
                .fields()
                .map(|(object, field)| QualifiedField { object, field }.record())
                .collect(),
            Self::Flows => collect(&inventory.flows),
            Self::ApexTriggers => collect(&inventory.apex_triggers),
            Self::ValidationRules => collect(&inventory.validation_rules),
            Self::WorkflowRules => collect(&inventory.workflow_rules),
            Self::ApprovalProcesses => collect(&inventory.approval_processes),
            Self::ApexClasses => collect(&inventory.apex_classes),
            Self::Reports => collect(&inventory.reports),
            Self::Dashboards => collect(&inventory.dashboards),
            Self::Profiles => collect(&inventory.profiles),
            Self::PermissionSets => collect(&inventory.permission_sets),
            Self::Packages => collect(&inventory.packages),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| format!("Unknown inventory category: {}", s))
    }
}

/// One entity reduced to its identity and tracked attributes
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub key: String,
    pub attributes: Vec<(&'static str, Value)>,
}

impl EntityRecord {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Identity and comparison schema of an inventory entity
pub trait Entity {
    /// Natural key, unique within the entity's category
    fn key(&self) -> String;

    /// Tracked attributes in a fixed order
    fn attributes(&self) -> Vec<(&'static str, Value)>;

    fn record(&self) -> EntityRecord {
        EntityRecord {
            key: self.key(),
            attributes: self.attributes(),
        }
    }
}

fn collect<T: Entity>(items: &[T]) -> Vec<EntityRecord> {
    items.iter().map(Entity::record).collect()
}

/// `Object.member` key, unless the scanner already qualified the name
fn qualified(object: &str, name: &str) -> String {
    if object.is_empty() || name.contains('.') {
        name.to_string()
    } else {
        format!("{}.{}", object, name)
    }
}

/// A schema object together with the inventory its automation counts are
/// derived from
pub struct InventoryObject<'a> {
    pub object: &'a SchemaObject,
    pub inventory: &'a Inventory,
}

impl Entity for InventoryObject<'_> {
    fn key(&self) -> String {
        self.object.name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        let (object, inventory) = (self.object, self.inventory);
        vec![
            ("label", json!(object.label)),
            ("custom", json!(object.custom)),
            ("field_count", json!(object.effective_field_count())),
            ("trigger_count", json!(object.effective_trigger_count(inventory))),
            ("flow_count", json!(object.effective_flow_count(inventory))),
            (
                "validation_rule_count",
                json!(object.effective_validation_rule_count(inventory)),
            ),
        ]
    }
}

/// A field together with its owning object
pub struct QualifiedField<'a> {
    pub object: &'a SchemaObject,
    pub field: &'a FieldInfo,
}

impl Entity for QualifiedField<'_> {
    fn key(&self) -> String {
        qualified(&self.object.name, &self.field.name)
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        let field = self.field;
        vec![
            ("label", json!(field.label)),
            ("type", json!(field.field_type.as_str())),
            ("length", json!(field.length)),
            ("required", json!(field.required)),
            ("nillable", json!(field.nillable)),
            ("external_id", json!(field.external_id)),
            ("reference_to", json!(field.reference_to)),
        ]
    }
}

impl Entity for Flow {
    fn key(&self) -> String {
        self.api_name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("label", json!(self.label)),
            ("process_type", json!(self.process_type)),
            ("status", json!(self.status)),
            ("active_version_id", json!(self.active_version_id)),
            ("trigger_object", json!(self.trigger_object)),
        ]
    }
}

impl Entity for ApexTrigger {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("object", json!(self.object)),
            ("status", json!(self.status)),
            ("api_version", json!(self.api_version)),
            ("events", json!(self.events)),
        ]
    }
}

impl Entity for ValidationRule {
    fn key(&self) -> String {
        qualified(&self.object, &self.name)
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("active", json!(self.active)),
            ("error_message", json!(self.error_message)),
            ("error_display_field", json!(self.error_display_field)),
        ]
    }
}

impl Entity for WorkflowRule {
    fn key(&self) -> String {
        qualified(&self.object, &self.name)
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("active", json!(self.active)),
            ("trigger_type", json!(self.trigger_type)),
        ]
    }
}

impl Entity for ApprovalProcess {
    fn key(&self) -> String {
        qualified(&self.object, &self.name)
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("active", json!(self.active)),
            ("description", json!(self.description)),
        ]
    }
}

impl Entity for ApexClass {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("status", json!(self.status)),
            ("api_version", json!(self.api_version)),
            ("length_without_comments", json!(self.length_without_comments)),
            ("is_test", json!(self.is_test)),
        ]
    }
}

impl Entity for Report {
    fn key(&self) -> String {
        self.developer_name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", json!(self.name)),
            ("folder", json!(self.folder)),
            ("format", json!(self.format)),
            ("report_type", json!(self.report_type)),
        ]
    }
}

impl Entity for Dashboard {
    fn key(&self) -> String {
        self.developer_name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("title", json!(self.title)),
            ("folder", json!(self.folder)),
            ("running_user", json!(self.running_user)),
        ]
    }
}

impl Entity for Profile {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("user_license", json!(self.user_license)),
            ("custom", json!(self.custom)),
            ("user_count", json!(self.user_count)),
        ]
    }
}

impl Entity for PermissionSet {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("label", json!(self.label)),
            ("license", json!(self.license)),
            ("custom", json!(self.custom)),
            ("assignment_count", json!(self.assignment_count)),
        ]
    }
}

impl Entity for InstalledPackage {
    fn key(&self) -> String {
        self.namespace.clone()
    }

    fn attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", json!(self.name)),
            ("version", json!(self.version)),
            ("publisher", json!(self.publisher)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::FieldType;

    fn make_trigger(name: &str, object: &str) -> ApexTrigger {
        ApexTrigger {
            name: name.to_string(),
            object: Some(object.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert_eq!("Validation-Rules".parse::<EntityKind>().unwrap(), EntityKind::ValidationRules);
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_field_key_is_qualified() {
        let object = SchemaObject {
            name: "Account".to_string(),
            ..Default::default()
        };
        let field = FieldInfo {
            name: "Industry".to_string(),
            field_type: FieldType::Picklist,
            ..Default::default()
        };

        let record = QualifiedField { object: &object, field: &field }.record();

        assert_eq!(record.key, "Account.Industry");
        assert_eq!(record.attribute("type"), Some(&json!("picklist")));
    }

    #[test]
    fn test_prequalified_rule_name_kept() {
        let rule = ValidationRule {
            object: "Account".to_string(),
            name: "Account.Require_Phone".to_string(),
            ..Default::default()
        };

        assert_eq!(rule.key(), "Account.Require_Phone");
    }

    #[test]
    fn test_object_field_count_falls_back_to_fields() {
        let object = SchemaObject {
            name: "Account".to_string(),
            fields: vec![FieldInfo::default(), FieldInfo::default()],
            ..Default::default()
        };
        let inventory = Inventory::default();

        let record = InventoryObject { object: &object, inventory: &inventory }.record();

        assert_eq!(record.attribute("field_count"), Some(&json!(2)));
    }

    #[test]
    fn test_object_automation_counts_fall_back_to_inventory() {
        let inventory = Inventory {
            objects: vec![SchemaObject {
                name: "Account".to_string(),
                ..Default::default()
            }],
            apex_triggers: vec![
                make_trigger("AccountTrigger", "Account"),
                make_trigger("CaseTrigger", "Case"),
            ],
            flows: vec![Flow {
                api_name: "Account_Onboarding".to_string(),
                trigger_object: Some("Account".to_string()),
                ..Default::default()
            }],
            validation_rules: vec![ValidationRule {
                object: "Account".to_string(),
                name: "Require_Phone".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let record = &EntityKind::Objects.records(&inventory)[0];

        assert_eq!(record.attribute("trigger_count"), Some(&json!(1)));
        assert_eq!(record.attribute("flow_count"), Some(&json!(1)));
        assert_eq!(record.attribute("validation_rule_count"), Some(&json!(1)));
    }

    #[test]
    fn test_scanner_automation_counts_win() {
        let object = SchemaObject {
            name: "Account".to_string(),
            trigger_count: Some(4),
            ..Default::default()
        };
        let inventory = Inventory {
            apex_triggers: vec![make_trigger("AccountTrigger", "Account")],
            ..Default::default()
        };

        assert_eq!(object.effective_trigger_count(&inventory), 4);
    }

    #[test]
    fn test_records_follow_inventory_order() {
        let inventory = Inventory {
            flows: vec![
                Flow { api_name: "B_Flow".to_string(), ..Default::default() },
                Flow { api_name: "A_Flow".to_string(), ..Default::default() },
            ],
            ..Default::default()
        };

        let keys: Vec<_> = EntityKind::Flows
            .records(&inventory)
            .into_iter()
            .map(|r| r.key)
            .collect();

        assert_eq!(keys, vec!["B_Flow", "A_Flow"]);
    }
}
