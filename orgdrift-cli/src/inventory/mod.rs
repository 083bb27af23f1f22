//! Inventory module
//!
//! Typed point-in-time captures of a platform's metadata, plus the boundary
//! that turns scanner JSON into them.

pub mod models;
pub mod parse;
pub mod validate;

pub use models::{
    ApexClass, ApexTrigger, ApprovalProcess, Dashboard, FieldInfo, FieldType, Flow,
    InstalledPackage, Inventory, InventoryMetadata, PermissionSet, Profile, RelationshipRef,
    Report, SchemaObject, ValidationRule, WorkflowRule,
};
pub use parse::{load_inventory, parse_inventory};
pub use validate::{InventoryIssue, IssueSeverity, has_errors, validate_inventory};
