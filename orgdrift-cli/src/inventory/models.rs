//! Inventory metadata models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse::loose;

/// Where and when an inventory was captured
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryMetadata {
    /// Organization id of the scanned platform instance
    #[serde(default, alias = "orgId", alias = "OrganizationId")]
    pub org_id: String,
    /// Instance name or URL host (e.g., "acme.my.example.com")
    #[serde(default, alias = "instanceUrl", alias = "instance_url")]
    pub instance: Option<String>,
    #[serde(default, alias = "capturedAt", alias = "scanned_at", alias = "timestamp")]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "apiVersion",
        deserialize_with = "loose::opt_text"
    )]
    pub api_version: Option<String>,
}

/// One point-in-time capture of a platform's metadata
///
/// Missing collections deserialize as empty. Fields are not a top-level
/// collection: they live on their owning [`SchemaObject`] and are diffed
/// under their qualified `Object.field` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub metadata: InventoryMetadata,
    #[serde(default, alias = "sobjects")]
    pub objects: Vec<SchemaObject>,
    #[serde(default)]
    pub flows: Vec<Flow>,
    #[serde(default, alias = "triggers")]
    pub apex_triggers: Vec<ApexTrigger>,
    #[serde(default, alias = "validationRules")]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default, alias = "workflowRules")]
    pub workflow_rules: Vec<WorkflowRule>,
    #[serde(default, alias = "approvalProcesses")]
    pub approval_processes: Vec<ApprovalProcess>,
    #[serde(default, alias = "apexClasses", alias = "classes")]
    pub apex_classes: Vec<ApexClass>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub dashboards: Vec<Dashboard>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default, alias = "permissionSets")]
    pub permission_sets: Vec<PermissionSet>,
    #[serde(default, alias = "installedPackages")]
    pub packages: Vec<InstalledPackage>,
}

impl Inventory {
    /// All fields of all objects, paired with their owning object
    pub fn fields(&self) -> impl Iterator<Item = (&SchemaObject, &FieldInfo)> {
        self.objects
            .iter()
            .flat_map(|o| o.fields.iter().map(move |f| (o, f)))
    }
}

/// A schema object (standard or custom table)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// API name (e.g., "Account", "Invoice__c")
    #[serde(alias = "QualifiedApiName", alias = "apiName", alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "Label")]
    pub label: Option<String>,
    #[serde(default, alias = "IsCustom", deserialize_with = "loose::flag")]
    pub custom: bool,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    /// Outgoing relationship references. Targets are names only and may
    /// point at objects outside the scanned set.
    #[serde(default, alias = "relationships", alias = "references")]
    pub lookups: Vec<RelationshipRef>,
    /// Field count reported by the scanner; falls back to `fields.len()`
    #[serde(default, alias = "fieldCount", deserialize_with = "loose::opt_count")]
    pub field_count: Option<u32>,
    /// Automation counts reported by the scanner; each falls back to the
    /// inventory's own items attached to this object
    #[serde(default, alias = "triggerCount", deserialize_with = "loose::opt_count")]
    pub trigger_count: Option<u32>,
    #[serde(default, alias = "flowCount", deserialize_with = "loose::opt_count")]
    pub flow_count: Option<u32>,
    #[serde(default, alias = "validationRuleCount", deserialize_with = "loose::opt_count")]
    pub validation_rule_count: Option<u32>,
}

impl SchemaObject {
    /// Field count, preferring the scanner's figure over the listed fields
    pub fn effective_field_count(&self) -> u32 {
        self.field_count.unwrap_or_else(|| saturating_count(self.fields.len()))
    }

    pub fn effective_trigger_count(&self, inventory: &Inventory) -> u32 {
        self.trigger_count.unwrap_or_else(|| {
            saturating_count(
                inventory
                    .apex_triggers
                    .iter()
                    .filter(|t| t.object.as_deref() == Some(self.name.as_str()))
                    .count(),
            )
        })
    }

    pub fn effective_flow_count(&self, inventory: &Inventory) -> u32 {
        self.flow_count.unwrap_or_else(|| {
            saturating_count(
                inventory
                    .flows
                    .iter()
                    .filter(|f| f.trigger_object.as_deref() == Some(self.name.as_str()))
                    .count(),
            )
        })
    }

    pub fn effective_validation_rule_count(&self, inventory: &Inventory) -> u32 {
        self.validation_rule_count.unwrap_or_else(|| {
            saturating_count(
                inventory
                    .validation_rules
                    .iter()
                    .filter(|r| r.object == self.name)
                    .count(),
            )
        })
    }

    /// Display label, falling back to the API name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A weak, by-name pointer from one schema object to another
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipRef {
    /// Lookup field carrying the reference, when known
    #[serde(default, alias = "fieldName")]
    pub field: Option<String>,
    #[serde(alias = "referenceTo", alias = "targetObject")]
    pub target: String,
    #[serde(default, alias = "isMasterDetail", deserialize_with = "loose::flag")]
    pub is_master_detail: bool,
}

/// Field metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(alias = "QualifiedApiName", alias = "apiName", alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "Label")]
    pub label: Option<String>,
    #[serde(default, rename = "type", alias = "field_type", alias = "DataType")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "loose::opt_count")]
    pub length: Option<u32>,
    #[serde(default, deserialize_with = "loose::flag")]
    pub required: bool,
    #[serde(default = "default_true", deserialize_with = "loose::flag")]
    pub nillable: bool,
    #[serde(default, alias = "externalId", deserialize_with = "loose::flag")]
    pub external_id: bool,
    /// Target object for lookup and master-detail fields
    #[serde(default, alias = "referenceTo")]
    pub reference_to: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Field data types
///
/// Serialized as the platform's lowercase type name so unknown types
/// survive a round trip through [`FieldType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    String,
    TextArea,
    Integer,
    Double,
    Currency,
    Percent,
    Boolean,
    Date,
    DateTime,
    Picklist,
    MultiPicklist,
    Lookup,
    MasterDetail,
    Email,
    Phone,
    Url,
    Id,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::TextArea => "textarea",
            Self::Integer => "int",
            Self::Double => "double",
            Self::Currency => "currency",
            Self::Percent => "percent",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Picklist => "picklist",
            Self::MultiPicklist => "multipicklist",
            Self::Lookup => "reference",
            Self::MasterDetail => "masterdetail",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Id => "id",
            Self::Other(s) => s,
        }
    }

    /// Whether the field points at another object
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Lookup | Self::MasterDetail)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "string" | "text" => Self::String,
            "textarea" | "longtextarea" | "richtextarea" => Self::TextArea,
            "int" | "integer" => Self::Integer,
            "double" | "number" => Self::Double,
            "currency" => Self::Currency,
            "percent" => Self::Percent,
            "boolean" | "checkbox" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "picklist" => Self::Picklist,
            "multipicklist" => Self::MultiPicklist,
            "reference" | "lookup" => Self::Lookup,
            "masterdetail" | "master-detail" => Self::MasterDetail,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "url" => Self::Url,
            "id" => Self::Id,
            _ => Self::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// Flow (declarative automation) definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(alias = "ApiName", alias = "DeveloperName", alias = "fullName")]
    pub api_name: String,
    #[serde(default, alias = "Label", alias = "MasterLabel")]
    pub label: Option<String>,
    #[serde(default, alias = "ProcessType", alias = "processType")]
    pub process_type: Option<String>,
    /// Draft, Active, Obsolete, ...
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "ActiveVersionId", alias = "activeVersionId")]
    pub active_version_id: Option<String>,
    #[serde(default, alias = "TriggerObject", alias = "triggerObject")]
    pub trigger_object: Option<String>,
}

/// Code trigger attached to a schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApexTrigger {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "TableEnumOrId", alias = "sobject")]
    pub object: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "ApiVersion", deserialize_with = "loose::opt_text")]
    pub api_version: Option<String>,
    /// Trigger events (e.g., "before insert")
    #[serde(default)]
    pub events: Vec<String>,
}

/// Validation rule on a schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Owning object; filled from a qualified `Object.name` when absent
    #[serde(
        default,
        alias = "EntityDefinition",
        alias = "sobject",
        deserialize_with = "loose::object_name"
    )]
    pub object: String,
    #[serde(alias = "ValidationName", alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "Active", deserialize_with = "loose::flag")]
    pub active: bool,
    #[serde(default, alias = "ErrorMessage", alias = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(default, alias = "ErrorDisplayField", alias = "errorDisplayField")]
    pub error_display_field: Option<String>,
}

/// Legacy workflow rule on a schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRule {
    /// Owning object; filled from a qualified `Object.name` when absent
    #[serde(
        default,
        alias = "TableEnumOrId",
        alias = "sobject",
        deserialize_with = "loose::object_name"
    )]
    pub object: String,
    #[serde(alias = "Name", alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "Active", deserialize_with = "loose::flag")]
    pub active: bool,
    #[serde(default, alias = "TriggerType", alias = "triggerType")]
    pub trigger_type: Option<String>,
}

/// Approval process on a schema object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalProcess {
    /// Owning object; filled from a qualified `Object.name` when absent
    #[serde(
        default,
        alias = "TableEnumOrId",
        alias = "sobject",
        deserialize_with = "loose::object_name"
    )]
    pub object: String,
    #[serde(alias = "DeveloperName", alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "Active", deserialize_with = "loose::flag")]
    pub active: bool,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
}

/// Code class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApexClass {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "ApiVersion", deserialize_with = "loose::opt_text")]
    pub api_version: Option<String>,
    #[serde(
        default,
        alias = "LengthWithoutComments",
        alias = "lengthWithoutComments",
        deserialize_with = "loose::opt_count"
    )]
    pub length_without_comments: Option<u32>,
    #[serde(default, alias = "isTest", deserialize_with = "loose::flag")]
    pub is_test: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(alias = "DeveloperName")]
    pub developer_name: String,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "FolderName", alias = "folderName")]
    pub folder: Option<String>,
    /// Tabular, Summary, Matrix, ...
    #[serde(default, alias = "Format")]
    pub format: Option<String>,
    #[serde(default, alias = "ReportTypeApiName", alias = "reportType")]
    pub report_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(alias = "DeveloperName")]
    pub developer_name: String,
    #[serde(default, alias = "Title")]
    pub title: Option<String>,
    #[serde(default, alias = "FolderName", alias = "folderName")]
    pub folder: Option<String>,
    #[serde(default, alias = "RunningUserId", alias = "runningUser")]
    pub running_user: Option<String>,
}

/// User profile (access and ownership)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "UserLicense", alias = "userLicense")]
    pub user_license: Option<String>,
    #[serde(default, alias = "IsCustom", deserialize_with = "loose::flag")]
    pub custom: bool,
    #[serde(default, alias = "userCount", deserialize_with = "loose::count")]
    pub user_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Label")]
    pub label: Option<String>,
    #[serde(default, alias = "License")]
    pub license: Option<String>,
    #[serde(default, alias = "IsCustom", deserialize_with = "loose::flag")]
    pub custom: bool,
    #[serde(default, alias = "assignmentCount", deserialize_with = "loose::count")]
    pub assignment_count: u32,
}

/// Managed or unlocked package installed in the org
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstalledPackage {
    #[serde(alias = "NamespacePrefix", alias = "namespacePrefix")]
    pub namespace: String,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "VersionNumber", deserialize_with = "loose::opt_text")]
    pub version: Option<String>,
    #[serde(default, alias = "Publisher")]
    pub publisher: Option<String>,
}
