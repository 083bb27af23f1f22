//! Inventory parsing
//!
//! Scanner output arrives as loosely typed JSON: PascalCase and camelCase
//! keys, booleans as `"true"`, numbers as strings. Everything is normalized
//! here so the graph builder and diff engine only ever see typed values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use super::models::{FieldType, Inventory, RelationshipRef, SchemaObject};

/// Parse a scanner document into a typed inventory
pub fn parse_inventory(document: &Value) -> Result<Inventory> {
    if !document.is_object() {
        anyhow::bail!("Inventory document must be a JSON object");
    }

    let mut inventory: Inventory = serde_json::from_value(document.clone())
        .context("Inventory document does not match the expected shape")?;

    for object in &mut inventory.objects {
        derive_lookups_from_fields(object);
    }
    for rule in &mut inventory.validation_rules {
        fill_owner(&mut rule.object, &rule.name);
    }
    for rule in &mut inventory.workflow_rules {
        fill_owner(&mut rule.object, &rule.name);
    }
    for process in &mut inventory.approval_processes {
        fill_owner(&mut process.object, &process.name);
    }

    Ok(inventory)
}

/// Read and parse an inventory JSON file
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory file: {}", path.display()))?;

    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("Inventory file is not valid JSON: {}", path.display()))?;

    parse_inventory(&document)
        .with_context(|| format!("Failed to parse inventory: {}", path.display()))
}

/// Fill in relationship references from reference fields when the scanner
/// did not list them explicitly
fn derive_lookups_from_fields(object: &mut SchemaObject) {
    if !object.lookups.is_empty() {
        return;
    }

    object.lookups = object
        .fields
        .iter()
        .filter(|f| f.field_type.is_reference())
        .filter_map(|f| {
            f.reference_to.as_ref().map(|target| RelationshipRef {
                field: Some(f.name.clone()),
                target: target.clone(),
                is_master_detail: matches!(f.field_type, FieldType::MasterDetail),
            })
        })
        .collect();
}

/// Metadata API members carry only `Object.member`; take the owner from the
/// prefix
fn fill_owner(object: &mut String, name: &str) {
    if !object.is_empty() {
        return;
    }
    if let Some((owner, _)) = name.split_once('.') {
        *object = owner.to_string();
    }
}

/// Lenient deserializers for scanner values
pub(crate) mod loose {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_i64().is_some_and(|v| v != 0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" | "" => Ok(false),
                other => Err(D::Error::custom(format!("expected a boolean, got '{}'", other))),
            },
            other => Err(D::Error::custom(format!("expected a boolean, got {}", other))),
        }
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        to_u32(&value).map_err(D::Error::custom)
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        opt_count(deserializer).map(|v| v.unwrap_or(0))
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(D::Error::custom(format!("expected a string, got {}", other))),
        }
    }

    /// Object name given either directly or as a Tooling API reference
    /// (`{"DeveloperName": "Account"}`)
    pub fn object_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Object(map) => ["QualifiedApiName", "DeveloperName", "Name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .ok_or_else(|| D::Error::custom("object reference without a name")),
            other => Err(D::Error::custom(format!("expected an object name, got {}", other))),
        }
    }

    fn to_u32(value: &Value) -> Result<Option<u32>, String> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => {
                let raw = n
                    .as_u64()
                    .or_else(|| {
                        n.as_f64()
                            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                            .map(|f| f as u64)
                    })
                    .ok_or_else(|| format!("expected a non-negative integer, got {}", n))?;
                u32::try_from(raw)
                    .map(Some)
                    .map_err(|_| format!("number out of range: {}", raw))
            }
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| format!("expected a number, got '{}'", s)),
            other => Err(format!("expected a number, got {}", other)),
        }
    }
}
