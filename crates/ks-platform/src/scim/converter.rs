//! SCIM <-> native JSON conversion
//!
//! All converters are pure functions over `serde_json::Value`. Single-entity
//! results drop top-level keys whose value is null or an empty string, array
//! or object. Booleans survive even when `false`.

use serde_json::{json, Map, Value};

/// Separator between the domain and the name of a domain-scoped role
pub const ROLE_SEPARATOR: char = '#';

/// Keystone extension schema URN
pub const EXTENSION_SCHEMA: &str = "urn:scim:schemas:extension:keystone:1.0";

fn core_schema(path: &str) -> String {
    let version = if path.contains("v2") { "2.0" } else { "1.1" };
    format!("urn:scim:schemas:core:{}", version)
}

fn schemas(schema: bool, path: &str) -> Value {
    if schema {
        json!([core_schema(path), EXTENSION_SCHEMA])
    } else {
        Value::Null
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn compact(fields: Vec<(&str, Value)>) -> Value {
    Value::Object(
        fields
            .into_iter()
            .filter(|(_, v)| !is_empty(v))
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn field(source: &Value, key: &str) -> Value {
    source.get(key).cloned().unwrap_or(Value::Null)
}

fn extension(reference: &Value) -> Value {
    json!({ "domain_id": field(reference, "domain_id") })
}

fn extension_domain(scim: &Value) -> Value {
    scim.get(EXTENSION_SCHEMA)
        .map(|ext| field(ext, "domain_id"))
        .unwrap_or(Value::Null)
}

fn page_path(page_info: &Map<String, Value>) -> &str {
    page_info.get("path").and_then(Value::as_str).unwrap_or_default()
}

fn list_document(schemas: Value, resources: Vec<Value>, page_info: &Map<String, Value>) -> Value {
    let mut doc = Map::new();
    doc.insert("schemas".to_string(), schemas);
    doc.insert("Resources".to_string(), Value::Array(resources));
    for (key, value) in page_info {
        doc.insert(key.clone(), value.clone());
    }
    Value::Object(doc)
}

// ----------------------------------------------------------------------
// Users
// ----------------------------------------------------------------------

pub fn user_to_scim(reference: &Value, schema: bool, path: &str) -> Value {
    let emails = match reference.get("email") {
        Some(email) => json!([{ "value": email }]),
        None => Value::Null,
    };

    compact(vec![
        ("schemas", schemas(schema, path)),
        ("id", field(reference, "id")),
        ("userName", field(reference, "name")),
        ("displayName", field(reference, "description")),
        ("active", field(reference, "enabled")),
        ("emails", emails),
        (EXTENSION_SCHEMA, extension(reference)),
    ])
}

pub fn user_from_scim(scim: &Value) -> Value {
    let email = scim
        .get("emails")
        .and_then(|emails| emails.get(0))
        .map(|first| field(first, "value"))
        .unwrap_or(Value::Null);

    compact(vec![
        ("domain_id", extension_domain(scim)),
        ("email", email),
        ("id", field(scim, "id")),
        ("enabled", field(scim, "active")),
        ("name", field(scim, "userName")),
        ("description", field(scim, "displayName")),
        ("password", field(scim, "password")),
    ])
}

pub fn list_users_to_scim(references: &[Value], page_info: &Map<String, Value>) -> Value {
    let path = page_path(page_info);
    let resources = references
        .iter()
        .map(|r| user_to_scim(r, false, path))
        .collect();
    list_document(schemas(true, path), resources, page_info)
}

// ----------------------------------------------------------------------
// Roles
// ----------------------------------------------------------------------

/// `{domain_id, name}` is folded into a single `<domain_id>#<name>` role name.
pub fn role_from_scim(scim: &Value) -> Value {
    let domain = scim
        .get("domain_id")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty());

    let name = match (domain, scim.get("name").and_then(Value::as_str)) {
        (Some(domain), Some(name)) => json!(format!("{}{}{}", domain, ROLE_SEPARATOR, name)),
        _ => field(scim, "name"),
    };

    compact(vec![("id", field(scim, "id")), ("name", name)])
}

pub fn role_to_scim(reference: &Value, schema: bool) -> Value {
    let full_name = reference.get("name").and_then(Value::as_str).unwrap_or_default();
    let (domain, name) = match full_name.split_once(ROLE_SEPARATOR) {
        Some((domain, name)) => (json!(domain), json!(name)),
        None => (Value::Null, json!(full_name)),
    };

    let schemas = if schema { json!([EXTENSION_SCHEMA]) } else { Value::Null };

    compact(vec![
        ("schemas", schemas),
        ("id", field(reference, "id")),
        ("name", name),
        ("domain_id", domain),
    ])
}

pub fn list_roles_to_scim(references: &[Value], page_info: &Map<String, Value>) -> Value {
    let resources = references.iter().map(|r| role_to_scim(r, false)).collect();
    list_document(json!([EXTENSION_SCHEMA]), resources, page_info)
}

// ----------------------------------------------------------------------
// Groups
// ----------------------------------------------------------------------

pub fn group_to_scim(reference: &Value, schema: bool, path: &str) -> Value {
    compact(vec![
        ("schemas", schemas(schema, path)),
        ("id", field(reference, "id")),
        ("displayName", field(reference, "name")),
        (EXTENSION_SCHEMA, extension(reference)),
    ])
}

pub fn group_from_scim(scim: &Value) -> Value {
    compact(vec![
        ("domain_id", extension_domain(scim)),
        ("id", field(scim, "id")),
        ("name", field(scim, "displayName")),
    ])
}

pub fn list_groups_to_scim(references: &[Value], page_info: &Map<String, Value>) -> Value {
    let path = page_path(page_info);
    let resources = references
        .iter()
        .map(|r| group_to_scim(r, false, path))
        .collect();
    list_document(schemas(true, path), resources, page_info)
}

// ----------------------------------------------------------------------
// Organizations
// ----------------------------------------------------------------------

pub fn organization_to_scim(reference: &Value, schema: bool, path: &str) -> Value {
    compact(vec![
        ("schemas", schemas(schema, path)),
        ("id", field(reference, "id")),
        ("name", field(reference, "name")),
        ("description", field(reference, "description")),
        ("active", field(reference, "enabled")),
        ("is_default", field(reference, "is_default")),
        (EXTENSION_SCHEMA, extension(reference)),
    ])
}

pub fn organization_from_scim(scim: &Value) -> Value {
    compact(vec![
        ("domain_id", extension_domain(scim)),
        ("id", field(scim, "id")),
        ("enabled", field(scim, "active")),
        ("name", field(scim, "name")),
        ("description", field(scim, "description")),
        ("is_default", field(scim, "is_default")),
    ])
}

pub fn list_organizations_to_scim(references: &[Value], page_info: &Map<String, Value>) -> Value {
    let path = page_path(page_info);
    let resources = references
        .iter()
        .map(|r| organization_to_scim(r, false, path))
        .collect();
    list_document(schemas(true, path), resources, page_info)
}
