// OpenAPI document model and component schema loading
use crate::error::{SchemaGenError, SchemaGenResult};
use crate::types::{component_schemas_from_value, ComponentSchemas, SchemaDefinition};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

static NO_SCHEMAS: Lazy<ComponentSchemas> = Lazy::new(ComponentSchemas::new);

/// Parsed OpenAPI document.
///
/// Every section is read leniently: a section of the wrong shape is treated
/// as absent, so only unparseable text fails to load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default, deserialize_with = "optional_text")]
    pub openapi: Option<String>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub info: Option<ApiInfo>,
    #[serde(default, deserialize_with = "lenient_servers")]
    pub servers: Vec<ServerInfo>,
    /// Path items keyed by URL template, in document order
    #[serde(default, deserialize_with = "lenient_paths")]
    pub paths: IndexMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_section")]
    pub components: Option<Components>,
}

/// The `info` section of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub version: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of the `servers` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub url: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "lenient_schemas")]
    pub schemas: ComponentSchemas,
}

/// One HTTP operation declared under `paths`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiOperation {
    pub path: String,
    /// Upper-cased HTTP method
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl OpenApiDocument {
    /// Read and parse a document from disk
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> SchemaGenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SchemaGenError::load(path, e))?;
        let document = Self::from_str(&content, path)?;
        debug!(schemas = document.schemas().len(), "Loaded OpenAPI document");
        Ok(document)
    }

    /// Parse document text; `origin` names the source in error messages.
    /// Text that is valid JSON but not an object reads as an empty document.
    pub fn from_str(text: &str, origin: impl AsRef<Path>) -> SchemaGenResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| SchemaGenError::load(&origin, e))?;
        match value {
            Value::Object(_) => serde_json::from_value(value).map_err(|e| SchemaGenError::load(&origin, e)),
            _ => Ok(Self::default()),
        }
    }

    /// Component schemas, empty when the document declares none
    pub fn schemas(&self) -> &ComponentSchemas {
        match &self.components {
            Some(components) => &components.schemas,
            None => &*NO_SCHEMAS,
        }
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas().get(name)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas().contains_key(name)
    }

    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas().keys().map(String::as_str).collect()
    }

    pub fn info(&self) -> Option<&ApiInfo> {
        self.info.as_ref()
    }

    pub fn servers(&self) -> &[ServerInfo] {
        &self.servers
    }

    pub fn paths(&self) -> &IndexMap<String, Value> {
        &self.paths
    }

    /// Every operation in path order, then method order within a path
    pub fn operations(&self) -> Vec<ApiOperation> {
        let mut operations = Vec::new();
        for (path, item) in &self.paths {
            let Some(item) = item.as_object() else {
                continue;
            };
            for (method, operation) in item {
                if method == "parameters" {
                    continue;
                }
                let Some(operation) = operation.as_object() else {
                    continue;
                };
                let text = |key: &str| operation.get(key).and_then(Value::as_str).map(str::to_string);
                operations.push(ApiOperation {
                    path: path.clone(),
                    method: method.to_uppercase(),
                    operation_id: text("operationId"),
                    summary: text("summary"),
                });
            }
        }
        operations
    }

    pub fn into_schemas(self) -> ComponentSchemas {
        self.components.map(|c| c.schemas).unwrap_or_default()
    }
}

/// Load the component schemas of the document at `path`.
///
/// Only `components/schemas` is read; a missing or null section yields an
/// empty mapping.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_component_schemas(path: impl AsRef<Path>) -> SchemaGenResult<ComponentSchemas> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| SchemaGenError::load(path, e))?;
    let mut document: Value = serde_json::from_str(&content).map_err(|e| SchemaGenError::load(path, e))?;

    let schemas = document
        .pointer_mut("/components/schemas")
        .map(Value::take)
        .map(component_schemas_from_value)
        .unwrap_or_default();
    debug!(schemas = schemas.len(), "Loaded component schemas");
    Ok(schemas)
}

fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_servers<'de, D>(deserializer: D) -> Result<Vec<ServerInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_paths<'de, D>(deserializer: D) -> Result<IndexMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => entries.into_iter().collect(),
        _ => IndexMap::new(),
    })
}

fn lenient_schemas<'de, D>(deserializer: D) -> Result<ComponentSchemas, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(component_schemas_from_value)
}

/// Strings as-is, numbers and booleans in their textual form, anything else empty
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        value @ (Value::Number(_) | Value::Bool(_)) => value.to_string(),
        _ => String::new(),
    })
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
