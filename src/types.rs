use crate::error::{SchemaGenError, SchemaGenResult};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// Named object schemas found under `components/schemas`, in document order
pub type ComponentSchemas = IndexMap<String, SchemaDefinition>;

/// Declarative description of one entity's shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Declared schema type (normally "object")
    #[serde(rename = "type", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Property schemas keyed by property name
    #[serde(default, deserialize_with = "lenient_properties", skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, PropertySchema>>,
    /// Names of the required properties
    #[serde(default, deserialize_with = "lenient_string_list", skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaDefinition {
    /// Whether a property is required, by its original name or its column name
    pub fn is_required(&self, property_name: &str, column_name: &str) -> bool {
        self.required
            .iter()
            .any(|name| name == property_name || name == column_name)
    }
}

/// Schema of a single property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", default, deserialize_with = "lenient_array", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// `Some(Value::Null)` is an explicit null default, `None` means no default
    #[serde(default, deserialize_with = "explicit_value", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "$ref", default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
}

impl PropertySchema {
    pub fn has_type(&self, schema_type: &str) -> bool {
        self.schema_type.as_deref() == Some(schema_type)
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.format.as_deref() == Some(format)
    }

    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    pub fn is_date(&self) -> bool {
        self.has_type("string") && (self.has_format("date") || self.has_format("date-time"))
    }
}

/// Component schemas from the value found at `components/schemas`.
/// Anything but an object yields an empty mapping.
pub fn component_schemas_from_value(value: Value) -> ComponentSchemas {
    match value {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(name, schema)| (name, schema_or_default(schema)))
            .collect(),
        _ => ComponentSchemas::new(),
    }
}

/// Non-object schemas (such as boolean schemas) read as the empty schema
fn schema_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

fn lenient_properties<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, PropertySchema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(entries) => Some(
            entries
                .into_iter()
                .map(|(name, prop)| (name, schema_or_default(prop)))
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Box<PropertySchema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(Box::new(schema_or_default(other))),
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_array<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => Some(values),
        _ => None,
    })
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn explicit_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Options controlling DDL generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// Emit the engine-tuning pragma block
    pub include_file_pragmas: bool,
    /// Append created_at/updated_at columns to every table
    pub include_timestamps: bool,
    /// Emit index statements after the tables
    pub include_indexes: bool,
    /// Text primary keys and WITHOUT ROWID tables
    pub use_strict_mode: bool,
    /// Explicit table names keyed by schema name
    pub table_name_map: IndexMap<String, String>,
    /// Schemas to drop, applied after the allow-list
    pub exclude_schemas: Vec<String>,
    /// Allow-list of schemas, ignored when empty
    pub include_schemas: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            include_file_pragmas: true,
            include_timestamps: true,
            include_indexes: true,
            use_strict_mode: false,
            table_name_map: IndexMap::new(),
            exclude_schemas: Vec::new(),
            include_schemas: Vec::new(),
        }
    }
}

impl GenerationOptions {
    /// Load options from a JSON file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> SchemaGenResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaGenError::config(format!("cannot read options file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SchemaGenError::config(format!("invalid options file {}: {}", path.display(), e))
        })
    }
}

/// SQLite column storage types produced by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqliteType {
    Integer,
    Real,
    Text,
}

impl SqliteType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SqliteType::Integer => "INTEGER",
            SqliteType::Real => "REAL",
            SqliteType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqliteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// Generated table definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// Column definitions, primary key first
    pub columns: Vec<ColumnDefinition>,
    /// Foreign key constraints, rendered after the columns
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    /// Whether the table is declared WITHOUT ROWID
    pub without_rowid: bool,
}

impl TableDefinition {
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Render the CREATE TABLE statement
    pub fn to_sql(&self) -> String {
        let entries: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("  {}", c.to_sql()))
            .chain(self.foreign_keys.iter().map(|fk| format!("  {}", fk.to_sql())))
            .collect();
        let suffix = if self.without_rowid { " WITHOUT ROWID" } else { "" };
        format!("CREATE TABLE {} (\n{}\n){};", self.name, entries.join(",\n"), suffix)
    }
}

/// Generated column definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: SqliteType,
    pub primary_key: bool,
    pub not_null: bool,
    /// Rendered SQL default (literal or parenthesized expression)
    pub default_value: Option<String>,
}

impl ColumnDefinition {
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.column_type);
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default_value) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default_value);
        }
        sql
    }
}

/// Foreign key from a column to another table's `id`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyDefinition {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

impl ForeignKeyDefinition {
    pub fn to_sql(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.column, self.referenced_table, self.referenced_column
        )
    }
}

/// Why an index was generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexReason {
    ForeignKey,
    BusinessStatus,
    UniqueEmail,
    Searchable,
    Filterable,
    BusinessDate,
}

/// Single-column index definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDefinition {
    pub name: String,
    pub table: String,
    pub column: String,
    pub unique: bool,
    pub reason: IndexReason,
}

impl IndexDefinition {
    pub fn to_sql(&self) -> String {
        let kind = if self.unique { "UNIQUE INDEX" } else { "INDEX" };
        format!(
            "CREATE {} IF NOT EXISTS {} ON {}({});",
            kind, self.name, self.table, self.column
        )
    }
}
