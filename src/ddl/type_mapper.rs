use crate::types::{PropertySchema, SqliteType};
use serde_json::{Number, Value};

/// Maps OpenAPI property schemas to SQLite column types and defaults
pub struct SqliteTypeMapper;

impl SqliteTypeMapper {
    /// Column type for a property.
    ///
    /// References become INTEGER key placeholders; strings, enums, arrays and
    /// objects are stored as TEXT (the latter two as JSON); anything
    /// unrecognised falls back to TEXT.
    pub fn map_property(schema: &PropertySchema) -> SqliteType {
        if schema.reference.is_some() {
            return SqliteType::Integer;
        }
        if schema.has_type("string") || schema.is_enum() {
            return SqliteType::Text;
        }

        match schema.schema_type.as_deref() {
            Some("integer") | Some("boolean") => SqliteType::Integer,
            Some("number") => SqliteType::Real,
            _ => SqliteType::Text,
        }
    }

    /// Rendered DEFAULT value, without the keyword
    pub fn default_literal(schema: &PropertySchema) -> Option<String> {
        let value = schema.default.as_ref()?;
        Some(match value {
            Value::String(s) => quote(s),
            Value::Number(n) => number_literal(n),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            other => quote(&other.to_string()),
        })
    }
}

/// Whole-valued floats drop their fractional part (`1.0` -> `1`)
fn number_literal(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

/// Single-quote a string literal, doubling embedded quotes
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
