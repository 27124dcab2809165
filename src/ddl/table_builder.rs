use crate::ddl::naming::{table_from_ref, to_snake_case};
use crate::ddl::type_mapper::SqliteTypeMapper;
use crate::types::{
    ColumnDefinition, ForeignKeyDefinition, PropertySchema, SchemaDefinition, SqliteType,
    TableDefinition,
};

/// Column names managed by the generator itself
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Default expression of the timestamp columns
const TIMESTAMP_DEFAULT: &str = "(datetime('now'))";

/// Builds table definitions from schema definitions
pub struct TableBuilder {
    include_timestamps: bool,
    use_strict_mode: bool,
}

impl TableBuilder {
    pub fn new(include_timestamps: bool, use_strict_mode: bool) -> Self {
        Self {
            include_timestamps,
            use_strict_mode,
        }
    }

    /// Build the table for one schema
    pub fn build_table(&self, table_name: &str, schema: &SchemaDefinition) -> TableDefinition {
        let mut columns = vec![self.primary_key_column()];
        let mut foreign_keys = Vec::new();

        for (prop_name, prop) in schema.properties.iter().flatten() {
            if prop_name == "id" {
                continue;
            }
            let column_name = to_snake_case(prop_name);
            if TIMESTAMP_COLUMNS.contains(&column_name.as_str()) {
                continue;
            }

            columns.push(ColumnDefinition {
                not_null: schema.is_required(prop_name, &column_name),
                column_type: SqliteTypeMapper::map_property(prop),
                default_value: SqliteTypeMapper::default_literal(prop),
                primary_key: false,
                name: column_name,
            });

            if let Some(fk) = detect_foreign_key(prop_name, prop) {
                foreign_keys.push(fk);
            }
        }

        if self.include_timestamps {
            columns.extend(TIMESTAMP_COLUMNS.iter().map(|name| ColumnDefinition {
                name: name.to_string(),
                column_type: SqliteType::Text,
                primary_key: false,
                not_null: true,
                default_value: Some(TIMESTAMP_DEFAULT.to_string()),
            }));
        }

        TableDefinition {
            name: table_name.to_string(),
            columns,
            foreign_keys,
            without_rowid: self.use_strict_mode,
        }
    }

    fn primary_key_column(&self) -> ColumnDefinition {
        let column_type = if self.use_strict_mode {
            SqliteType::Text
        } else {
            SqliteType::Integer
        };
        ColumnDefinition {
            name: "id".to_string(),
            column_type,
            primary_key: true,
            not_null: false,
            default_value: None,
        }
    }
}

/// Detect a foreign key from a `$ref` or an integer `...Id` property
pub fn detect_foreign_key(prop_name: &str, prop: &PropertySchema) -> Option<ForeignKeyDefinition> {
    let referenced_table = prop
        .reference
        .as_deref()
        .and_then(table_from_ref)
        .or_else(|| {
            let stem = prop_name.strip_suffix("Id")?;
            prop.has_type("integer").then(|| to_snake_case(stem))
        })?;

    Some(ForeignKeyDefinition {
        column: to_snake_case(prop_name),
        referenced_table,
        referenced_column: "id".to_string(),
    })
}

/// Whether the index rules treat a property as a foreign key
pub fn is_foreign_key_shaped(prop_name: &str, prop: &PropertySchema) -> bool {
    prop.reference.is_some() || (prop.has_type("integer") && prop_name.ends_with("Id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_table_rendering() {
        let builder = TableBuilder::new(false, false);
        let table = builder.build_table(
            "simple",
            &schema(json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            })),
        );

        assert_eq!(
            table.to_sql(),
            "CREATE TABLE simple (\n  id INTEGER PRIMARY KEY,\n  name TEXT NOT NULL\n);"
        );
    }

    #[test]
    fn test_strict_mode_table() {
        let builder = TableBuilder::new(true, true);
        let table = builder.build_table("token", &schema(json!({"type": "object"})));

        assert!(table.without_rowid);
        assert_eq!(
            table.to_sql(),
            "CREATE TABLE token (\n  id TEXT PRIMARY KEY,\n  \
             created_at TEXT NOT NULL DEFAULT (datetime('now')),\n  \
             updated_at TEXT NOT NULL DEFAULT (datetime('now'))\n) WITHOUT ROWID;"
        );
    }

    #[test]
    fn test_id_and_timestamp_properties_are_replaced() {
        let builder = TableBuilder::new(true, false);
        let table = builder.build_table(
            "customer",
            &schema(json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "createdAt": {"type": "string", "format": "date-time"},
                    "updated_at": {"type": "string"},
                    "name": {"type": "string"}
                }
            })),
        );

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "created_at", "updated_at"]);
    }

    #[test]
    fn test_timestamp_properties_dropped_without_timestamps() {
        let builder = TableBuilder::new(false, false);
        let table = builder.build_table(
            "event",
            &schema(json!({"properties": {"createdAt": {"type": "string"}}})),
        );

        assert_eq!(table.columns.len(), 1);
        assert!(!table.has_column("created_at"));
    }

    #[test]
    fn test_required_matches_original_or_snake_case_name() {
        let builder = TableBuilder::new(false, false);
        let table = builder.build_table(
            "rental",
            &schema(json!({
                "properties": {
                    "dueDate": {"type": "string"},
                    "returnDate": {"type": "string"},
                    "notes": {"type": "string"}
                },
                "required": ["dueDate", "return_date"]
            })),
        );

        assert!(table.column("due_date").unwrap().not_null);
        assert!(table.column("return_date").unwrap().not_null);
        assert!(!table.column("notes").unwrap().not_null);
    }

    #[test]
    fn test_foreign_keys_follow_columns() {
        let builder = TableBuilder::new(false, false);
        let table = builder.build_table(
            "rental",
            &schema(json!({
                "properties": {
                    "customerId": {"type": "integer"},
                    "owner": {"$ref": "#/components/schemas/User"},
                    "fee": {"type": "number"}
                },
                "required": ["customerId"]
            })),
        );

        assert_eq!(
            table.to_sql(),
            "CREATE TABLE rental (\n  id INTEGER PRIMARY KEY,\n  customer_id INTEGER NOT NULL,\n  \
             owner INTEGER,\n  fee REAL,\n  FOREIGN KEY (customer_id) REFERENCES customer(id),\n  \
             FOREIGN KEY (owner) REFERENCES user(id)\n);"
        );
    }

    #[test]
    fn test_foreign_key_detection_rules() {
        let prop = |v: serde_json::Value| -> PropertySchema { serde_json::from_value(v).unwrap() };

        let by_ref = detect_foreign_key("userId", &prop(json!({"$ref": "#/components/schemas/AppUser"})));
        assert_eq!(by_ref.unwrap().referenced_table, "app_user");

        let by_suffix = detect_foreign_key("videoCopyId", &prop(json!({"type": "integer"}))).unwrap();
        assert_eq!(by_suffix.column, "video_copy_id");
        assert_eq!(by_suffix.referenced_table, "video_copy");

        assert!(detect_foreign_key("customerId", &prop(json!({"type": "string"}))).is_none());
        assert!(detect_foreign_key("customerid", &prop(json!({"type": "integer"}))).is_none());

        // a reference without a path segment falls back to the suffix rule
        let bare_ref = detect_foreign_key("ownerId", &prop(json!({"$ref": "Owner", "type": "integer"})));
        assert_eq!(bare_ref.unwrap().referenced_table, "owner");
        assert!(detect_foreign_key("owner", &prop(json!({"$ref": "Owner"}))).is_none());
    }

    #[test]
    fn test_defaults_are_rendered() {
        let builder = TableBuilder::new(false, false);
        let table = builder.build_table(
            "profile",
            &schema(json!({
                "properties": {
                    "defaultPayment": {"type": "string", "default": "credit_card"},
                    "loyaltyPoints": {"type": "integer", "default": 0},
                    "motto": {"type": "string", "default": "it's"}
                },
                "required": ["loyaltyPoints"]
            })),
        );

        assert_eq!(table.column("default_payment").unwrap().to_sql(), "default_payment TEXT DEFAULT 'credit_card'");
        assert_eq!(table.column("loyalty_points").unwrap().to_sql(), "loyalty_points INTEGER NOT NULL DEFAULT 0");
        assert_eq!(table.column("motto").unwrap().to_sql(), "motto TEXT DEFAULT 'it''s'");
    }
}
