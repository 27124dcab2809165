use crate::ddl::naming::to_snake_case;
use crate::ddl::table_builder::is_foreign_key_shaped;
use crate::types::{IndexDefinition, IndexReason, PropertySchema, SchemaDefinition, TableDefinition};
use tracing::debug;

/// Table name fragments of request/response and value-object schemas
const SKIP_TABLE_PATTERNS: [&str; 5] = [
    "value_objects.",
    "_create",
    "_update",
    "health_response",
    "api_documentation",
];

const STATUS_PATTERNS: [&str; 3] = ["status", "condition", "state"];

const SEARCHABLE_PATTERNS: [&str; 9] = [
    "title",
    "name",
    "description",
    "subject",
    "content",
    "label",
    "caption",
    "summary",
    "text",
];

const FILTERABLE_PATTERNS: [&str; 11] = [
    "type",
    "category",
    "genre",
    "method",
    "mode",
    "kind",
    "class",
    "group",
    "level",
    "priority",
    "rating",
];

const BUSINESS_DATE_PATTERNS: [&str; 16] = [
    "due",
    "start",
    "end",
    "created",
    "updated",
    "modified",
    "published",
    "scheduled",
    "expires",
    "effective",
    "valid",
    "birth",
    "hire",
    "member",
    "joined",
    "registered",
];

/// Generator for indexes derived from property naming and typing conventions
pub struct IndexGenerator;

impl IndexGenerator {
    /// Generate the indexes of one table, in property order then rule order
    pub fn generate_indexes(table: &TableDefinition, schema: &SchemaDefinition) -> Vec<IndexDefinition> {
        if Self::should_skip_table(&table.name) {
            debug!(table = %table.name, "Skipping index generation for non-entity table");
            return Vec::new();
        }

        let mut indexes = Vec::new();
        for (prop_name, prop) in schema.properties.iter().flatten() {
            let column = to_snake_case(prop_name);
            if prop_name == "id" || !table.has_column(&column) {
                continue;
            }

            for reason in Self::matching_rules(prop_name, prop) {
                indexes.push(Self::index_for(table, &column, reason));
            }
        }
        indexes
    }

    /// Index rules matched by a property, in evaluation order
    pub fn matching_rules(prop_name: &str, prop: &PropertySchema) -> Vec<IndexReason> {
        let lower = prop_name.to_lowercase();
        let mut reasons = Vec::new();

        if is_foreign_key_shaped(prop_name, prop) {
            reasons.push(IndexReason::ForeignKey);
        }
        if prop.is_enum() && contains_any(&lower, &STATUS_PATTERNS) {
            reasons.push(IndexReason::BusinessStatus);
        }
        if prop.has_format("email") || lower == "email" {
            reasons.push(IndexReason::UniqueEmail);
        }
        if prop.has_type("string") && contains_any(&lower, &SEARCHABLE_PATTERNS) {
            reasons.push(IndexReason::Searchable);
        }
        if (prop.is_enum() || prop.has_type("string")) && contains_any(&lower, &FILTERABLE_PATTERNS) {
            reasons.push(IndexReason::Filterable);
        }
        if prop.is_date() && contains_any(&lower, &BUSINESS_DATE_PATTERNS) {
            reasons.push(IndexReason::BusinessDate);
        }

        reasons
    }

    /// Whether a table is exempt from index generation
    pub fn should_skip_table(table_name: &str) -> bool {
        SKIP_TABLE_PATTERNS.iter().any(|p| table_name.contains(p))
    }

    fn index_for(table: &TableDefinition, column: &str, reason: IndexReason) -> IndexDefinition {
        let unique = reason == IndexReason::UniqueEmail;
        let name = if unique {
            format!("idx_{}_{}_unique", table.name, column)
        } else {
            format!("idx_{}_{}", table.name, column)
        };
        IndexDefinition {
            name,
            table: table.name.clone(),
            column: column.to_string(),
            unique,
            reason,
        }
    }
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}
