use crate::ddl::index_generator::IndexGenerator;
use crate::ddl::naming::table_name_for;
use crate::ddl::pragmas::pragma_block;
use crate::ddl::table_builder::TableBuilder;
use crate::types::{ComponentSchemas, GenerationOptions, IndexDefinition, SchemaDefinition, TableDefinition};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// One generated table together with its indexes
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedTable {
    /// Source schema name
    pub schema_name: String,
    /// Table definition
    pub table: TableDefinition,
    /// Indexes, empty when index generation is disabled
    pub indexes: Vec<IndexDefinition>,
}

impl GeneratedTable {
    pub fn create_statement(&self) -> String {
        self.table.to_sql()
    }

    pub fn index_statements(&self) -> Vec<String> {
        self.indexes.iter().map(|idx| idx.to_sql()).collect()
    }
}

/// Structured output of one generation run
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSchema {
    /// Pragma block, when enabled
    pub pragmas: Option<String>,
    /// Tables in schema order
    pub tables: Vec<GeneratedTable>,
}

impl GeneratedSchema {
    pub fn table(&self, name: &str) -> Option<&GeneratedTable> {
        self.tables.iter().find(|t| t.table.name == name)
    }

    pub fn index_count(&self) -> usize {
        self.tables.iter().map(|t| t.indexes.len()).sum()
    }

    /// Output blocks in emission order, empty blocks omitted
    pub fn blocks(&self) -> Vec<String> {
        let mut blocks = Vec::with_capacity(self.tables.len() * 2 + 1);
        blocks.extend(self.pragmas.iter().cloned());
        blocks.extend(self.tables.iter().map(|t| t.create_statement()));
        blocks.extend(
            self.tables
                .iter()
                .map(|t| t.index_statements().join("\n"))
                .filter(|block| !block.is_empty()),
        );
        blocks
    }
}

impl fmt::Display for GeneratedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blocks().join("\n\n"))
    }
}

/// SQLite DDL generator for OpenAPI component schemas
#[derive(Debug, Clone, Default)]
pub struct SqlSchemaGenerator {
    options: GenerationOptions,
}

impl SqlSchemaGenerator {
    /// Create a generator with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom options
    pub fn with_options(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate the complete schema text
    pub fn generate(&self, schemas: &ComponentSchemas) -> String {
        self.build(schemas).to_string()
    }

    /// Generate the structured schema
    pub fn build(&self, schemas: &ComponentSchemas) -> GeneratedSchema {
        let selected = self.filter_schemas(schemas);
        let builder = TableBuilder::new(self.options.include_timestamps, self.options.use_strict_mode);

        let tables: Vec<GeneratedTable> = selected
            .into_iter()
            .map(|(schema_name, schema)| {
                let table_name = table_name_for(schema_name, &self.options.table_name_map);
                let table = builder.build_table(&table_name, schema);
                let indexes = if self.options.include_indexes {
                    IndexGenerator::generate_indexes(&table, schema)
                } else {
                    Vec::new()
                };
                debug!(
                    schema = %schema_name,
                    table = %table.name,
                    columns = table.columns.len(),
                    foreign_keys = table.foreign_keys.len(),
                    indexes = indexes.len(),
                    "Generated table definition"
                );
                GeneratedTable {
                    schema_name: schema_name.clone(),
                    table,
                    indexes,
                }
            })
            .collect();

        let generated = GeneratedSchema {
            pragmas: self.options.include_file_pragmas.then(pragma_block),
            tables,
        };
        info!(
            tables = generated.tables.len(),
            indexes = generated.index_count(),
            "Generated SQL schema"
        );
        generated
    }

    /// Apply the allow-list, then the deny-list
    fn filter_schemas<'a>(&self, schemas: &'a ComponentSchemas) -> Vec<(&'a String, &'a SchemaDefinition)> {
        let include = &self.options.include_schemas;
        let exclude = &self.options.exclude_schemas;

        for name in include.iter().chain(exclude.iter()) {
            if !schemas.contains_key(name) {
                warn!(schema = %name, "Filter names a schema that does not exist");
            }
        }

        schemas
            .iter()
            .filter(|(name, _)| include.is_empty() || include.contains(name))
            .filter(|(name, _)| !exclude.contains(name))
            .collect()
    }
}

/// Generate the SQLite schema text for a set of component schemas
pub fn generate_sql_schema(schemas: &ComponentSchemas, options: &GenerationOptions) -> String {
    SqlSchemaGenerator::with_options(options.clone()).generate(schemas)
}
