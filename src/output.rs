// File emitter for generated schemas
use crate::ddl::SqlSchemaGenerator;
use crate::error::SchemaGenResult;
use crate::types::{ComponentSchemas, GenerationOptions};
use std::fs;
use std::path::Path;
use tracing::info;

/// Generate the schema and write it to `path`, creating parent directories
/// and overwriting any existing file.
pub fn write_sql_schema_file(
    schemas: &ComponentSchemas,
    path: impl AsRef<Path>,
    options: &GenerationOptions,
) -> SchemaGenResult<()> {
    let sql = SqlSchemaGenerator::with_options(options.clone()).generate(schemas);
    write_sql_file(&sql, path)
}

/// Write already generated schema text to `path`
pub fn write_sql_file(sql: &str, path: impl AsRef<Path>) -> SchemaGenResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, sql)?;

    info!(path = %path.display(), bytes = sql.len(), "Wrote SQL schema file");
    Ok(())
}
