pub mod error;
pub mod types;
pub mod loader;
pub mod ddl;
pub mod output;
pub mod validator;
pub mod database;

pub use database::SchemaApplier;
pub use ddl::{generate_sql_schema, GeneratedSchema, SqlSchemaGenerator};
pub use error::{SchemaGenError, SchemaGenResult};
pub use loader::{load_component_schemas, DocumentCache, OpenApiDocument};
pub use output::write_sql_schema_file;
pub use types::{ComponentSchemas, GenerationOptions, PropertySchema, SchemaDefinition};
pub use validator::{validate_schema, ValidationReport};
