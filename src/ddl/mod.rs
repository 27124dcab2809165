// DDL generator module: OpenAPI component schemas to SQLite DDL
pub mod generator;
pub mod index_generator;
pub mod naming;
pub mod pragmas;
pub mod table_builder;
pub mod type_mapper;


pub use generator::{generate_sql_schema, GeneratedSchema, GeneratedTable, SqlSchemaGenerator};
pub use index_generator::IndexGenerator;
pub use naming::to_snake_case;
pub use table_builder::TableBuilder;
pub use type_mapper::SqliteTypeMapper;
