// Schema loader: OpenAPI document access and component schema loading
pub mod cache;
pub mod document;


pub use cache::DocumentCache;
pub use document::{load_component_schemas, ApiInfo, ApiOperation, OpenApiDocument, ServerInfo};
