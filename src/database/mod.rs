// Embedded database initialisation from generated DDL
pub mod applier;


pub use applier::SchemaApplier;
