// Syntax validation of generated DDL
use crate::ddl::GeneratedSchema;
use crate::error::SchemaGenError;
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use std::fmt;
use tracing::{debug, warn};

/// Kind of statement a validation issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    CreateTable,
    CreateIndex,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::CreateTable => f.write_str("CREATE TABLE"),
            StatementKind::CreateIndex => f.write_str("CREATE INDEX"),
        }
    }
}

/// A generated statement that did not parse as expected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub table: String,
    pub kind: StatementKind,
    pub statement: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for table {}: {}", self.kind, self.table, self.message)
    }
}

/// Outcome of validating a generated schema
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub table_count: usize,
    pub index_count: usize,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert a failed report into a validation error
    pub fn into_result(self) -> Result<Self, SchemaGenError> {
        if self.is_valid() {
            return Ok(self);
        }
        let details: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        Err(SchemaGenError::validation(format!(
            "{} invalid statement(s): {}",
            self.errors.len(),
            details.join("; ")
        )))
    }
}

/// Parse every table and index statement with the SQLite dialect
pub fn validate_schema(schema: &GeneratedSchema) -> ValidationReport {
    let mut report = ValidationReport::default();

    for generated in &schema.tables {
        let table = &generated.table.name;
        report.table_count += 1;
        if let Err(message) = check_statement(&generated.create_statement(), StatementKind::CreateTable) {
            report.errors.push(issue(table, StatementKind::CreateTable, generated.create_statement(), message));
        }

        for statement in generated.index_statements() {
            report.index_count += 1;
            if let Err(message) = check_statement(&statement, StatementKind::CreateIndex) {
                report.errors.push(issue(table, StatementKind::CreateIndex, statement, message));
            }
        }
    }

    if report.is_valid() {
        debug!(tables = report.table_count, indexes = report.index_count, "Generated SQL parsed cleanly");
    } else {
        warn!(errors = report.errors.len(), "Generated SQL contains invalid statements");
    }
    report
}

fn check_statement(sql: &str, expected: StatementKind) -> Result<(), String> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, sql).map_err(|e| e.to_string())?;
    match statements.as_slice() {
        [Statement::CreateTable { .. }] if expected == StatementKind::CreateTable => Ok(()),
        [Statement::CreateIndex { .. }] if expected == StatementKind::CreateIndex => Ok(()),
        [_] => Err(format!("expected a {} statement", expected)),
        other => Err(format!("expected one statement, found {}", other.len())),
    }
}

fn issue(table: &str, kind: StatementKind, statement: String, message: String) -> ValidationIssue {
    ValidationIssue {
        table: table.to_string(),
        kind,
        statement,
        message,
    }
}
