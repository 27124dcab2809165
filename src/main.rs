use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use schemagen::ddl::SqlSchemaGenerator;
use schemagen::loader::{ApiInfo, ApiOperation, OpenApiDocument, ServerInfo};
use schemagen::output::write_sql_file;
use schemagen::{validate_schema, GenerationOptions, SchemaApplier, SchemaGenError, SchemaGenResult};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate SQLite DDL from OpenAPI component schemas")]
#[command(version = "0.1.0")]
#[command(after_help = "EXAMPLES:
    # Write the schema for an API description
    schemagen generate -i openapi.json -o db/schema.sql

    # Print the schema without pragmas and check it parses
    schemagen generate -i openapi.json --no-pragmas --check

    # Create a SQLite database from the generated schema
    schemagen apply -i openapi.json -d data/app.db --exclude HealthResponse")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Set log level explicitly
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the SQL schema for an OpenAPI document
    Generate {
        /// Path to the OpenAPI JSON document
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output SQL file (printed to stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Parse every generated statement and fail on syntax errors
        #[arg(long)]
        check: bool,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Show the API info, schemas and operations of a document
    Inspect {
        /// Path to the OpenAPI JSON document
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate the schema and apply it to a SQLite database
    Apply {
        /// Path to the OpenAPI JSON document
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// SQLite database file, created if missing
        #[arg(short, long, value_name = "FILE")]
        database: PathBuf,

        #[command(flatten)]
        generation: GenerationArgs,
    },
}

/// Generation option flags shared by `generate` and `apply`
#[derive(Args, Debug, Default)]
struct GenerationArgs {
    /// JSON options file (camelCase GenerationOptions)
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Text primary keys and WITHOUT ROWID tables
    #[arg(long)]
    strict: bool,

    /// Omit the pragma block
    #[arg(long)]
    no_pragmas: bool,

    /// Omit created_at/updated_at columns
    #[arg(long)]
    no_timestamps: bool,

    /// Omit index statements
    #[arg(long)]
    no_indexes: bool,

    /// Explicit table name for a schema, as SCHEMA=TABLE
    #[arg(long = "table-name", value_name = "SCHEMA=TABLE")]
    table_names: Vec<String>,

    /// Only generate these schemas
    #[arg(long = "include", value_name = "NAME")]
    include: Vec<String>,

    /// Never generate these schemas
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,
}

impl GenerationArgs {
    /// Options file (or defaults) with the command-line flags applied on top
    fn resolve(&self) -> SchemaGenResult<GenerationOptions> {
        let mut options = match &self.options {
            Some(path) => GenerationOptions::from_file(path)?,
            None => GenerationOptions::default(),
        };

        if self.strict {
            options.use_strict_mode = true;
        }
        if self.no_pragmas {
            options.include_file_pragmas = false;
        }
        if self.no_timestamps {
            options.include_timestamps = false;
        }
        if self.no_indexes {
            options.include_indexes = false;
        }
        for mapping in &self.table_names {
            let (schema, table) = parse_table_name(mapping)?;
            options.table_name_map.insert(schema, table);
        }
        options.include_schemas.extend(self.include.iter().cloned());
        options.exclude_schemas.extend(self.exclude.iter().cloned());

        Ok(options)
    }
}

fn parse_table_name(mapping: &str) -> SchemaGenResult<(String, String)> {
    match mapping.split_once('=') {
        Some((schema, table)) if !schema.trim().is_empty() && !table.trim().is_empty() => {
            Ok((schema.trim().to_string(), table.trim().to_string()))
        }
        _ => Err(SchemaGenError::config(format!(
            "invalid --table-name '{}', expected SCHEMA=TABLE",
            mapping
        ))),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    info!("Starting schemagen v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate {
            input,
            output,
            check,
            generation,
        } => match execute_generate(&input, output.as_deref(), check, &generation) {
            Ok(()) => info!("Schema generation completed"),
            Err(e) => {
                eprintln!("Generation failed: {:#}", e);
                std::process::exit(1);
            }
        },
        Commands::Inspect { input, format } => {
            if let Err(e) = execute_inspect(&input, format) {
                eprintln!("Inspection failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Apply {
            input,
            database,
            generation,
        } => match execute_apply(&input, &database, &generation) {
            Ok(tables) => info!(tables = tables.len(), "Database initialised: {}", tables.join(", ")),
            Err(e) => {
                eprintln!("Apply failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn execute_generate(input: &Path, output: Option<&Path>, check: bool, generation: &GenerationArgs) -> Result<()> {
    let options = generation.resolve()?;
    let schemas = OpenApiDocument::from_file(input)?.into_schemas();
    info!(schemas = schemas.len(), "Loaded component schemas from {:?}", input);

    let generated = SqlSchemaGenerator::with_options(options).build(&schemas);
    if check {
        let report = validate_schema(&generated);
        if !report.is_valid() {
            for error in &report.errors {
                eprintln!("  - {}", error);
            }
            bail!("{} generated statement(s) failed to parse", report.errors.len());
        }
        info!(tables = report.table_count, indexes = report.index_count, "All generated statements parsed");
    }

    let sql = generated.to_string();
    match output {
        Some(path) => write_sql_file(&sql, path)?,
        None => println!("{}", sql),
    }
    Ok(())
}

fn execute_apply(input: &Path, database: &Path, generation: &GenerationArgs) -> Result<Vec<String>> {
    let options = generation.resolve()?;
    let schemas = OpenApiDocument::from_file(input)?.into_schemas();
    let sql = SqlSchemaGenerator::with_options(options).generate(&schemas);

    let applier = SchemaApplier::open(database)?;
    let executed = applier.apply(&sql)?;
    info!(statements = executed, "Applied schema to {:?}", database);
    Ok(applier.table_names()?)
}

#[derive(Serialize)]
struct InspectReport<'a> {
    info: Option<&'a ApiInfo>,
    servers: &'a [ServerInfo],
    schemas: Vec<SchemaSummary<'a>>,
    operations: Vec<ApiOperation>,
}

#[derive(Serialize)]
struct SchemaSummary<'a> {
    name: &'a str,
    properties: usize,
    required: usize,
}

fn execute_inspect(input: &Path, format: OutputFormat) -> Result<()> {
    let document = OpenApiDocument::from_file(input)?;
    let report = InspectReport {
        info: document.info(),
        servers: document.servers(),
        schemas: document
            .schemas()
            .iter()
            .map(|(name, schema)| SchemaSummary {
                name,
                properties: schema.properties.as_ref().map_or(0, |p| p.len()),
                required: schema.required.len(),
            })
            .collect(),
        operations: document.operations(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_inspect_text(&report),
    }
    Ok(())
}

fn print_inspect_text(report: &InspectReport<'_>) {
    if let Some(info) = report.info {
        println!("{} v{}", info.title, info.version);
        if let Some(description) = &info.description {
            println!("{}", description);
        }
    }
    for server in report.servers {
        println!("Server: {}", server.url);
    }

    println!("\nSchemas ({}):", report.schemas.len());
    for schema in &report.schemas {
        println!("  {} ({} properties, {} required)", schema.name, schema.properties, schema.required);
    }

    println!("\nOperations ({}):", report.operations.len());
    for op in &report.operations {
        let id = op.operation_id.as_deref().unwrap_or("-");
        println!("  {:<7} {} [{}]", op.method, op.path, id);
    }
}

/// Initialize logging based on CLI options; logs go to stderr
fn initialize_logging(cli: &Cli) -> Result<()> {
    let log_level = if let Some(level) = &cli.log_level {
        level.clone().into()
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(cli.verbose)
        .with_file(cli.verbose)
        .with_line_number(cli.verbose);

    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_table_name() {
        assert_eq!(
            parse_table_name("Customer=clients").unwrap(),
            ("Customer".to_string(), "clients".to_string())
        );
        assert!(matches!(parse_table_name("Customer"), Err(SchemaGenError::Config { .. })));
        assert!(parse_table_name("=clients").is_err());
        assert!(parse_table_name("Customer=").is_err());
    }

    #[test]
    fn test_flags_override_options_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("options.json");
        fs::write(
            &path,
            r#"{"includeIndexes": false, "tableNameMap": {"Rental": "loans"}, "excludeSchemas": ["Audit"]}"#,
        )
        .unwrap();

        let args = GenerationArgs {
            options: Some(path),
            strict: true,
            no_pragmas: true,
            table_names: vec!["Customer=clients".to_string()],
            exclude: vec!["HealthResponse".to_string()],
            ..Default::default()
        };
        let options = args.resolve().unwrap();

        assert!(options.use_strict_mode);
        assert!(!options.include_file_pragmas);
        assert!(options.include_timestamps);
        assert!(!options.include_indexes);
        assert_eq!(options.table_name_map["Rental"], "loans");
        assert_eq!(options.table_name_map["Customer"], "clients");
        assert_eq!(options.exclude_schemas, vec!["Audit", "HealthResponse"]);
    }

    #[test]
    fn test_defaults_without_flags() {
        assert_eq!(GenerationArgs::default().resolve().unwrap(), GenerationOptions::default());
    }

    #[test]
    fn test_cli_parses_generate_command() {
        let cli = Cli::try_parse_from([
            "schemagen", "generate", "-i", "api.json", "--no-indexes", "--include", "Customer",
            "--table-name", "Customer=clients", "--check",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate { input, output, check, generation } => {
                assert_eq!(input, PathBuf::from("api.json"));
                assert!(output.is_none());
                assert!(check);
                assert!(generation.no_indexes);
                assert_eq!(generation.include, vec!["Customer"]);
            }
            _ => panic!("expected generate"),
        }
    }
}
