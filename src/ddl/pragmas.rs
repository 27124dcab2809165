// SQLite engine-tuning directives emitted ahead of the tables

/// Header line of the pragma block
pub const PRAGMA_HEADER: &str = "-- SQLite performance and reliability pragmas";

/// Directive name, value and trailing comment, in emission order
pub const FILE_PRAGMAS: [(&str, &str, &str); 9] = [
    ("journal_mode", "WAL", "Write-Ahead Logging for better concurrency"),
    ("synchronous", "NORMAL", "Balance between safety and performance"),
    ("cache_size", "-64000", "64MB cache size (negative = KB)"),
    ("foreign_keys", "ON", "Enable foreign key constraints"),
    ("temp_store", "MEMORY", "Store temporary tables in memory"),
    ("mmap_size", "268435456", "256MB memory-mapped I/O"),
    ("page_size", "4096", "Optimal page size for most systems"),
    ("auto_vacuum", "INCREMENTAL", "Prevent database bloat over time"),
    ("busy_timeout", "5000", "5 second timeout for lock conflicts"),
];

/// Width the directive text is padded to before its comment
const COMMENT_COLUMN: usize = 37;

/// Render the pragma block
pub fn pragma_block() -> String {
    let mut lines = Vec::with_capacity(FILE_PRAGMAS.len() + 1);
    lines.push(PRAGMA_HEADER.to_string());
    for (name, value, comment) in FILE_PRAGMAS {
        let directive = format!("PRAGMA {} = {};", name, value);
        lines.push(format!("{:<width$}-- {}", directive, comment, width = COMMENT_COLUMN));
    }
    lines.join("\n")
}
