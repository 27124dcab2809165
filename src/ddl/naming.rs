// Identifier conversion between OpenAPI names and SQL names
use indexmap::IndexMap;

/// Convert a camelCase or PascalCase identifier to snake_case.
///
/// An underscore goes between a lowercase letter and a following uppercase
/// letter, and before the last capital of an uppercase run that is followed
/// by a lowercase letter (`HTTPServer` -> `http_server`). Only ASCII letters
/// count as word boundaries. The result is fully lowercased, so the
/// conversion is idempotent.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();

    let mut words: Vec<char> = Vec::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() && chars[i - 1].is_ascii_lowercase() {
            words.push('_');
        }
        words.push(c);
    }

    let mut out = String::with_capacity(words.len() + 4);
    for (i, &c) in words.iter().enumerate() {
        let closes_acronym = c.is_ascii_uppercase()
            && i > 0
            && words[i - 1].is_ascii_uppercase()
            && words.get(i + 1).is_some_and(|next| next.is_ascii_lowercase());
        if closes_acronym {
            out.push('_');
        }
        out.push(c);
    }

    out.to_lowercase()
}

/// Table name for a schema: a non-empty explicit mapping first, snake_case otherwise
pub fn table_name_for(schema_name: &str, table_name_map: &IndexMap<String, String>) -> String {
    table_name_map
        .get(schema_name)
        .filter(|table| !table.is_empty())
        .cloned()
        .unwrap_or_else(|| to_snake_case(schema_name))
}

/// Referenced table for a `$ref` such as `#/components/schemas/Customer`.
///
/// Returns `None` when the reference has no `/` or ends with one.
pub fn table_from_ref(reference: &str) -> Option<String> {
    let (_, last) = reference.rsplit_once('/')?;
    if last.is_empty() {
        return None;
    }
    Some(to_snake_case(last))
}
