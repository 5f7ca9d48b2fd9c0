//! Naming conventions shared by the convention resolver and the compiler.

/// Converts a `PascalCase` or `camelCase` name to `snake_case`.
///
/// Already snake-cased and single-word names are returned unchanged.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Removes `suffix` from the end of `input`, comparing ASCII case-insensitively.
///
/// Blank inputs or suffixes leave `input` untouched.
#[must_use]
pub fn trim_suffix_ignore_case<'a>(input: &'a str, suffix: &str) -> &'a str {
    if input.trim().is_empty() || suffix.trim().is_empty() || suffix.len() > input.len() {
        return input;
    }
    let split = input.len() - suffix.len();
    match (input.get(..split), input.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head,
        _ => input,
    }
}

/// Derives a table alias from the first character of each `_` segment.
#[must_use]
pub fn table_alias(table_name: &str) -> String {
    table_name
        .split('_')
        .filter_map(|segment| segment.chars().next())
        .collect()
}

/// Builds a parameter name from a column name and the JSON path that follows it.
///
/// Characters that cannot appear in a placeholder name become `_`.
#[must_use]
pub fn parameter_name(column: &str, path: &[&str]) -> String {
    let mut name = String::from(column);
    for segment in path {
        name.push('_');
        name.push_str(segment);
    }
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
