/// Value kept in a TXT record when no real value remains.
pub const EMPTY_PLACEHOLDER: &str = "\"\"";

/// Wrap a validation token in the double quotes the record API stores.
pub fn quote(token: &str) -> String {
    format!("\"{token}\"")
}

/// Values to write when adding `token` to an existing record: placeholders
/// are dropped, order of the remaining values is kept and the quoted token
/// goes last.
pub fn with_value(values: &[String], token: &str) -> Vec<String> {
    values
        .iter()
        .filter(|v| v.as_str() != EMPTY_PLACEHOLDER)
        .cloned()
        .chain(std::iter::once(quote(token)))
        .collect()
}

/// Values to write when removing `token`. Matching is exact string equality
/// on the quoted form. An empty result becomes a single placeholder since
/// the API rejects a record without values.
pub fn without_value(values: &[String], token: &str) -> Vec<String> {
    let quoted = quote(token);
    let remaining: Vec<String> = values.iter().filter(|v| **v != quoted).cloned().collect();
    if remaining.is_empty() {
        vec![EMPTY_PLACEHOLDER.to_string()]
    } else {
        remaining
    }
}
