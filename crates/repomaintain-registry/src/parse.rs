use std::collections::BTreeMap;

use regex::Regex;

/// Parse the object `npm view` prints for fields like `peerDependencies`.
///
/// Depending on the npm version the output is strict JSON, JavaScript object
/// notation with unquoted keys and single quotes, or a plain `key: value`
/// listing. The stages are tried in that order; an empty map is the final
/// fallback.
#[must_use]
pub fn parse_object_notation(output: &str) -> BTreeMap<String, String> {
    let output = output.trim();
    if output.is_empty() {
        return BTreeMap::new();
    }

    if let Some(map) = parse_strict_json(output) {
        return map;
    }

    if let Some(map) = parse_quasi_json(output) {
        return map;
    }

    parse_colon_lines(output)
}

fn parse_strict_json(output: &str) -> Option<BTreeMap<String, String>> {
    serde_json::from_str(output).ok()
}

fn parse_quasi_json(output: &str) -> Option<BTreeMap<String, String>> {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    let unquoted_key = Regex::new(r"(\w+):").unwrap();

    let quoted = unquoted_key.replace_all(output, "\"$1\":");
    let normalized = quoted.replace('\'', "\"");
    serde_json::from_str(&normalized).ok()
}

fn parse_colon_lines(output: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
            if !key.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }

    map
}
