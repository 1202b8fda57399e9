//! Pull fenced blocks out of model responses and parse their JSON leniently.
//!
//! Models are prompted to answer with ```json or ```sql blocks; the
//! pipeline's contract is that a response without the expected block fails
//! its stage, so extraction returns `None` rather than guessing at
//! unfenced text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn fence_regex(kind: &str) -> Regex {
    // (?s) lets the block span lines; non-greedy up to the closing fence.
    Regex::new(&format!(r"(?s)```{kind}\s*(.*?)```")).expect("fence regex")
}

static JSON_FENCE: OnceLock<Regex> = OnceLock::new();
static SQL_FENCE: OnceLock<Regex> = OnceLock::new();

/// First fenced block of the given kind (`"json"` or `"sql"`), trimmed.
/// `None` when the response carries no such block.
pub fn extract_fenced_block(response: &str, kind: &str) -> Option<String> {
    let re = match kind {
        "json" => JSON_FENCE.get_or_init(|| fence_regex("json")),
        "sql" => SQL_FENCE.get_or_init(|| fence_regex("sql")),
        other => return extract_with(&fence_regex(other), response),
    };
    extract_with(re, response)
}

fn extract_with(re: &Regex, response: &str) -> Option<String> {
    re.captures(response)
        .map(|caps| caps[1].trim().to_string())
        .filter(|block| !block.is_empty())
}

/// Parse JSON tolerating the malformations models commonly produce:
/// trailing commas and single-quoted strings. Strict parsing is tried
/// first; repairs only kick in when it fails.
pub fn parse_lenient_json(text: &str) -> Result<Value, serde_json::Error> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let repaired = strip_trailing_commas(text);
            if let Ok(value) = serde_json::from_str(&repaired) {
                return Ok(value);
            }
            // Last resort for single-quoted output; only safe when the
            // text carries no double quotes the swap could corrupt.
            if !repaired.contains('"') && repaired.contains('\'') {
                let requoted = repaired.replace('\'', "\"");
                if let Ok(value) = serde_json::from_str(&requoted) {
                    return Ok(value);
                }
            }
            Err(first_err)
        }
    }
}

fn strip_trailing_commas(text: &str) -> String {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_COMMA.get_or_init(|| Regex::new(r",\s*([}\]])").expect("comma regex"));
    re.replace_all(text, "$1").into_owned()
}
