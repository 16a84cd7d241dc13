use regex::Regex;
use serde_json::Value;

/// One item from the model's reply. Carries no identity; it must be
/// reconciled against the candidate set before it can be trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankedItem {
    pub name: String,
    pub company: String,
    pub price: f64,
    pub distance: f64,
}

/// Pull a JSON-array substring out of free model text.
///
/// A fenced code block (optionally tagged `json`) wins; otherwise the first
/// non-greedy `[ ... ]` span is taken. The bracket fallback is a heuristic,
/// not a bracket matcher: on nested arrays it stops at the first `]`.
/// Returns an empty string when neither pattern is present.
pub fn extract_json_array(response: &str) -> String {
    let fenced = Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").unwrap();
    if let Some(captures) = fenced.captures(response) {
        return captures[1].to_string();
    }

    let bracketed = Regex::new(r"(?s)(\[.*?\])").unwrap();
    match bracketed.captures(response) {
        Some(captures) => captures[1].to_string(),
        None => String::new(),
    }
}

/// Parse extracted text into reranked items, preserving the model's order.
///
/// Malformed JSON degrades to zero items rather than failing the search.
/// Entries missing a name or company are skipped; price and distance accept
/// either JSON numbers or numeric strings, defaulting to zero.
pub fn parse_reranked_items(json_text: &str) -> Vec<RerankedItem> {
    let values: Vec<Value> = match serde_json::from_str(json_text) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!("failed to parse reranked JSON, degrading to empty list: {}", e);
            return Vec::new();
        }
    };

    values
        .iter()
        .filter_map(|value| {
            let name = value.get("name")?.as_str()?.to_string();
            let company = value.get("company")?.as_str()?.to_string();
            Some(RerankedItem {
                name,
                company,
                price: lenient_number(value.get("price")),
                distance: lenient_number(value.get("distance")),
            })
        })
        .collect()
}

fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
