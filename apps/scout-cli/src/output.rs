//! Renders a search response for the terminal or as JSON.
use serde_json::{json, Value};

use scout_core::types::Payload;
use scout_hybrid::SearchResponse;

pub const NO_RESULTS: &str = "No relevant results found.";

/// `{"results": [payload, ...]}` or `{"message": "No relevant results found."}`,
/// with `"degraded": true` added when the semantic source was skipped.
pub fn format_json(response: &SearchResponse) -> String {
    let mut body = if response.is_empty() {
        json!({ "message": NO_RESULTS })
    } else {
        let results: Vec<Value> = response.payloads().into_iter().map(|p| Value::Object(p.clone())).collect();
        json!({ "results": results })
    };
    if response.is_degraded() {
        body["degraded"] = Value::Bool(true);
    }
    serde_json::to_string_pretty(&body).unwrap_or_else(|_| "{}".to_string())
}

fn field<'a>(payload: &'a Payload, name: &str) -> &'a str {
    payload.get(name).and_then(Value::as_str).unwrap_or("")
}

pub fn format_human(query: &str, response: &SearchResponse) -> String {
    let mut out = String::new();
    if let Some(reason) = &response.degraded {
        out.push_str(&format!("(semantic search unavailable: {reason}; showing keyword matches only)\n\n"));
    }
    let results = response.results();
    if results.is_empty() {
        out.push_str(NO_RESULTS);
        return out;
    }

    out.push_str(&format!(
        "Found {} profile{} for \"{}\":\n\n",
        results.len(),
        if results.len() == 1 { "" } else { "s" },
        query
    ));
    for (i, r) in results.iter().enumerate() {
        let p = &r.payload;
        out.push_str(&format!(
            "{}. {} - {} at {} ({}) [score: {:.3}]\n",
            i + 1,
            field(p, "founder_name"),
            field(p, "role"),
            field(p, "company"),
            field(p, "location"),
            r.combined_score
        ));
        let idea = field(p, "idea");
        if !idea.is_empty() {
            out.push_str(&format!("   Idea: {idea}\n"));
        }
        let keywords = field(p, "keywords");
        if !keywords.is_empty() {
            out.push_str(&format!("   Keywords: {keywords}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
