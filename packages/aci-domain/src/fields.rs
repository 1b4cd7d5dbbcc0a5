use serde_json::{Map, Value};

use crate::insight::InsightResults;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("Results text is not valid JSON.")]
	Json(#[from] serde_json::Error),
	#[error("Results text is JSON but not an object.")]
	NotAnObject,
}

/// Comparable text for a results field. Mappings contribute their string values, space-joined in
/// insertion order. Text that does not decode as a JSON object is returned unchanged.
pub fn extract_text(results: &InsightResults) -> String {
	match results {
		InsightResults::Fields(map) => join_string_values(map),
		InsightResults::Text(raw) => extract_from_str(raw),
	}
}

pub fn extract_from_str(raw: &str) -> String {
	if raw.is_empty() {
		return String::new();
	}

	match parse_mapping(raw) {
		Ok(map) => join_string_values(&map),
		Err(_) => raw.to_string(),
	}
}

pub fn parse_mapping(raw: &str) -> Result<Map<String, Value>, ParseError> {
	if !raw.trim_start().starts_with('{') {
		return Err(ParseError::NotAnObject);
	}

	match serde_json::from_str::<Value>(raw)? {
		Value::Object(map) => Ok(map),
		_ => Err(ParseError::NotAnObject),
	}
}

fn join_string_values(map: &Map<String, Value>) -> String {
	map.values().filter_map(Value::as_str).collect::<Vec<_>>().join(" ")
}
