//! Admission of structured insights emitted by the upstream extraction stage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::insight::{InsightRecord, InsightResults};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectMissingField,
	RejectInvalidType,
	RejectEmpty,
	RejectTooShort,
	RejectScoreOutOfRange,
}
impl RejectCode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RejectMissingField => "REJECT_MISSING_FIELD",
			Self::RejectInvalidType => "REJECT_INVALID_TYPE",
			Self::RejectEmpty => "REJECT_EMPTY",
			Self::RejectTooShort => "REJECT_TOO_SHORT",
			Self::RejectScoreOutOfRange => "REJECT_SCORE_OUT_OF_RANGE",
		}
	}
}

/// Loosely typed insight as produced upstream. Every field is optional until validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredInsight {
	#[serde(rename = "INSIGHT", default, skip_serializing_if = "Option::is_none")]
	pub insight: Option<Value>,
	#[serde(rename = "RESULTS", default, skip_serializing_if = "Option::is_none")]
	pub results: Option<Value>,
	#[serde(rename = "LIMITATIONS_CONTEXT", default, skip_serializing_if = "Option::is_none")]
	pub limitations_context: Option<Value>,
	#[serde(rename = "DIFFERENCE_SCORE", default, skip_serializing_if = "Option::is_none")]
	pub difference_score: Option<Value>,
}
impl StructuredInsight {
	/// Preview of the insight text for log lines.
	pub fn preview(&self, max_chars: usize) -> String {
		match &self.insight {
			Some(Value::String(text)) => text.chars().take(max_chars).collect(),
			_ => String::new(),
		}
	}

	/// Converts without validation. Absent fields become empty.
	pub fn into_record(self) -> InsightRecord {
		let insight_text = self.insight.map(value_to_text).unwrap_or_default();
		let results = self.results.map(InsightResults::from_json).unwrap_or_default();
		let limitations_text = self.limitations_context.map(value_to_text).unwrap_or_default();
		let difference_score = self.difference_score.as_ref().map(coerce_score).unwrap_or(0);

		InsightRecord::new(insight_text, results, limitations_text, difference_score)
	}
}

/// Trims text fields and coerces the score into `0..=100`. Absent fields stay absent.
pub fn sanitize(raw: &StructuredInsight) -> StructuredInsight {
	StructuredInsight {
		insight: raw.insight.as_ref().map(sanitize_text),
		results: raw.results.as_ref().map(|value| match value {
			Value::Object(_) => value.clone(),
			other => sanitize_text(other),
		}),
		limitations_context: raw.limitations_context.as_ref().map(sanitize_text),
		difference_score: raw
			.difference_score
			.as_ref()
			.map(|value| Value::from(coerce_score(value))),
	}
}

pub fn validate(insight: &StructuredInsight, cfg: &aci_config::Intake) -> Result<(), RejectCode> {
	let (Some(text), Some(results), Some(limitations), Some(score)) = (
		&insight.insight,
		&insight.results,
		&insight.limitations_context,
		&insight.difference_score,
	) else {
		return Err(RejectCode::RejectMissingField);
	};
	let Value::String(text) = text else {
		return Err(RejectCode::RejectInvalidType);
	};

	if !matches!(results, Value::String(_) | Value::Object(_)) {
		return Err(RejectCode::RejectInvalidType);
	}
	if !limitations.is_string() {
		return Err(RejectCode::RejectInvalidType);
	}

	let Some(score) = score.as_i64() else {
		return Err(RejectCode::RejectInvalidType);
	};

	if !(0..=100).contains(&score) {
		return Err(RejectCode::RejectScoreOutOfRange);
	}
	if text.trim().is_empty() {
		return Err(RejectCode::RejectEmpty);
	}
	if (text.trim().chars().count() as u32) < cfg.min_insight_chars {
		return Err(RejectCode::RejectTooShort);
	}

	Ok(())
}

/// Sanitizes then validates, yielding a fresh greylisted record.
pub fn admit(
	raw: &StructuredInsight,
	cfg: &aci_config::Intake,
) -> Result<InsightRecord, RejectCode> {
	let sanitized = sanitize(raw);

	validate(&sanitized, cfg)?;

	Ok(sanitized.into_record())
}

fn sanitize_text(value: &Value) -> Value {
	Value::String(value_to_text(value.clone()).trim().to_string())
}

fn value_to_text(value: Value) -> String {
	match value {
		Value::String(text) => text,
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn coerce_score(value: &Value) -> u8 {
	let parsed = match value {
		Value::Number(number) => number
			.as_i64()
			.or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
		Value::String(text) => text.trim().parse::<i64>().ok(),
		_ => None,
	};

	parsed.map(|score| score.clamp(0, 100) as u8).unwrap_or(0)
}
