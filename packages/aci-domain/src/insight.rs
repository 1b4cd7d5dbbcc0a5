use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
	pub id: Uuid,
	pub insight_text: String,
	#[serde(default)]
	pub results: InsightResults,
	#[serde(default)]
	pub limitations_text: String,
	#[serde(default)]
	pub difference_score: u8,
	#[serde(default)]
	pub status: InsightStatus,
}
impl InsightRecord {
	/// Builds a fresh greylisted record. Ids are time-ordered so that descending id order follows
	/// creation order.
	pub fn new(
		insight_text: impl Into<String>,
		results: InsightResults,
		limitations_text: impl Into<String>,
		difference_score: u8,
	) -> Self {
		Self {
			id: Uuid::now_v7(),
			insight_text: insight_text.into(),
			results,
			limitations_text: limitations_text.into(),
			difference_score: difference_score.min(100),
			status: InsightStatus::Greylist,
		}
	}
}

/// Auxiliary evidence text. Either free-form or a mapping of named sub-fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsightResults {
	Text(String),
	Fields(Map<String, Value>),
}
impl InsightResults {
	/// Null becomes empty text; scalars and arrays keep their JSON text.
	pub fn from_json(value: Value) -> Self {
		match value {
			Value::Null => Self::Text(String::new()),
			Value::String(text) => Self::Text(text),
			Value::Object(map) => Self::Fields(map),
			other => Self::Text(other.to_string()),
		}
	}

	pub fn to_json(&self) -> Value {
		match self {
			Self::Text(text) => Value::String(text.clone()),
			Self::Fields(map) => Value::Object(map.clone()),
		}
	}
}
impl Default for InsightResults {
	fn default() -> Self {
		Self::Text(String::new())
	}
}
impl<'de> Deserialize<'de> for InsightResults {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Value::deserialize(deserializer).map(Self::from_json)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
	#[default]
	Greylist,
	Whitelist,
	Blacklist,
}
impl InsightStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Greylist => "greylist",
			Self::Whitelist => "whitelist",
			Self::Blacklist => "blacklist",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim() {
			"greylist" => Some(Self::Greylist),
			"whitelist" => Some(Self::Whitelist),
			"blacklist" => Some(Self::Blacklist),
			_ => None,
		}
	}
}
