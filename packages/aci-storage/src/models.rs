use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use aci_domain::{InsightRecord, InsightResults, InsightStatus};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
	pub id: Uuid,
	pub insight: String,
	pub results: Value,
	pub limitations_context: String,
	pub difference_score: i32,
	pub status: String,
	pub created_at: OffsetDateTime,
}
impl InsightRow {
	pub fn from_record(record: &InsightRecord, created_at: OffsetDateTime) -> Self {
		Self {
			id: record.id,
			insight: record.insight_text.clone(),
			results: record.results.to_json(),
			limitations_context: record.limitations_text.clone(),
			difference_score: i32::from(record.difference_score.min(100)),
			status: record.status.as_str().to_string(),
			created_at,
		}
	}

	/// Unknown status strings read back as greylist.
	pub fn into_record(self) -> InsightRecord {
		InsightRecord {
			id: self.id,
			insight_text: self.insight,
			results: InsightResults::from_json(self.results),
			limitations_text: self.limitations_context,
			difference_score: self.difference_score.clamp(0, 100) as u8,
			status: InsightStatus::parse(&self.status).unwrap_or_default(),
		}
	}
}
