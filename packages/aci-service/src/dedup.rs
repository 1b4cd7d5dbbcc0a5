use serde::Serialize;
use uuid::Uuid;

use aci_domain::{DuplicateMatch, InsightRecord, best_match, is_duplicate};

use crate::{DedupService, Result};

/// Outcome of one duplicate check, with the best score even below the threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicateCheck {
	pub id: Uuid,
	pub is_duplicate: bool,
	pub matched_id: Option<Uuid>,
	pub best_score: Option<f64>,
	pub candidates: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DuplicateStatistics {
	pub total: usize,
	pub duplicates_found: usize,
	pub unique: usize,
	pub duplicate_rate: f64,
}
impl DuplicateStatistics {
	pub fn from_counts(total: usize, duplicates_found: usize) -> Self {
		let duplicate_rate =
			if total == 0 { 0.0 } else { duplicates_found as f64 / total as f64 };

		Self { total, duplicates_found, unique: total - duplicates_found, duplicate_rate }
	}
}

impl DedupService {
	/// Fallible form of [`Self::check_for_duplicate`]. Errors only when retrieval fails outright.
	pub async fn find_duplicate(&self, record: &InsightRecord) -> Result<Option<DuplicateMatch>> {
		let candidates = self.retrieve_candidates(record).await?;
		let hit =
			is_duplicate(record, &candidates, self.settings.threshold, &self.settings.weights);

		match &hit {
			Some(hit) => tracing::info!(
				record_id = %record.id,
				matched_id = %hit.record.id,
				score = hit.score,
				"Duplicate insight detected."
			),
			None => tracing::debug!(
				record_id = %record.id,
				candidates = candidates.len(),
				"No duplicate above threshold."
			),
		}

		Ok(hit)
	}

	/// Any failure counts as "not a duplicate".
	pub async fn check_for_duplicate(&self, record: &InsightRecord) -> bool {
		match self.find_duplicate(record).await {
			Ok(hit) => hit.is_some(),
			Err(err) => {
				tracing::warn!(
					error = %err,
					record_id = %record.id,
					"Duplicate check failed. Treating insight as unique."
				);

				false
			},
		}
	}

	pub async fn explain_duplicate(&self, record: &InsightRecord) -> DuplicateCheck {
		let candidates = self.get_candidates(record).await;
		let best = best_match(record, &candidates, &self.settings.weights);
		let duplicate = best.is_some_and(|best| best.reaches(self.settings.threshold));

		DuplicateCheck {
			id: record.id,
			is_duplicate: duplicate,
			matched_id: best.filter(|_| duplicate).map(|best| best.candidate.id),
			best_score: best.map(|best| best.score),
			candidates: candidates.len(),
		}
	}

	/// Checks each record against the stored corpus only, preserving input order.
	pub async fn filter_unique(&self, records: &[InsightRecord]) -> Vec<InsightRecord> {
		let mut unique = Vec::with_capacity(records.len());

		for record in records {
			if self.check_for_duplicate(record).await {
				tracing::info!(
					record_id = %record.id,
					preview = %preview(&record.insight_text),
					"Skipping duplicate insight."
				);

				continue;
			}

			unique.push(record.clone());
		}

		unique
	}

	pub async fn duplicate_statistics(&self, records: &[InsightRecord]) -> DuplicateStatistics {
		let mut duplicates_found = 0;

		for record in records {
			if self.check_for_duplicate(record).await {
				duplicates_found += 1;
			}
		}

		let stats = DuplicateStatistics::from_counts(records.len(), duplicates_found);

		tracing::info!(
			total = stats.total,
			duplicates_found = stats.duplicates_found,
			duplicate_rate = stats.duplicate_rate,
			"Duplicate statistics computed."
		);

		stats
	}
}

fn preview(text: &str) -> String {
	text.chars().take(50).collect()
}
