use aci_domain::{InsightRecord, extract_keywords};

use crate::{DedupService, Result};

impl DedupService {
	/// Candidate pool for one check. Storage failures degrade to an empty pool.
	pub async fn get_candidates(&self, record: &InsightRecord) -> Vec<InsightRecord> {
		match self.retrieve_candidates(record).await {
			Ok(candidates) => candidates,
			Err(err) => {
				tracing::warn!(
					error = %err,
					record_id = %record.id,
					"Candidate retrieval failed. Treating pool as empty."
				);

				Vec::new()
			},
		}
	}

	/// Keyword lookup with a single recency fallback. Errors only when both paths fail.
	pub async fn retrieve_candidates(&self, record: &InsightRecord) -> Result<Vec<InsightRecord>> {
		let limit = self.settings.candidate_limit;
		let keywords: Vec<String> =
			extract_keywords(record, self.settings.keyword_limits).into_iter().collect();

		if keywords.is_empty() {
			tracing::debug!(record_id = %record.id, limit, "No keywords. Using recent records.");

			return self.store.query_recent(limit).await;
		}

		match self.store.query_by_keywords(&keywords, limit).await {
			Ok(candidates) => Ok(candidates),
			Err(err) => {
				tracing::warn!(
					error = %err,
					record_id = %record.id,
					"Keyword lookup failed. Falling back to recent records."
				);

				self.recent_with_keywords(&keywords, limit).await
			},
		}
	}

	async fn recent_with_keywords(
		&self,
		keywords: &[String],
		limit: u32,
	) -> Result<Vec<InsightRecord>> {
		let fetch = limit.saturating_mul(self.settings.recent_fallback_factor);
		let recent = self.store.query_recent(fetch).await?;

		Ok(filter_by_keywords(recent, keywords, limit as usize))
	}
}

fn filter_by_keywords(
	records: Vec<InsightRecord>,
	keywords: &[String],
	limit: usize,
) -> Vec<InsightRecord> {
	records
		.into_iter()
		.filter(|record| {
			let lowered = record.insight_text.to_lowercase();

			keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
		})
		.take(limit)
		.collect()
}
