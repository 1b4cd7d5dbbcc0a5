use crate::{
	insight::InsightRecord,
	similarity::{FieldWeights, weighted_record_similarity},
};

pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Highest-scoring candidate for one comparison.
#[derive(Clone, Copy, Debug)]
pub struct BestMatch<'a> {
	pub candidate: &'a InsightRecord,
	pub score: f64,
}
impl BestMatch<'_> {
	/// Inclusive comparison shared by every duplicate decision.
	pub fn reaches(&self, threshold: f64) -> bool {
		self.score >= threshold
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DuplicateMatch {
	pub record: InsightRecord,
	pub score: f64,
}

/// Scores every candidate and keeps the first one reaching the maximum.
pub fn best_match<'a>(
	record: &InsightRecord,
	candidates: &'a [InsightRecord],
	weights: &FieldWeights,
) -> Option<BestMatch<'a>> {
	let mut best: Option<BestMatch<'a>> = None;

	for candidate in candidates {
		let score = weighted_record_similarity(record, candidate, weights);

		match best {
			Some(ref current) if score <= current.score => {},
			_ => best = Some(BestMatch { candidate, score }),
		}
	}

	best
}

/// Returns the matched record when the best score reaches `threshold`.
pub fn is_duplicate(
	record: &InsightRecord,
	candidates: &[InsightRecord],
	threshold: f64,
	weights: &FieldWeights,
) -> Option<DuplicateMatch> {
	best_match(record, candidates, weights)
		.filter(|best| best.reaches(threshold))
		.map(|best| DuplicateMatch { record: best.candidate.clone(), score: best.score })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::insight::InsightResults;

	fn record(insight: &str) -> InsightRecord {
		InsightRecord::new(insight, InsightResults::default(), "", 40)
	}

	#[test]
	fn no_candidates_is_not_duplicate() {
		let new = record("Founder-led video ads outperform polished studio spots on TikTok");

		assert!(best_match(&new, &[], &FieldWeights::default()).is_none());
		assert!(is_duplicate(&new, &[], DEFAULT_THRESHOLD, &FieldWeights::default()).is_none());
	}

	#[test]
	fn first_candidate_wins_ties() {
		let new = record("Founder-led video ads outperform polished studio spots on TikTok");
		let first = record("Founder-led video ads outperform polished studio spots on TikTok");
		let second = record("Founder-led video ads outperform polished studio spots on TikTok");
		let candidates = vec![first.clone(), second];
		let best = best_match(&new, &candidates, &FieldWeights::default()).expect("best match");

		assert_eq!(best.candidate.id, first.id);
	}

	#[test]
	fn threshold_is_inclusive() {
		let new = record("Founder-led video ads outperform polished studio spots on TikTok");
		let same = record("Founder-led video ads outperform polished studio spots on TikTok");
		let candidates = vec![same.clone()];
		let weights = FieldWeights::default();

		let hit = is_duplicate(&new, &candidates, 0.6, &weights).expect("duplicate at 0.6");

		assert_eq!(hit.record.id, same.id);
		assert_eq!(hit.score, 0.6);
		assert!(is_duplicate(&new, &candidates, DEFAULT_THRESHOLD, &weights).is_none());

		let best = best_match(&new, &candidates, &weights).expect("best match");

		assert!(best.reaches(0.6));
		assert!(!best.reaches(0.6 + f64::EPSILON));
	}

	#[test]
	fn zero_threshold_matches_first_candidate_even_at_zero() {
		let new = record("Founder-led video ads outperform polished studio spots on TikTok");
		let other = record("Podcast sponsorships convert poorly for impulse purchases");
		let hit =
			is_duplicate(&new, &[other.clone()], 0.0, &FieldWeights::default()).expect("match");

		assert_eq!(hit.record.id, other.id);
		assert_eq!(hit.score, 0.0);
	}
}
