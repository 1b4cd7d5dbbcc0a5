//! Pairwise TF-IDF cosine similarity.
//!
//! Each comparison builds its own two-document vector space, so scores are only meaningful
//! relative to the duplicate threshold and are not comparable across pairs.

use std::collections::BTreeMap;

use crate::{fields, insight::InsightRecord, normalize::normalize, stop_words};

const DOCUMENT_COUNT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
	#[error("Document is empty after normalization.")]
	EmptyDocument,
	#[error("Documents share no vocabulary after stop-word removal.")]
	EmptyVocabulary,
	#[error("Similarity is not a finite number.")]
	NonFinite,
}

/// Per-field weights for [`weighted_record_similarity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldWeights {
	pub insight: f64,
	pub results: f64,
	pub limitations: f64,
}
impl Default for FieldWeights {
	fn default() -> Self {
		Self { insight: 0.60, results: 0.25, limitations: 0.15 }
	}
}
impl From<aci_config::DedupWeights> for FieldWeights {
	fn from(weights: aci_config::DedupWeights) -> Self {
		Self { insight: weights.insight, results: weights.results, limitations: weights.limitations }
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldScores {
	pub insight: f64,
	pub results: f64,
	pub limitations: f64,
	pub total: f64,
}

pub fn try_text_similarity(a: &str, b: &str) -> Result<f64, ScoringError> {
	let a = normalize(a);
	let b = normalize(b);

	if a.is_empty() || b.is_empty() {
		return Err(ScoringError::EmptyDocument);
	}

	let tf_a = term_frequencies(&a);
	let tf_b = term_frequencies(&b);

	if tf_a.is_empty() && tf_b.is_empty() {
		return Err(ScoringError::EmptyVocabulary);
	}
	if tf_a == tf_b {
		return Ok(1.0);
	}

	let vec_a = weigh(&tf_a, &tf_b);
	let vec_b = weigh(&tf_b, &tf_a);
	let norm_a = l2_norm(&vec_a);
	let norm_b = l2_norm(&vec_b);

	if norm_a == 0.0 || norm_b == 0.0 {
		return Ok(0.0);
	}

	let dot: f64 =
		vec_a.iter().filter_map(|(term, wa)| vec_b.get(term).map(|wb| wa * wb)).sum();
	let cosine = dot / (norm_a * norm_b);

	if !cosine.is_finite() {
		return Err(ScoringError::NonFinite);
	}

	Ok(cosine.clamp(0.0, 1.0))
}

/// Cosine similarity in `[0, 1]`; every failure scores `0.0`.
pub fn text_similarity(a: &str, b: &str) -> f64 {
	try_text_similarity(a, b).unwrap_or(0.0)
}

pub fn score_fields(a: &InsightRecord, b: &InsightRecord, weights: &FieldWeights) -> FieldScores {
	let insight = text_similarity(&a.insight_text, &b.insight_text);
	let results =
		text_similarity(&fields::extract_text(&a.results), &fields::extract_text(&b.results));
	let limitations = text_similarity(&a.limitations_text, &b.limitations_text);
	let total = weights.insight * insight
		+ weights.results * results
		+ weights.limitations * limitations;

	FieldScores {
		insight,
		results,
		limitations,
		total: if total.is_finite() { total.clamp(0.0, 1.0) } else { 0.0 },
	}
}

pub fn weighted_record_similarity(
	a: &InsightRecord,
	b: &InsightRecord,
	weights: &FieldWeights,
) -> f64 {
	score_fields(a, b, weights).total
}

/// Weighted similarity with the default 0.60 / 0.25 / 0.15 split.
pub fn record_similarity(a: &InsightRecord, b: &InsightRecord) -> f64 {
	weighted_record_similarity(a, b, &FieldWeights::default())
}

// Unigrams and bigrams over tokens of at least two characters, stop words removed first.
fn term_frequencies(normalized: &str) -> BTreeMap<String, u32> {
	let tokens: Vec<&str> = normalized
		.split(' ')
		.filter(|token| token.len() >= 2 && !stop_words::is_english_stop_word(token))
		.collect();
	let mut counts = BTreeMap::new();

	for token in &tokens {
		*counts.entry((*token).to_string()).or_insert(0) += 1;
	}
	for pair in tokens.windows(2) {
		*counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
	}

	counts
}

fn weigh(own: &BTreeMap<String, u32>, other: &BTreeMap<String, u32>) -> BTreeMap<String, f64> {
	own.iter()
		.map(|(term, tf)| {
			let df = if other.contains_key(term) { 2.0 } else { 1.0 };
			let idf = ((1.0 + DOCUMENT_COUNT) / (1.0 + df)).ln() + 1.0;

			(term.clone(), f64::from(*tf) * idf)
		})
		.collect()
}

fn l2_norm(vector: &BTreeMap<String, f64>) -> f64 {
	vector.values().map(|w| w * w).sum::<f64>().sqrt()
}
