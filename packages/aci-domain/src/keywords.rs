use std::collections::BTreeSet;

use regex::Regex;

use crate::{insight::InsightRecord, stop_words};

const INSIGHT_TERM_PATTERN: &str = r"\b[a-z]{3,}\b";
const LIMITATION_TERM_PATTERN: &str = r"\b[a-z]{4,}\b";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeywordLimits {
	/// Most frequent insight terms kept.
	pub insight_terms: usize,
	/// Leading limitation terms kept.
	pub limitation_terms: usize,
}
impl Default for KeywordLimits {
	fn default() -> Self {
		Self { insight_terms: 5, limitation_terms: 3 }
	}
}
impl From<&aci_config::Dedup> for KeywordLimits {
	fn from(cfg: &aci_config::Dedup) -> Self {
		Self {
			insight_terms: cfg.insight_keywords as usize,
			limitation_terms: cfg.limitation_keywords as usize,
		}
	}
}

/// Salient lowercase terms used as an OR filter for candidate retrieval.
pub fn extract_keywords(record: &InsightRecord, limits: KeywordLimits) -> BTreeSet<String> {
	let mut out = BTreeSet::new();

	for term in top_insight_terms(&record.insight_text, limits.insight_terms) {
		out.insert(term);
	}
	for term in leading_limitation_terms(&record.limitations_text, limits.limitation_terms) {
		out.insert(term);
	}

	out
}

fn top_insight_terms(text: &str, max_terms: usize) -> Vec<String> {
	if max_terms == 0 {
		return Vec::new();
	}

	// First-occurrence order is kept so the stable sort breaks frequency ties by position.
	let mut counts: Vec<(String, usize)> = Vec::new();

	for token in alphabetic_terms(text, INSIGHT_TERM_PATTERN) {
		if stop_words::is_keyword_stop_word(&token) {
			continue;
		}

		match counts.iter_mut().find(|(term, _)| *term == token) {
			Some((_, count)) => *count += 1,
			None => counts.push((token, 1)),
		}
	}

	counts.sort_by(|a, b| b.1.cmp(&a.1));

	counts.into_iter().take(max_terms).map(|(term, _)| term).collect()
}

fn leading_limitation_terms(text: &str, max_terms: usize) -> Vec<String> {
	alphabetic_terms(text, LIMITATION_TERM_PATTERN).into_iter().take(max_terms).collect()
}

fn alphabetic_terms(text: &str, pattern: &str) -> Vec<String> {
	if text.trim().is_empty() {
		return Vec::new();
	}

	let lowered = text.to_lowercase();
	let Ok(re) = Regex::new(pattern) else { return Vec::new() };

	re.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::insight::InsightResults;

	fn record(insight: &str, limitations: &str) -> InsightRecord {
		InsightRecord::new(insight, InsightResults::default(), limitations, 50)
	}

	#[test]
	fn most_frequent_term_wins_and_stop_words_are_dropped() {
		let keywords = extract_keywords(
			&record(
				"the quick brown fox jumps over the lazy dog testimonials testimonials testimonials",
				"",
			),
			KeywordLimits::default(),
		);

		assert!(keywords.contains("testimonials"));
		assert!(!keywords.contains("the"));
		assert!(!keywords.contains("over"));
		assert_eq!(keywords.len(), 5);
	}

	#[test]
	fn ties_break_by_first_occurrence() {
		let terms = top_insight_terms("zeta alpha beta gamma delta epsilon alpha", 3);

		assert_eq!(terms, vec!["alpha", "zeta", "beta"]);
	}

	#[test]
	fn short_and_mixed_tokens_are_skipped() {
		let terms = top_insight_terms("CTR up by 34% on ad v2 creatives", 5);

		assert_eq!(terms, vec!["ctr", "creatives"]);
	}

	#[test]
	fn limitation_terms_are_leading_and_longer() {
		let keywords = extract_keywords(
			&record("", "Only for B2B SaaS with small budgets under scrutiny"),
			KeywordLimits::default(),
		);
		let expected: BTreeSet<String> =
			["only", "saas", "with"].iter().map(|term| term.to_string()).collect();

		assert_eq!(keywords, expected);
	}

	#[test]
	fn union_deduplicates_terms() {
		let keywords = extract_keywords(
			&record("Retargeting audiences convert better", "retargeting audiences only"),
			KeywordLimits::default(),
		);

		assert_eq!(keywords.iter().filter(|term| *term == "retargeting").count(), 1);
		assert!(keywords.contains("only"));
	}

	#[test]
	fn empty_sources_give_empty_set() {
		assert!(extract_keywords(&record("", ""), KeywordLimits::default()).is_empty());
		assert!(
			extract_keywords(&record("the and for", "a b"), KeywordLimits::default()).is_empty()
		);
	}
}
