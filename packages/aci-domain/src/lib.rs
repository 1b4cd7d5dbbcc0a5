pub mod decision;
pub mod fields;
pub mod insight;
pub mod intake;
pub mod keywords;
pub mod normalize;
pub mod similarity;

mod stop_words;

pub use decision::{BestMatch, DEFAULT_THRESHOLD, DuplicateMatch, best_match, is_duplicate};
pub use fields::extract_text;
pub use insight::{InsightRecord, InsightResults, InsightStatus};
pub use intake::{RejectCode, StructuredInsight, admit};
pub use keywords::{KeywordLimits, extract_keywords};
pub use normalize::normalize;
pub use similarity::{
	FieldScores, FieldWeights, ScoringError, record_similarity, score_fields, text_similarity,
	try_text_similarity, weighted_record_similarity,
};
