use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub dedup: Dedup,
	#[serde(default)]
	pub intake: Intake,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Dedup {
	/// Minimum weighted similarity at which a candidate counts as a duplicate.
	pub threshold: f64,
	/// Upper bound on the candidate pool fetched for one check.
	pub candidate_limit: u32,
	/// When the keyword query fails, `candidate_limit * recent_fallback_factor` recent records
	/// are scanned client-side.
	pub recent_fallback_factor: u32,
	pub insight_keywords: u32,
	pub limitation_keywords: u32,
	pub weights: DedupWeights,
}
impl Default for Dedup {
	fn default() -> Self {
		Self {
			threshold: 0.8,
			candidate_limit: 100,
			recent_fallback_factor: 2,
			insight_keywords: 5,
			limitation_keywords: 3,
			weights: DedupWeights::default(),
		}
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DedupWeights {
	pub insight: f64,
	pub results: f64,
	pub limitations: f64,
}
impl Default for DedupWeights {
	fn default() -> Self {
		Self { insight: 0.60, results: 0.25, limitations: 0.15 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Intake {
	/// Character count (not bytes) below which an insight is rejected before deduplication.
	pub min_insight_chars: u32,
}
impl Default for Intake {
	fn default() -> Self {
		Self { min_insight_chars: 50 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
