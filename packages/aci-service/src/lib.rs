pub mod dedup;
pub mod ingest;
pub mod retrieval;
pub mod status;
pub mod time_serde;

mod error;

pub use dedup::{DuplicateCheck, DuplicateStatistics};
pub use error::{Error, Result};
pub use ingest::{IngestError, IngestReport};
pub use status::{PipelineStage, PipelineStatus, StageState, StageStatus, StatusBoard};

use std::{future::Future, pin::Pin, sync::Arc};

use aci_domain::{FieldWeights, InsightRecord, KeywordLimits};
use aci_storage::{db::Db, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence collaborator consulted during deduplication.
pub trait InsightStore
where
	Self: Send + Sync,
{
	/// Records whose insight text contains any of `keywords`, newest first.
	fn query_by_keywords<'a>(
		&'a self,
		keywords: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<InsightRecord>>>;

	/// The `limit` records with the highest ids.
	fn query_recent<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<InsightRecord>>>;

	fn insert<'a>(&'a self, record: &'a InsightRecord) -> BoxFuture<'a, Result<()>>;
}

/// Postgres-backed store.
pub struct PgInsightStore {
	pub db: Db,
}
impl PgInsightStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl InsightStore for PgInsightStore {
	fn query_by_keywords<'a>(
		&'a self,
		keywords: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		Box::pin(async move {
			let rows = queries::fetch_by_keywords(&self.db, keywords, limit)
				.await
				.map_err(|err| Error::Retrieval { message: err.to_string() })?;

			Ok(rows.into_iter().map(|row| row.into_record()).collect())
		})
	}

	fn query_recent<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		Box::pin(async move {
			let rows = queries::fetch_recent(&self.db, limit)
				.await
				.map_err(|err| Error::Retrieval { message: err.to_string() })?;

			Ok(rows.into_iter().map(|row| row.into_record()).collect())
		})
	}

	fn insert<'a>(&'a self, record: &'a InsightRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			queries::insert_insight(&self.db, record).await?;

			Ok(())
		})
	}
}

/// Tunables for one deduplication service, resolved from `[dedup]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DedupSettings {
	pub threshold: f64,
	pub candidate_limit: u32,
	pub recent_fallback_factor: u32,
	pub keyword_limits: KeywordLimits,
	pub weights: FieldWeights,
}
impl Default for DedupSettings {
	fn default() -> Self {
		Self {
			threshold: aci_domain::DEFAULT_THRESHOLD,
			candidate_limit: 100,
			recent_fallback_factor: 2,
			keyword_limits: KeywordLimits::default(),
			weights: FieldWeights::default(),
		}
	}
}
impl From<&aci_config::Dedup> for DedupSettings {
	fn from(cfg: &aci_config::Dedup) -> Self {
		Self {
			threshold: cfg.threshold,
			candidate_limit: cfg.candidate_limit,
			recent_fallback_factor: cfg.recent_fallback_factor,
			keyword_limits: KeywordLimits::from(cfg),
			weights: FieldWeights::from(cfg.weights),
		}
	}
}

pub struct DedupService {
	pub settings: DedupSettings,
	pub store: Arc<dyn InsightStore>,
}
impl DedupService {
	pub fn new(settings: DedupSettings, store: Arc<dyn InsightStore>) -> Self {
		Self { settings, store }
	}

	pub fn from_config(cfg: &aci_config::Config, store: Arc<dyn InsightStore>) -> Self {
		Self::new(DedupSettings::from(&cfg.dedup), store)
	}
}
