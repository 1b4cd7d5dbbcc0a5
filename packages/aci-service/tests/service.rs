use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::json;
use uuid::Uuid;

use aci_domain::{InsightRecord, InsightResults};
use aci_service::{
	BoxFuture, DedupService, DedupSettings, Error, InsightStore, PipelineStage, Result, StageState,
	StatusBoard,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
	Keywords { keywords: Vec<String>, limit: u32 },
	Recent { limit: u32 },
	Insert,
}

#[derive(Default)]
struct MemoryStore {
	records: Mutex<Vec<InsightRecord>>,
	calls: Mutex<Vec<Call>>,
	fail_keywords: bool,
	fail_recent: bool,
	fail_inserts_containing: Option<&'static str>,
}
impl MemoryStore {
	fn with_records(records: Vec<InsightRecord>) -> Self {
		Self { records: Mutex::new(records), ..Self::default() }
	}

	fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn stored(&self) -> Vec<InsightRecord> {
		self.records.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn log(&self, call: Call) {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(call);
	}

	fn newest_first(&self) -> Vec<InsightRecord> {
		let mut records = self.stored();

		records.sort_by(|a, b| b.id.cmp(&a.id));

		records
	}
}
impl InsightStore for MemoryStore {
	fn query_by_keywords<'a>(
		&'a self,
		keywords: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		self.log(Call::Keywords { keywords: keywords.to_vec(), limit });

		let result = if self.fail_keywords {
			Err(Error::Retrieval { message: "keyword index unavailable".to_string() })
		} else {
			Ok(self
				.newest_first()
				.into_iter()
				.filter(|record| {
					let lowered = record.insight_text.to_lowercase();

					keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
				})
				.take(limit as usize)
				.collect())
		};

		Box::pin(async move { result })
	}

	fn query_recent<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		self.log(Call::Recent { limit });

		let result = if self.fail_recent {
			Err(Error::Retrieval { message: "connection reset".to_string() })
		} else {
			Ok(self.newest_first().into_iter().take(limit as usize).collect())
		};

		Box::pin(async move { result })
	}

	fn insert<'a>(&'a self, record: &'a InsightRecord) -> BoxFuture<'a, Result<()>> {
		self.log(Call::Insert);

		let rejected = self
			.fail_inserts_containing
			.is_some_and(|needle| record.insight_text.contains(needle));
		let result = if rejected {
			Err(Error::Storage { message: "check constraint violated".to_string() })
		} else {
			self.records.lock().unwrap_or_else(|err| err.into_inner()).push(record.clone());

			Ok(())
		};

		Box::pin(async move { result })
	}
}

struct FailingStore {
	calls: AtomicUsize,
}
impl InsightStore for FailingStore {
	fn query_by_keywords<'a>(
		&'a self,
		_keywords: &'a [String],
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Err(Error::Retrieval { message: "down".to_string() }) })
	}

	fn query_recent<'a>(&'a self, _limit: u32) -> BoxFuture<'a, Result<Vec<InsightRecord>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Err(Error::Retrieval { message: "down".to_string() }) })
	}

	fn insert<'a>(&'a self, _record: &'a InsightRecord) -> BoxFuture<'a, Result<()>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Err(Error::Storage { message: "down".to_string() }) })
	}
}

fn record(insight: &str) -> InsightRecord {
	InsightRecord::new(insight, InsightResults::default(), "", 50)
}

fn rich(insight: &str, metrics: &str, limitations: &str) -> InsightRecord {
	let results = InsightResults::from_json(json!({ "metrics": metrics }));

	InsightRecord::new(insight, results, limitations, 70)
}

fn service(store: Arc<dyn InsightStore>, candidate_limit: u32) -> DedupService {
	DedupService::new(DedupSettings { candidate_limit, ..DedupSettings::default() }, store)
}

#[tokio::test]
async fn retrieval_failure_never_flags_a_duplicate() {
	let store = Arc::new(FailingStore { calls: AtomicUsize::new(0) });
	let dedup = service(store.clone(), 100);
	let new = record("Using customer testimonials in video ads increased CTR by 34%");

	assert!(dedup.retrieve_candidates(&new).await.is_err());
	assert!(dedup.get_candidates(&new).await.is_empty());
	assert!(dedup.find_duplicate(&new).await.is_err());
	assert!(!dedup.check_for_duplicate(&new).await);
	assert!(store.calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn keyword_failure_falls_back_to_filtered_recent_records() {
	let stored = vec![
		record("Testimonial ads lift conversion for DTC skincare brands on Instagram"),
		record("Podcast host reads deliver the best ROAS for finance apps"),
		record("Customer testimonials on landing pages reduce bounce rates"),
		record("Video testimonials outperform static quotes for SaaS trials"),
		record("Retargeting with testimonials recovers abandoned carts cheaply"),
	];
	let store = Arc::new(MemoryStore {
		fail_keywords: true,
		..MemoryStore::with_records(stored.clone())
	});
	let dedup = service(store.clone(), 2);
	let new = record("Testimonials win when placed in the first three seconds of video ads");
	let candidates = dedup.get_candidates(&new).await;
	let calls = store.calls();

	assert!(matches!(calls[0], Call::Keywords { limit: 2, .. }));
	assert_eq!(calls[1], Call::Recent { limit: 4 });
	assert_eq!(calls.len(), 2);
	assert_eq!(candidates.len(), 2);
	assert!(candidates.iter().all(|c| c.insight_text.to_lowercase().contains("testimonial")));
	assert_eq!(candidates[0].id, stored[4].id);
	assert_eq!(candidates[1].id, stored[3].id);
}

#[tokio::test]
async fn keywords_are_passed_to_the_store() {
	let store = Arc::new(MemoryStore::default());
	let dedup = service(store.clone(), 100);
	let new = InsightRecord::new(
		"Testimonials testimonials outperform discounts for premium apparel",
		InsightResults::default(),
		"Small sample size",
		30,
	);

	dedup.get_candidates(&new).await;

	let Some(Call::Keywords { keywords, limit }) = store.calls().into_iter().next() else {
		panic!("Expected a keyword lookup.");
	};

	assert_eq!(limit, 100);
	assert!(keywords.contains(&"testimonials".to_string()));
	assert!(keywords.contains(&"small".to_string()));
	assert!(keywords.contains(&"sample".to_string()));
}

#[tokio::test]
async fn missing_keywords_use_recent_records() {
	let store = Arc::new(MemoryStore::with_records(vec![record("Anything stored already")]));
	let dedup = service(store.clone(), 7);
	let new = record("It is what it is, and so on, up to us by then.");

	let candidates = dedup.get_candidates(&new).await;

	assert_eq!(store.calls(), vec![Call::Recent { limit: 7 }]);
	assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn paraphrase_is_not_a_duplicate_end_to_end() {
	let store = Arc::new(MemoryStore::with_records(vec![record(
		"Customer testimonial videos boosted click-through rate by roughly a third",
	)]));
	let dedup = service(store, 100);
	let new = record("Using customer testimonials in video ads increased CTR by 34%");
	let check = dedup.explain_duplicate(&new).await;

	assert_eq!(check.candidates, 1);
	assert!(!check.is_duplicate);
	assert!(check.matched_id.is_none());
	assert!(check.best_score.is_some_and(|score| score > 0.0 && score < 0.8));
	assert!(!dedup.check_for_duplicate(&new).await);
}

#[tokio::test]
async fn explanation_agrees_with_check_at_the_threshold() {
	let stored = record("Founder-led video ads outperform polished studio spots on TikTok");
	let store = Arc::new(MemoryStore::with_records(vec![stored.clone()]));
	let dedup =
		DedupService::new(DedupSettings { threshold: 0.6, ..DedupSettings::default() }, store);
	let new = record("Founder-led video ads outperform polished studio spots on TikTok");
	let check = dedup.explain_duplicate(&new).await;

	assert_eq!(check.best_score, Some(0.6));
	assert!(check.is_duplicate);
	assert_eq!(check.matched_id, Some(stored.id));
	assert!(dedup.check_for_duplicate(&new).await);
}

#[tokio::test]
async fn filter_unique_drops_stored_duplicates_in_order() {
	let existing = rich(
		"Founder-led selfie videos beat agency-produced spots for DTC coffee brands",
		"CTR 2.4x",
		"Tested on TikTok only",
	);
	let store = Arc::new(MemoryStore::with_records(vec![existing.clone()]));
	let dedup = service(store, 100);
	let mut copy = existing.clone();

	copy.id = Uuid::now_v7();

	let first = rich(
		"Static memes earn cheap reach for Gen Z apparel launches",
		"CPM -48%",
		"Engagement decays quickly",
	);
	let last = rich(
		"Podcast host reads convert best with vanity discount codes",
		"ROAS 3.1",
		"US audiences",
	);
	let batch = vec![first.clone(), copy, last.clone()];
	let unique = dedup.filter_unique(&batch).await;

	assert_eq!(unique.iter().map(|r| r.id).collect::<Vec<_>>(), vec![first.id, last.id]);

	let stats = dedup.duplicate_statistics(&batch).await;

	assert_eq!(stats.total, 3);
	assert_eq!(stats.duplicates_found, 1);
	assert_eq!(stats.unique, 2);
	assert!((stats.duplicate_rate - 1.0 / 3.0).abs() < 1e-12);
}

#[tokio::test]
async fn ingest_stores_unique_records_and_reports_failures() {
	let store = Arc::new(MemoryStore {
		fail_inserts_containing: Some("Podcast"),
		..MemoryStore::default()
	});
	let dedup = service(store.clone(), 100);
	let board = StatusBoard::new();
	let batch = vec![
		record("Static memes earn cheap reach for Gen Z apparel launches on Instagram"),
		record("Podcast host reads convert best with vanity discount codes for fintech"),
	];

	board.start_run();

	let report = dedup.ingest(&batch, &board).await;

	board.finish_run();

	assert_eq!(report.received, 2);
	assert_eq!(report.unique, 2);
	assert_eq!(report.stored, 1);
	assert_eq!(report.failed, 1);
	assert_eq!(report.errors[0].id, batch[1].id);
	assert_eq!(store.stored().len(), 1);

	let snapshot = board.snapshot();

	assert!(!snapshot.running);
	assert_eq!(
		snapshot.stage(PipelineStage::Deduplication).map(|stage| stage.state),
		Some(StageState::Completed)
	);
	assert_eq!(snapshot.stage(PipelineStage::Storage).map(|stage| stage.count), Some(1));
	assert_eq!(snapshot.errors.len(), 1);
}
