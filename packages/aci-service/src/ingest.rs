use serde::Serialize;
use uuid::Uuid;

use aci_domain::InsightRecord;

use crate::{
	DedupService,
	status::{PipelineStage, StatusBoard},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IngestError {
	pub id: Uuid,
	pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngestReport {
	pub received: usize,
	pub unique: usize,
	pub stored: usize,
	pub failed: usize,
	pub errors: Vec<IngestError>,
}

impl DedupService {
	/// Deduplicates then stores every unique record. Insert failures are reported, not raised.
	pub async fn ingest(&self, records: &[InsightRecord], status: &StatusBoard) -> IngestReport {
		let mut report = IngestReport { received: records.len(), ..IngestReport::default() };

		status.begin_stage(
			PipelineStage::Deduplication,
			format!("Checking {} insights for duplicates.", records.len()),
		);

		let unique = self.filter_unique(records).await;

		report.unique = unique.len();

		status.complete_stage(
			PipelineStage::Deduplication,
			unique.len(),
			format!("{} of {} insights are unique.", unique.len(), records.len()),
		);
		status.begin_stage(PipelineStage::Storage, format!("Storing {} insights.", unique.len()));

		for record in &unique {
			match self.store.insert(record).await {
				Ok(()) => report.stored += 1,
				Err(err) => {
					tracing::warn!(error = %err, record_id = %record.id, "Failed to store insight.");

					status.record_error(format!("{}: {err}", record.id));
					report.errors.push(IngestError { id: record.id, message: err.to_string() });
				},
			}
		}

		report.failed = report.errors.len();

		if report.stored == 0 && report.failed > 0 {
			status.fail_stage(PipelineStage::Storage, format!("All {} inserts failed.", report.failed));
		} else {
			status.complete_stage(
				PipelineStage::Storage,
				report.stored,
				format!("Stored {} insights, {} failed.", report.stored, report.failed),
			);
		}

		tracing::info!(
			received = report.received,
			unique = report.unique,
			stored = report.stored,
			failed = report.failed,
			"Ingest finished."
		);

		report
	}
}
