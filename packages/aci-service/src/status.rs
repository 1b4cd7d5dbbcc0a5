//! Observable progress for one pipeline run.
//!
//! The board is owned by whoever drives the run and handed to the stages that report on it.
//! Observers either poll [`StatusBoard::snapshot`] or hold a receiver from
//! [`StatusBoard::subscribe`].

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
	Deduplication,
	Storage,
}
impl PipelineStage {
	pub const ALL: [Self; 2] = [Self::Deduplication, Self::Storage];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Deduplication => "deduplication",
			Self::Storage => "storage",
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
	#[default]
	Pending,
	Running,
	Completed,
	Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StageStatus {
	pub state: StageState,
	pub count: usize,
	pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineStatus {
	pub running: bool,
	pub current_stage: Option<PipelineStage>,
	pub stages: Vec<(PipelineStage, StageStatus)>,
	pub errors: Vec<String>,
	#[serde(with = "crate::time_serde::option")]
	pub started_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub finished_at: Option<OffsetDateTime>,
}
impl PipelineStatus {
	pub fn stage(&self, stage: PipelineStage) -> Option<&StageStatus> {
		self.stages.iter().find(|(key, _)| *key == stage).map(|(_, status)| status)
	}

	fn stage_mut(&mut self, stage: PipelineStage) -> &mut StageStatus {
		if let Some(index) = self.stages.iter().position(|(key, _)| *key == stage) {
			return &mut self.stages[index].1;
		}

		self.stages.push((stage, StageStatus::default()));

		let last = self.stages.len() - 1;

		&mut self.stages[last].1
	}
}
impl Default for PipelineStatus {
	fn default() -> Self {
		Self {
			running: false,
			current_stage: None,
			stages: PipelineStage::ALL
				.into_iter()
				.map(|stage| (stage, StageStatus::default()))
				.collect(),
			errors: Vec::new(),
			started_at: None,
			finished_at: None,
		}
	}
}

pub struct StatusBoard {
	tx: watch::Sender<PipelineStatus>,
}
impl StatusBoard {
	pub fn new() -> Self {
		let (tx, _rx) = watch::channel(PipelineStatus::default());

		Self { tx }
	}

	pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
		self.tx.subscribe()
	}

	pub fn snapshot(&self) -> PipelineStatus {
		self.tx.borrow().clone()
	}

	/// Resets every stage and marks the run as started.
	pub fn start_run(&self) {
		self.tx.send_modify(|status| {
			*status = PipelineStatus {
				running: true,
				started_at: Some(OffsetDateTime::now_utc()),
				..PipelineStatus::default()
			};
		});
	}

	pub fn begin_stage(&self, stage: PipelineStage, message: impl Into<String>) {
		let message = message.into();

		self.tx.send_modify(|status| {
			status.current_stage = Some(stage);

			let entry = status.stage_mut(stage);

			entry.state = StageState::Running;
			entry.count = 0;
			entry.message = message;
		});
	}

	pub fn complete_stage(&self, stage: PipelineStage, count: usize, message: impl Into<String>) {
		let message = message.into();

		self.tx.send_modify(|status| {
			let entry = status.stage_mut(stage);

			entry.state = StageState::Completed;
			entry.count = count;
			entry.message = message;
		});
	}

	pub fn fail_stage(&self, stage: PipelineStage, error: impl Into<String>) {
		let error = error.into();

		self.tx.send_modify(|status| {
			let entry = status.stage_mut(stage);

			entry.state = StageState::Failed;
			entry.message = error.clone();
			status.errors.push(format!("{}: {error}", stage.as_str()));
		});
	}

	/// Records an error without failing the current stage.
	pub fn record_error(&self, error: impl Into<String>) {
		let error = error.into();

		self.tx.send_modify(|status| status.errors.push(error));
	}

	pub fn finish_run(&self) {
		self.tx.send_modify(|status| {
			status.running = false;
			status.current_stage = None;
			status.finished_at = Some(OffsetDateTime::now_utc());
		});
	}
}
impl Default for StatusBoard {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn run_lifecycle_updates_snapshot() {
		let board = StatusBoard::new();

		board.start_run();
		board.begin_stage(PipelineStage::Deduplication, "Checking 3 insights.");

		let snapshot = board.snapshot();

		assert!(snapshot.running);
		assert_eq!(snapshot.current_stage, Some(PipelineStage::Deduplication));
		assert_eq!(
			snapshot.stage(PipelineStage::Deduplication).map(|stage| stage.state),
			Some(StageState::Running)
		);

		board.complete_stage(PipelineStage::Deduplication, 2, "2 unique.");
		board.fail_stage(PipelineStage::Storage, "connection refused");
		board.finish_run();

		let snapshot = board.snapshot();

		assert!(!snapshot.running);
		assert!(snapshot.finished_at.is_some());
		assert_eq!(snapshot.stage(PipelineStage::Deduplication).map(|stage| stage.count), Some(2));
		assert_eq!(
			snapshot.stage(PipelineStage::Storage).map(|stage| stage.state),
			Some(StageState::Failed)
		);
		assert_eq!(snapshot.errors, vec!["storage: connection refused".to_string()]);
	}

	#[test]
	fn start_run_clears_previous_errors() {
		let board = StatusBoard::new();

		board.record_error("stale");
		board.start_run();

		assert!(board.snapshot().errors.is_empty());
	}

	#[test]
	fn subscribers_observe_changes() {
		let board = StatusBoard::new();
		let mut rx = board.subscribe();

		board.start_run();

		assert!(rx.has_changed().unwrap_or(false));
		assert!(rx.borrow_and_update().running);
	}

	#[test]
	fn snapshot_serializes_timestamps_as_rfc3339() {
		let board = StatusBoard::new();

		board.start_run();

		let json = serde_json::to_value(board.snapshot()).expect("Failed to serialize status.");

		assert!(json["started_at"].is_string());
		assert!(json["finished_at"].is_null());
	}
}
