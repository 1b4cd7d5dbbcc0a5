use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre;
use tokio::{sync::watch, task::JoinHandle};
use tracing_subscriber::EnvFilter;

use aci_config::Config;
use aci_domain::{InsightRecord, StructuredInsight};
use aci_service::{DedupService, PgInsightStore, PipelineStatus, StatusBoard};
use aci_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = aci_cli::VERSION,
	rename_all = "kebab",
	styles = aci_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Create the insights table and indexes.
	InitSchema,
	/// Print the duplicate decision for every admitted insight.
	Check {
		#[arg(long, short = 'i', value_name = "FILE")]
		input: PathBuf,
	},
	/// Print the admitted insights that are not duplicates.
	Filter {
		#[arg(long, short = 'i', value_name = "FILE")]
		input: PathBuf,
	},
	/// Print duplicate statistics for the admitted insights.
	Stats {
		#[arg(long, short = 'i', value_name = "FILE")]
		input: PathBuf,
	},
	/// Deduplicate the admitted insights and store the unique ones.
	Ingest {
		#[arg(long, short = 'i', value_name = "FILE")]
		input: PathBuf,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = aci_config::load(&args.config)?;

	init_tracing(&config)?;

	let db = Db::connect(&config.storage.postgres).await?;

	match args.command {
		Command::InitSchema => {
			db.ensure_schema().await?;

			tracing::info!("Schema is ready.");

			Ok(())
		},
		Command::Check { input } => {
			let records = load_insights(&input, &config.intake)?;
			let dedup = dedup_service(&config, db);
			let mut checks = Vec::with_capacity(records.len());

			for record in &records {
				checks.push(dedup.explain_duplicate(record).await);
			}

			print_json(&checks)
		},
		Command::Filter { input } => {
			let records = load_insights(&input, &config.intake)?;
			let unique = dedup_service(&config, db).filter_unique(&records).await;

			print_json(&unique)
		},
		Command::Stats { input } => {
			let records = load_insights(&input, &config.intake)?;
			let stats = dedup_service(&config, db).duplicate_statistics(&records).await;

			print_json(&stats)
		},
		Command::Ingest { input } => {
			let records = load_insights(&input, &config.intake)?;
			let dedup = dedup_service(&config, db);
			let board = StatusBoard::new();
			let watcher = watch_progress(board.subscribe());

			board.start_run();

			let report = dedup.ingest(&records, &board).await;

			board.finish_run();
			// Dropping the board closes the channel so the watcher exits.
			drop(board);

			if let Err(err) = watcher.await {
				tracing::warn!(error = %err, "Progress watcher stopped unexpectedly.");
			}

			print_json(&report)
		},
	}
}

fn dedup_service(config: &Config, db: Db) -> DedupService {
	DedupService::from_config(config, Arc::new(PgInsightStore::new(db)))
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();

	Ok(())
}

/// Parses a JSON array of structured insights and admits each through the intake gate.
pub fn load_insights(
	path: &Path,
	intake: &aci_config::Intake,
) -> color_eyre::Result<Vec<InsightRecord>> {
	let raw = fs::read_to_string(path)?;

	admit_all(&raw, intake)
}

pub fn admit_all(
	raw: &str,
	intake: &aci_config::Intake,
) -> color_eyre::Result<Vec<InsightRecord>> {
	let insights: Vec<StructuredInsight> = serde_json::from_str(raw)
		.map_err(|err| eyre::eyre!("Input must be a JSON array of structured insights: {err}."))?;
	let mut records = Vec::with_capacity(insights.len());

	for (index, insight) in insights.iter().enumerate() {
		match aci_domain::admit(insight, intake) {
			Ok(record) => records.push(record),
			Err(code) => tracing::warn!(
				index,
				reason = code.as_str(),
				preview = %insight.preview(50),
				"Insight rejected at intake."
			),
		}
	}

	tracing::info!(received = insights.len(), admitted = records.len(), "Input loaded.");

	Ok(records)
}

fn watch_progress(mut rx: watch::Receiver<PipelineStatus>) -> JoinHandle<()> {
	tokio::spawn(async move {
		while rx.changed().await.is_ok() {
			let status = rx.borrow_and_update().clone();
			let Some(stage) = status.current_stage else { continue };
			let Some(stage_status) = status.stage(stage) else { continue };

			tracing::info!(
				stage = stage.as_str(),
				state = ?stage_status.state,
				count = stage_status.count,
				"{}",
				stage_status.message
			);
		}
	})
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: serde::Serialize,
{
	let json = serde_json::to_string_pretty(value)?;

	println!("{json}");

	Ok(())
}
