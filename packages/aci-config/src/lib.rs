mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Dedup, DedupWeights, Intake, Postgres, Service, Storage};

use std::{fs, path::Path};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if !cfg.dedup.threshold.is_finite() {
		return Err(Error::Validation {
			message: "dedup.threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.dedup.threshold) {
		return Err(Error::Validation {
			message: "dedup.threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.dedup.candidate_limit == 0 {
		return Err(Error::Validation {
			message: "dedup.candidate_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.dedup.recent_fallback_factor == 0 {
		return Err(Error::Validation {
			message: "dedup.recent_fallback_factor must be greater than zero.".to_string(),
		});
	}
	if cfg.dedup.insight_keywords == 0 && cfg.dedup.limitation_keywords == 0 {
		return Err(Error::Validation {
			message: "dedup.insight_keywords and dedup.limitation_keywords cannot both be zero."
				.to_string(),
		});
	}

	let weights = cfg.dedup.weights;

	for (label, weight) in [
		("insight", weights.insight),
		("results", weights.results),
		("limitations", weights.limitations),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("dedup.weights.{label} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::Validation {
				message: format!("dedup.weights.{label} must be zero or greater."),
			});
		}
	}

	let sum = weights.insight + weights.results + weights.limitations;

	if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
		return Err(Error::Validation {
			message: format!("dedup.weights must sum to 1.0, got {sum}."),
		});
	}
	if cfg.intake.min_insight_chars == 0 {
		return Err(Error::Validation {
			message: "intake.min_insight_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	if level.is_empty() {
		cfg.service.log_level = "info".to_string();
	} else if level.len() != cfg.service.log_level.len() {
		cfg.service.log_level = level.to_string();
	}

	let dsn = cfg.storage.postgres.dsn.trim();

	if dsn.len() != cfg.storage.postgres.dsn.len() {
		cfg.storage.postgres.dsn = dsn.to_string();
	}
}
