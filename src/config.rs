use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::data::loader::DEFAULT_DELIMITER;
use crate::data::partition::Partition;
use crate::recommend::RecommendOptions;
use crate::similarity::engine::SimilarityEngine;
use crate::similarity::{Mode, Weighting};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override whatever the environment says.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interaction log (COFI_DATA_PATH). Required for every command.
    pub data_path: Option<PathBuf>,
    /// Field delimiter of the log (default "::")
    pub delimiter: String,
    /// Number of folds M; records spread over M + 1 buckets (default 8)
    pub folds: u32,
    /// Bucket held out as the test set (default 0)
    pub fold: u32,
    pub seed: u64,
    pub mode: Mode,
    pub weighting: Weighting,
    /// Neighborhood size; None means the mode's default
    pub neighbors: Option<usize>,
    pub top_n: usize,
    /// Disable rayon in the similarity build and evaluation
    pub sequential: bool,
}

impl Default for Config {
    fn default() -> Self {
        let partition = Partition::default();
        Self {
            data_path: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            folds: partition.folds,
            fold: partition.fold,
            seed: partition.seed,
            mode: Mode::default(),
            weighting: Weighting::default(),
            neighbors: None,
            top_n: RecommendOptions::default().top_n,
            sequential: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source. Unset variables keep
    /// their defaults; set but unparseable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sequential = match lookup("COFI_SEQUENTIAL").as_deref() {
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") | Some("") | None => false,
            Some(other) => anyhow::bail!("COFI_SEQUENTIAL must be true or false, got '{other}'"),
        };

        Ok(Self {
            data_path: lookup("COFI_DATA_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            delimiter: lookup("COFI_DELIMITER").unwrap_or(defaults.delimiter),
            folds: parse_var(&lookup, "COFI_FOLDS")?.unwrap_or(defaults.folds),
            fold: parse_var(&lookup, "COFI_FOLD")?.unwrap_or(defaults.fold),
            seed: parse_var(&lookup, "COFI_SEED")?.unwrap_or(defaults.seed),
            mode: parse_var(&lookup, "COFI_MODE")?.unwrap_or(defaults.mode),
            weighting: parse_var(&lookup, "COFI_WEIGHTING")?.unwrap_or(defaults.weighting),
            neighbors: parse_var(&lookup, "COFI_NEIGHBORS")?,
            top_n: parse_var(&lookup, "COFI_TOP_N")?.unwrap_or(defaults.top_n),
            sequential,
        })
    }

    /// Check that an interaction log is configured and exists.
    /// Call this before any command that loads data.
    pub fn require_data(&self) -> Result<&Path> {
        let Some(path) = self.data_path.as_deref() else {
            anyhow::bail!(
                "No interaction log configured. Pass --data <path> or set COFI_DATA_PATH\n\
                 (MovieLens ratings.dat format: user::item::rating::timestamp)."
            );
        };
        if !path.exists() {
            anyhow::bail!("Interaction log not found at {}", path.display());
        }
        Ok(path)
    }

    /// The train/test split described by folds, fold and seed.
    pub fn partition(&self) -> Result<Partition> {
        Partition::new(self.folds, self.fold, self.seed).context("Invalid partition settings")
    }

    pub fn engine(&self) -> SimilarityEngine {
        let engine = SimilarityEngine::new(self.mode, self.weighting);
        if self.sequential {
            engine.sequential()
        } else {
            engine
        }
    }

    /// Per-query options, falling back to the mode's neighborhood size.
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            neighbor_k: self.neighbors.unwrap_or_else(|| self.mode.default_neighbors()),
            exclude_seen: true,
            top_n: self.top_n,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{name}='{raw}' is invalid: {e}")),
    }
}
