use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use cofi::config::Config;
use cofi::data::{loader, Dataset};
use cofi::error::CofiError;
use cofi::evaluate::{metrics, EvalContext};
use cofi::output::{self, terminal, EvaluationReport};
use cofi::recommend::neighborhood::NeighborhoodRecommender;
use cofi::recommend::traits::Recommender;
use cofi::similarity::{Mode, Weighting};

/// cofi: neighborhood collaborative filtering.
///
/// Builds a user-user or item-item similarity matrix from an implicit
/// feedback log, recommends top-N items, and scores the recommendations
/// against a held-out fold.
#[derive(Parser)]
#[command(name = "cofi", version, about)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Dataset and model settings shared by every command. Each flag overrides
/// the matching COFI_* environment variable.
#[derive(Args)]
struct DataArgs {
    /// Interaction log (user::item::rating::timestamp per line)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Field delimiter of the log (default: "::")
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// Number of folds M; records are spread over M + 1 buckets (default: 8)
    #[arg(long, global = true)]
    folds: Option<u32>,

    /// Bucket held out as the test set, 0..=M (default: 0)
    #[arg(long, global = true)]
    fold: Option<u32>,

    /// Partition seed (default: 42)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Similarity between users or between items (default: user)
    #[arg(long, global = true)]
    mode: Option<Mode>,

    /// cooccurrence, inverse-frequency or popularity-normalized
    #[arg(long, global = true)]
    weighting: Option<Weighting>,

    /// Run single-threaded
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score top-N recommendations for every training user against the test fold
    Evaluate {
        /// Neighborhood size (default: 80 for user mode, 10 for item mode)
        #[arg(long)]
        neighbors: Option<usize>,

        /// Recommendations per user (default: 10)
        #[arg(long)]
        top_n: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend items for one user
    Recommend {
        /// The user id as it appears in the log
        user: String,

        /// Neighborhood size (default: 80 for user mode, 10 for item mode)
        #[arg(long)]
        neighbors: Option<usize>,

        /// Number of recommendations (default: 10)
        #[arg(long)]
        top_n: Option<usize>,

        /// Keep items the user already interacted with
        #[arg(long)]
        include_seen: bool,

        #[arg(long)]
        json: bool,
    },

    /// List the most similar users (or items, with --mode item)
    Similar {
        /// The user or item id as it appears in the log
        entity: String,

        /// How many neighbors to show
        #[arg(long, default_value = "10")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Show dataset and split sizes
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cofi=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    apply_overrides(&mut config, cli.data);

    match cli.command {
        Commands::Evaluate {
            neighbors,
            top_n,
            json,
        } => {
            if neighbors.is_some() {
                config.neighbors = neighbors;
            }
            if let Some(n) = top_n {
                config.top_n = n;
            }

            let dataset = load_dataset(&config)?;
            let matrix = config.engine().build(&dataset.train);
            let recommender = NeighborhoodRecommender::new(&dataset.train, &matrix, config.mode);

            let options = config.recommend_options();
            let ctx = EvalContext {
                parallel: !config.sequential,
                show_progress: !json,
                ..EvalContext::new(&dataset.train, &dataset.test, options)
            };

            let scores = metrics::evaluate(&recommender, &ctx).context("Evaluation failed")?;

            let report = EvaluationReport {
                mode: config.mode,
                weighting: config.weighting,
                neighbors: options.neighbor_k,
                top_n: options.top_n,
                folds: config.folds,
                fold: config.fold,
                seed: config.seed,
                users: dataset.train.row_count(),
                metrics: scores,
            };

            if json {
                output::print_json(&report)?;
            } else {
                terminal::display_evaluation(&report);
            }
        }

        Commands::Recommend {
            user,
            neighbors,
            top_n,
            include_seen,
            json,
        } => {
            if neighbors.is_some() {
                config.neighbors = neighbors;
            }
            if let Some(n) = top_n {
                config.top_n = n;
            }

            let dataset = load_dataset(&config)?;
            let user_id = dataset
                .users
                .id(&user)
                .ok_or_else(|| CofiError::UnknownUser(user.clone()))?;

            let matrix = config.engine().build(&dataset.train);
            let recommender = NeighborhoodRecommender::new(&dataset.train, &matrix, config.mode);

            let mut options = config.recommend_options();
            options.exclude_seen = !include_seen;

            // A user whose every interaction landed in the test fold is
            // just as unknown to the model as one who never appeared.
            let list = match recommender.recommend(user_id, &options) {
                Err(CofiError::UnknownUser(_)) => return Err(CofiError::UnknownUser(user).into()),
                other => other?,
            };
            info!(user = %user, results = list.len(), "Generated recommendations");

            let named = output::name_items(&list, &dataset.items);
            if json {
                output::print_json(&named)?;
            } else {
                terminal::display_recommendations(&user, &named);
            }
        }

        Commands::Similar {
            entity,
            limit,
            json,
        } => {
            let dataset = load_dataset(&config)?;
            let names = match config.mode {
                Mode::User => &dataset.users,
                Mode::Item => &dataset.items,
            };
            let entity_id = names
                .id(&entity)
                .ok_or_else(|| CofiError::UnknownEntity(entity.clone()))?;

            let matrix = config.engine().build(&dataset.train);
            let recommender = NeighborhoodRecommender::new(&dataset.train, &matrix, config.mode);
            let named = output::name_neighbors(recommender.similar(entity_id, limit), names);

            if json {
                output::print_json(&named)?;
            } else {
                terminal::display_neighbors(&entity, config.mode, &named);
            }
        }

        Commands::Stats { json } => {
            let dataset = load_dataset(&config)?;
            let stats = dataset.stats();
            if json {
                output::print_json(&stats)?;
            } else {
                terminal::display_stats(&stats);
                println!(
                    "{}",
                    format!(
                        "  Split: fold {} of {} buckets, seed {}",
                        config.fold,
                        config.folds + 1,
                        config.seed
                    )
                    .dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Command-line flags win over environment variables.
fn apply_overrides(config: &mut Config, args: DataArgs) {
    if args.data.is_some() {
        config.data_path = args.data;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(folds) = args.folds {
        config.folds = folds;
    }
    if let Some(fold) = args.fold {
        config.fold = fold;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(weighting) = args.weighting {
        config.weighting = weighting;
    }
    if args.sequential {
        config.sequential = true;
    }
}

/// Read the log and split it into train and test sets.
fn load_dataset(config: &Config) -> Result<Dataset> {
    let path = config.require_data()?;
    let partition = config.partition()?;

    info!(path = %path.display(), "Loading interactions");
    let records = loader::load_file(path, &config.delimiter)
        .with_context(|| format!("Failed to load interaction log {}", path.display()))?;

    Ok(Dataset::split(&records, &partition))
}
