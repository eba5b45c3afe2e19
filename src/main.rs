//! # Sejm Analytics
//!
//! Command line front of the analytics engine. Precompute jobs run it with a
//! writable cache after each data sync; inspection commands can run against a
//! read-only cache. See `help` for more information.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sejm_analytics::adapters::{FileAnalyticsCache, PostgresAnalyticsCache, PostgresVoteDataReader};
use sejm_analytics::application::{
    AnalyticsError, AnalyticsService, ClearAnalyticsCommand, ClearAnalyticsHandler,
    PrecomputeAnalyticsCommand, PrecomputeAnalyticsHandler,
};
use sejm_analytics::config::{
    AppConfig, CacheBackend, ConfigError, LogFormat, LoggingConfig, ValidationError,
};
use sejm_analytics::domain::foundation::TermId;
use sejm_analytics::ports::{AnalyticsCache, MetricKey};

#[derive(Debug, Clone, Parser)]
#[clap(author, version, about)]
struct Opt {
    #[clap(subcommand)]
    command: Command,

    /// Overrides `logging.level`. Ignored when `RUST_LOG` is set.
    #[clap(long, short)]
    log: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Compute and cache every metric of a term.
    Precompute {
        #[clap(long)]
        term: TermId,

        /// Clear the term's cached metrics first.
        #[clap(long)]
        force: bool,
    },
    /// Delete cached metrics of one term, or of all terms.
    Clear {
        #[clap(long)]
        term: Option<TermId>,
    },
    /// Print a cached metric as JSON. Never computes.
    Show {
        #[clap(long)]
        term: TermId,

        /// One of power_indices, cohesion, markov, coalitions, agreement_matrix.
        #[clap(long)]
        metric: MetricKey,
    },
    /// Print headline counts of a term as JSON.
    Overview {
        #[clap(long)]
        term: TermId,
    },
    /// List known terms as JSON, newest first.
    Terms,
}

impl Command {
    /// Whether the command queries the synced vote tables.
    fn reads_vote_data(&self) -> bool {
        matches!(
            self,
            Command::Precompute { .. } | Command::Overview { .. } | Command::Terms
        )
    }
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid log filter: {0}")]
    LogParse(#[from] tracing_subscriber::filter::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_tracing(config: &LoggingConfig, level: Option<&str>) -> Result<(), Error> {
    let level = level.unwrap_or(&config.level);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    // Stdout carries command output only.
    match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

async fn connect(config: &AppConfig, reads_vote_data: bool) -> Result<Option<PgPool>, Error> {
    if !config.requires_database(reads_vote_data) {
        return Ok(None);
    }

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }
    Ok(Some(pool))
}

fn build_cache(config: &AppConfig, pool: Option<&PgPool>) -> Result<Arc<dyn AnalyticsCache>, Error> {
    let access = config.cache.access();
    let cache: Arc<dyn AnalyticsCache> = match config.cache.backend {
        // Each run is a separate process.
        CacheBackend::Memory => return Err(ValidationError::EphemeralCacheBackend.into()),
        CacheBackend::File => Arc::new(FileAnalyticsCache::new(&config.cache.directory, access)),
        CacheBackend::Postgres => {
            let pool = pool.ok_or(ValidationError::MissingRequired("DATABASE_URL"))?;
            Arc::new(PostgresAnalyticsCache::new(pool.clone(), access))
        }
    };
    Ok(cache)
}

fn build_service(
    config: &AppConfig,
    pool: Option<&PgPool>,
    cache: Arc<dyn AnalyticsCache>,
) -> Result<AnalyticsService, Error> {
    let pool = pool.ok_or(ValidationError::MissingRequired("DATABASE_URL"))?;
    let reader = Arc::new(PostgresVoteDataReader::new(pool.clone()));
    Ok(AnalyticsService::new(
        reader.clone(),
        reader,
        cache,
        config.analytics.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let Opt { command, log } = Opt::parse();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, log.as_deref())?;
    let reads_vote_data = command.reads_vote_data();
    config.validate_for(reads_vote_data)?;

    let pool = connect(&config, reads_vote_data).await?;
    let cache = build_cache(&config, pool.as_ref())?;
    info!(
        backend = ?config.cache.backend,
        read_only = config.cache.read_only,
        "Analytics cache opened"
    );

    match command {
        Command::Precompute { term, force } => {
            let service = build_service(&config, pool.as_ref(), cache)?;
            let handler = PrecomputeAnalyticsHandler::new(Arc::new(service));
            let result = handler
                .handle(PrecomputeAnalyticsCommand {
                    term_id: term,
                    force,
                })
                .await?;
            let keys: Vec<&str> = result.metrics.iter().map(MetricKey::as_str).collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        Command::Clear { term } => {
            let handler = ClearAnalyticsHandler::new(cache);
            handler.handle(ClearAnalyticsCommand { term_id: term }).await?;
        }
        Command::Show { term, metric } => match cache.get_entry(term, metric.as_str()).await {
            Ok(Some(entry)) => {
                info!(term_id = %term, key = %metric, computed_at = %entry.computed_at.as_datetime(), "Cached metric");
                println!("{}", serde_json::to_string_pretty(&entry.data)?);
            }
            Ok(None) => warn!(term_id = %term, key = %metric, "Metric not cached; run precompute first"),
            Err(e) => return Err(AnalyticsError::from(e).into()),
        },
        Command::Overview { term } => {
            let service = build_service(&config, pool.as_ref(), cache)?;
            let overview = service.overview(term).await?;
            if !overview.has_seat_data() {
                warn!(term_id = %term, "Term has no seat data");
            }
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Command::Terms => {
            let service = build_service(&config, pool.as_ref(), cache)?;
            let terms = service.terms().await?;
            println!("{}", serde_json::to_string_pretty(&terms)?);
        }
    }

    Ok(())
}
