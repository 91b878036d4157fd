//! Command Line Interface for the Tributary candle indexer.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use prettytable::{Table, row};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tributary_data::{Database, MemoryStore, Store};
use tributary_domain::{Candle, PoolId, Resolution};
use tributary_indexer::query::fill_gaps;
use tributary_indexer::{EventFeed, EventProcessor, IndexerConfig};

#[derive(Parser)]
#[command(name = "tributary")]
#[command(about = "Tributary AMM pool indexer and candle aggregator", long_about = None)]
struct Cli {
    /// JSON indexer configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PostgreSQL connection string; replays use an in-memory store when unset
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines event file through the indexer
    Replay {
        /// Event file, one JSON event per line
        events: PathBuf,

        /// Print the latest swaps and the candles of this pool after the replay
        #[arg(short, long)]
        pool: Option<String>,

        /// Resolution of the printed candles
        #[arg(short, long, default_value = "1m")]
        resolution: Resolution,

        /// Fill empty buckets with flat candles when printing
        #[arg(long)]
        fill_gaps: bool,
    },
    /// List indexed pools
    Pools,
    /// Show protocol statistics
    Stats,
    /// Show the candles of a pool
    Candles {
        /// Pool id
        #[arg(short, long)]
        pool: String,

        /// Candle resolution (1m, 5m, 1h, 1d)
        #[arg(short, long, default_value = "1h")]
        resolution: Resolution,

        /// First bucket start, unix seconds
        #[arg(long, default_value_t = 0)]
        from: u64,

        /// Last bucket start, unix seconds
        #[arg(long, default_value_t = u64::MAX)]
        to: u64,

        /// Fill empty buckets with flat candles
        #[arg(long)]
        fill_gaps: bool,
    },
    /// Show the most recent swaps of a pool
    Swaps {
        /// Pool id
        #[arg(short, long)]
        pool: String,

        /// Number of swaps to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Create the database schema
    Migrate,
}

/// Connects to PostgreSQL when a database URL is configured.
async fn database(url: Option<&str>) -> Result<Option<Database>> {
    match url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            Ok(Some(db))
        }
        None => Ok(None),
    }
}

async fn require_database(url: Option<&str>) -> Result<Database> {
    match database(url).await? {
        Some(db) => Ok(db),
        None => bail!("DATABASE_URL must be set in .env, the environment or --database-url"),
    }
}

fn format_time(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

async fn print_candles(
    store: &dyn Store,
    pool: &PoolId,
    resolution: Resolution,
    from: u64,
    to: u64,
    fill: bool,
) -> Result<()> {
    let mut candles = store.candles_in_range(pool, resolution, from, to).await?;
    if candles.is_empty() {
        println!("No {resolution} candles for pool {pool}.");
        return Ok(());
    }
    if fill {
        let last = candles.last().map_or(to, |c| c.bucket_start);
        let first = candles.first().map_or(from, |c| c.bucket_start);
        candles = fill_gaps(&candles, resolution, first, to.min(last));
    }

    let mut table = Table::new();
    table.add_row(row!["Time", "Open", "High", "Low", "Close", "Volume", "Trades"]);
    for Candle {
        bucket_start,
        open,
        high,
        low,
        close,
        volume,
        tx_count,
        ..
    } in &candles
    {
        table.add_row(row![
            format_time(*bucket_start),
            open.value.round(6),
            high.value.round(6),
            low.value.round(6),
            close.value.round(6),
            volume.round(6),
            tx_count
        ]);
    }
    println!("{resolution} candles for pool {pool}:");
    table.printstd();
    Ok(())
}

async fn print_pools(store: &dyn Store) -> Result<()> {
    let pools = store.list_pools().await?;
    if pools.is_empty() {
        println!("No pools indexed.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row![
        "Pool", "Token", "Quote", "Reserve token", "Reserve quote", "Volume quote", "Fees", "Trades", "Last close", "Created"
    ]);
    for pool in &pools {
        let last_close = store
            .latest_candle(&pool.id, Resolution::OneMinute)
            .await?
            .map_or_else(|| "-".to_string(), |c| c.close.value.round(6).to_string());
        table.add_row(row![
            pool.id,
            pool.token_id,
            pool.quote_token_id,
            pool.reserve_token.round(6),
            pool.reserve_quote.round(6),
            pool.volume_quote.round(6),
            pool.fees_collected.round(6),
            pool.tx_count,
            last_close,
            format_time(pool.created_at)
        ]);
    }
    table.printstd();
    Ok(())
}

async fn print_swaps(store: &dyn Store, pool: &PoolId, limit: usize) -> Result<()> {
    let swaps = store.recent_swaps(pool, limit).await?;
    if swaps.is_empty() {
        println!("No swaps for pool {pool}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["Time", "Side", "Quote", "Tokens", "Price", "Fee", "Trader", "Tx"]);
    for swap in &swaps {
        table.add_row(row![
            format_time(swap.timestamp),
            if swap.is_buy { "buy" } else { "sell" },
            swap.quote_amount().round(6),
            swap.token_amount().round(6),
            swap.price.value.round(6),
            swap.fee.round(6),
            swap.trader,
            format!("{}:{}", swap.tx_hash, swap.log_index)
        ]);
    }
    println!("Latest {} swaps for pool {pool}:", swaps.len());
    table.printstd();
    Ok(())
}

async fn print_stats(store: &dyn Store, id: &str) -> Result<()> {
    let Some(stats) = store.load_protocol_stats(id).await? else {
        println!("No protocol statistics recorded.");
        return Ok(());
    };

    let mut table = Table::new();
    table.add_row(row!["Pools", stats.total_pools]);
    table.add_row(row!["Volume", stats.total_volume.round(6)]);
    table.add_row(row!["Fees collected", stats.total_fees_collected.round(6)]);
    table.add_row(row!["Vaults", stats.total_vaults]);
    table.add_row(row!["Royalties distributed", stats.total_royalties_distributed.round(6)]);
    table.add_row(row!["Holders", stats.total_holders]);
    table.printstd();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IndexerConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => IndexerConfig::default(),
    };

    let url = cli.database_url.as_deref();
    match cli.command {
        Commands::Replay {
            events,
            pool,
            resolution,
            fill_gaps,
        } => {
            let store: Arc<dyn Store> = match database(url).await? {
                Some(db) => {
                    info!("Replaying into PostgreSQL");
                    Arc::new(db)
                }
                None => {
                    info!("DATABASE_URL not set, replaying into memory");
                    Arc::new(MemoryStore::new())
                }
            };

            let feed = EventFeed::from_path(&events)
                .with_context(|| format!("failed to open {}", events.display()))?;
            let processor = EventProcessor::new(store.clone(), config.clone());
            let summary = processor.run(feed).await?;
            println!(
                "Replayed {}: {} applied, {} skipped",
                events.display(),
                summary.applied,
                summary.skipped
            );

            print_pools(store.as_ref()).await?;
            print_stats(store.as_ref(), &config.protocol_stats_id).await?;
            if let Some(pool) = pool {
                let pool = PoolId::new(pool);
                print_swaps(store.as_ref(), &pool, 10).await?;
                print_candles(
                    store.as_ref(),
                    &pool,
                    resolution,
                    0,
                    u64::MAX,
                    fill_gaps,
                )
                .await?;
            }
        }
        Commands::Pools => {
            let db = require_database(url).await?;
            print_pools(&db).await?;
        }
        Commands::Stats => {
            let db = require_database(url).await?;
            print_stats(&db, &config.protocol_stats_id).await?;
        }
        Commands::Candles {
            pool,
            resolution,
            from,
            to,
            fill_gaps,
        } => {
            if from > to {
                bail!("--from ({from}) must not be after --to ({to})");
            }
            let db = require_database(url).await?;
            print_candles(&db, &PoolId::new(pool), resolution, from, to, fill_gaps).await?;
        }
        Commands::Swaps { pool, limit } => {
            let db = require_database(url).await?;
            print_swaps(&db, &PoolId::new(pool), limit).await?;
        }
        Commands::Migrate => {
            let db = require_database(url).await?;
            db.migrate().await.context("migration failed")?;
            println!("Schema is up to date.");
        }
    }

    Ok(())
}
