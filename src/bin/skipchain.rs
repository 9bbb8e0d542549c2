//! skipchain CLI
//!
//! Runs chain queries against a snapshot file of `Key` items.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use skipchain::store::{MemoryBlockStore, MemoryTipStore, Snapshot};
use skipchain::{ChainDb, Config, Index, IndexedBlock, Key, ReadOptions};
use tracing_subscriber::{fmt, EnvFilter};

/// skipchain CLI
#[derive(Parser, Debug)]
#[command(name = "skipchain")]
#[command(about = "Query skip-pointer block chains stored in a snapshot file")]
#[command(version)]
struct Args {
    /// Snapshot file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Database name
    #[arg(short, long, default_value = "default")]
    database: String,

    /// Treat stored blocks as already sorted
    #[arg(long)]
    sorted: bool,

    /// Pin reads to a storage version
    #[arg(long, global = true)]
    at: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the tip block of a chain
    Tip { index: String, value: Key },

    /// List every block of a chain, tip first
    Walk { index: String, value: Key },

    /// Show the block that holds, or would hold, an item
    BlockFor { index: String, value: Key, item: Key },

    /// Look up an item
    Find { index: String, value: Key, item: Key },
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skipchain=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> skipchain::Result<()> {
    tracing::info!("skipchain v{}", skipchain::VERSION);
    tracing::info!("Snapshot: {}", args.snapshot.display());

    let snapshot: Snapshot<Key> = Snapshot::load(&args.snapshot)?;

    // Every index named by a tip in this database, keyed by the item itself
    let names: BTreeSet<String> = snapshot
        .tips
        .iter()
        .filter(|tip| tip.database == args.database)
        .map(|tip| tip.index_name.clone())
        .collect();

    let (blocks, tips) = snapshot.restore();
    let blocks: Arc<MemoryBlockStore<Key>> = Arc::new(blocks);
    let tips: Arc<MemoryTipStore> = Arc::new(tips);

    let indices = names
        .into_iter()
        .map(|name| Index::new(name, |item: &Key| item.clone(), blocks.clone(), tips.clone()))
        .collect();

    let config = Config::builder().sorted(args.sorted).build();
    let db = ChainDb::new(args.database, indices, config)?;

    let mut options = ReadOptions::new();
    if let Some(version) = args.at {
        options = options.at_version(version);
    }

    match args.command {
        Commands::Tip { index, value } => {
            print_optional(db.get_tip_block(&index, &value, options).await?.as_ref());
        }
        Commands::Walk { index, value } => {
            for block in db.walk(&index, &value, options).await? {
                print_block(&block);
            }
        }
        Commands::BlockFor { index, value, item } => {
            print_optional(db.find_block_for(&index, &value, &item, options).await?.as_ref());
        }
        Commands::Find { index, value, item } => match db.find_item(&index, &value, &item, options).await? {
            Some(found) => println!("{}", found),
            None => println!("(not found)"),
        },
    }

    db.close();
    Ok(())
}

fn print_optional(block: Option<&IndexedBlock<Key>>) {
    match block {
        Some(block) => print_block(block),
        None => println!("(no block)"),
    }
}

fn print_block(block: &IndexedBlock<Key>) {
    let next: Vec<String> = block
        .header()
        .next
        .iter()
        .map(|id| id.map_or_else(|| "-".to_string(), |id| id.to_string()))
        .collect();
    let items: Vec<String> = block.items().iter().map(Key::to_string).collect();

    println!(
        "block {} [next: {}] ({} items): {}",
        block.id(),
        next.join(", "),
        items.len(),
        items.join(" ")
    );
}
