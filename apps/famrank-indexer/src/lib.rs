pub mod indexer;

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use famrank_service::FamRankService;
use famrank_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = famrank_cli::VERSION,
	rename_all = "kebab",
	styles = famrank_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Run one backfill pass and exit.
	#[arg(long)]
	pub once: bool,
	/// Seconds to wait between passes.
	#[arg(
		long,
		value_name = "SECS",
		default_value_t = indexer::DEFAULT_INTERVAL_SECS,
		value_parser = clap::value_parser!(u64).range(1..),
	)]
	pub interval_secs: u64,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = famrank_config::load(&args.config)?;

	famrank_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let service = FamRankService::new(config, db);

	if args.once {
		indexer::run_once(&service).await?;

		return Ok(());
	}

	indexer::run_indexer(&service, Duration::from_secs(args.interval_secs)).await
}
