//! Interactive search console. Each stdin line is treated as the current contents of a search box.

pub mod console;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use famrank_service::{FamRankService, SearchSession};
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
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = famrank_config::load(&args.config)?;

	famrank_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let debounce_ms = config.search.debounce_ms;
	let session = SearchSession::from_config(Arc::new(FamRankService::new(config, db)));

	tracing::debug!(debounce_ms, "Search console started.");

	let mut updates = session.subscribe();
	let printer = tokio::spawn(async move {
		let mut stdout = io::stdout();

		while updates.changed().await.is_ok() {
			let rendered = console::render(&updates.borrow_and_update());

			stdout.write_all(rendered.as_bytes()).await?;
			stdout.flush().await?;
		}

		Ok::<_, std::io::Error>(())
	});
	let mut lines = BufReader::new(io::stdin()).lines();

	while let Some(line) = lines.next_line().await? {
		match console::Command::parse(&line) {
			console::Command::Search(text) => session.search(text),
			console::Command::Clear => session.clear_results(),
			console::Command::Quit => break,
		}
	}

	// Let the last search settle before closing the state channel.
	session.subscribe().wait_for(|state| !state.loading).await?;

	drop(session);

	printer.await??;

	Ok(())
}
