use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = famrank_indexer::Args::parse();

	famrank_indexer::run(args).await
}
