use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = famrank_search::Args::parse();

	famrank_search::run(args).await
}
