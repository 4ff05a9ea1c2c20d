use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = famrank_api::Args::parse();

	famrank_api::run(args).await
}
