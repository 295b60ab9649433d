use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = wikisearch_maint::Args::parse();

	wikisearch_maint::run(args).await
}
