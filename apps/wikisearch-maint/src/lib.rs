//! Maintenance entry points for the search index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wikisearch_engine::Engine;
use wikisearch_store::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = wikisearch_cli::VERSION,
	rename_all = "kebab",
	styles = wikisearch_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Purge deleted documents, rebuild the index, then optimize it.
	Rebuild,
	/// Rebuild the index from the content store.
	Build,
	/// Remove indexed documents no longer present in the content store.
	Purge,
	/// Bootstrap: build the index only if it is empty.
	Init,
	/// Run an index optimize pass.
	Optimize,
	/// Print daemon counters.
	Status {
		#[arg(long, default_value = "%")]
		like: String,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = wikisearch_config::load(&args.config)?;

	init_tracing(&config);

	let store = Db::connect(&config.store).await?;

	tracing::info!(index = %config.sphinx.index, "Connected to the content store.");

	let mut engine = Engine::new(&config, store);

	match args.command {
		Command::Rebuild => {
			let removed = engine.purge_deleted().await?;

			println!("Purged {removed} deleted documents.");

			let report = engine.build_index().await?;

			print_report(&report);
			engine.optimize().await?;
			println!("Index optimize started.");
		},
		Command::Build => {
			let report = engine.build_index().await?;

			print_report(&report);
		},
		Command::Purge => {
			let removed = engine.purge_deleted().await?;

			println!("Purged {removed} deleted documents.");
		},
		Command::Init => {
			if engine.init_index().await? {
				println!("Index was empty and has been built.");
			} else {
				println!("Index already populated; nothing to do.");
			}
		},
		Command::Optimize => {
			engine.optimize().await?;
			println!("Index optimize started.");
		},
		Command::Status { like } => {
			for (counter, value) in engine.status(&like).await? {
				println!("{counter}: {value}");
			}
		},
	}

	Ok(())
}

fn print_report(report: &wikisearch_engine::BuildReport) {
	println!(
		"Indexed {} documents in {} batches ({} failed).",
		report.pages, report.batches, report.failed_batches
	);
}

fn init_tracing(config: &wikisearch_config::Config) {
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
