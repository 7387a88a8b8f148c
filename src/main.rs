mod cli;

use clap::Parser;
use cli::{Cli, Commands, ListArgs};
use indieserv::config::Config;
use indieserv::store::BlogStore;
use tracing_subscriber::EnvFilter;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Server(args) => indieserv::api::server::run(config, args.address).await?,
        Commands::List(args) => list(&config, args)?,
    }

    Ok(())
}

fn list(config: &Config, args: ListArgs) -> Result<(), AnyError> {
    let store = BlogStore::open(&config.server.data_path)?;
    for entry in store.entries().list_reverse_chronological(args.drafts) {
        let entry = entry?;
        println!(
            "{}\t{}\t{}{}",
            entry.identifier(),
            entry.kind().as_str(),
            entry.published().to_rfc3339(),
            if entry.is_draft() { "\tdraft" } else { "" }
        );
    }
    Ok(())
}
