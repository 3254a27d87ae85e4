//! sitenav CLI — contextual navigation lookups against a content graph.
//!
//! Resolves sibling pages, published URLs and breadcrumb trails for a page
//! path, the way the site's sidebar and preview routes do.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
