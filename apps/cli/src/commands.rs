//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use serde::Serialize;
use sitenav_core::breadcrumbs::breadcrumbs;
use sitenav_core::navigation::{SectionNav, SidebarLoader, SidebarOptions};
use sitenav_core::{SiblingQuery, resolve_content_url, resolve_parent, resolve_siblings};
use sitenav_graph::{ContentGraph, HttpGraphClient, StaticGraph};
use sitenav_shared::{
    AppConfig, FailSoft, SiblingConfig, init_config, load_config, load_config_from,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitenav — contextual navigation for a content-graph backed site.
#[derive(Parser)]
#[command(
    name = "sitenav",
    version,
    about = "Resolve sibling pages, canonical URLs and breadcrumbs from a content graph.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.sitenav/sitenav.toml.
    #[arg(long, global = true, env = "SITENAV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Graph endpoint, overriding the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Answer graph queries from a JSON `data` document instead of the network.
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the sibling pages of a path.
    Siblings {
        /// Path of the current page (e.g. /kollektivavtal/apoteksavtalet/standard22).
        path: String,

        /// App locale (e.g. en, sv). Defaults to the configured sidebar locale.
        #[arg(short, long)]
        locale: Option<String>,

        /// Levels to ascend to find the parent.
        #[arg(short, long)]
        depth: Option<usize>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Exit with an error instead of printing an empty listing on failure.
        #[arg(long)]
        strict: bool,
    },

    /// Resolve the published URL of a content item.
    Url {
        /// Content key.
        key: String,

        /// App locale.
        #[arg(short, long)]
        locale: Option<String>,

        /// Print JSON.
        #[arg(long)]
        json: bool,

        /// Exit with an error instead of printing nulls on failure.
        #[arg(long)]
        strict: bool,
    },

    /// Show the breadcrumb trail of a path.
    Breadcrumbs {
        path: String,
    },

    /// Show the full sidebar for a path.
    Nav {
        path: String,

        /// Filter entries by label.
        #[arg(short, long, default_value = "")]
        search: String,

        /// App locale.
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Show the parent a sibling lookup would use, without querying.
    Parent {
        path: String,

        #[arg(short, long, default_value = "1")]
        depth: usize,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitenav=info",
        1 => "sitenav=debug",
        _ => "sitenav=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(endpoint) = &cli.endpoint {
        config.graph.endpoint = endpoint.clone();
    }

    match cli.command {
        Command::Siblings {
            path,
            locale,
            depth,
            json,
            strict,
        } => {
            let graph = open_graph(&config, cli.fixture.as_deref())?;
            cmd_siblings(&config, graph.as_ref(), &path, locale, depth, json, strict).await
        }
        Command::Url {
            key,
            locale,
            json,
            strict,
        } => {
            let graph = open_graph(&config, cli.fixture.as_deref())?;
            cmd_url(graph.as_ref(), &key, locale.as_deref(), json, strict).await
        }
        Command::Breadcrumbs { path } => cmd_breadcrumbs(&config, &path),
        Command::Nav {
            path,
            search,
            locale,
        } => {
            let graph = open_graph(&config, cli.fixture.as_deref())?;
            cmd_nav(&config, graph.as_ref(), &path, &search, locale).await
        }
        Command::Parent { path, depth } => cmd_parent(&path, depth),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// The HTTP client, or a static graph when `--fixture` is given.
fn open_graph(config: &AppConfig, fixture: Option<&Path>) -> Result<Box<dyn ContentGraph>> {
    match fixture {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| eyre!("cannot read fixture '{}': {e}", path.display()))?;
            let data: serde_json::Value = serde_json::from_str(&content)?;
            info!(fixture = %path.display(), "answering graph queries from fixture");
            Ok(Box::new(StaticGraph::with_data(data)))
        }
        None => {
            let client = HttpGraphClient::from_config(config)?;
            info!(endpoint = %client.endpoint(), "using content graph");
            Ok(Box::new(client))
        }
    }
}

/// Take the value of a fail-soft result, or turn the failure into an error
/// under `--strict`.
fn settle<T>(outcome: FailSoft<T>, strict: bool, what: &str) -> Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(degraded) if strict => Err(eyre!("{what} failed: {}", degraded.error)),
        Err(degraded) => {
            warn!(error = %degraded.error, "{what} degraded, showing empty result");
            Ok(degraded.fallback)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_siblings(
    config: &AppConfig,
    graph: &dyn ContentGraph,
    path: &str,
    locale: Option<String>,
    depth: Option<usize>,
    json: bool,
    strict: bool,
) -> Result<()> {
    let mut query = SiblingQuery::new(path)
        .with_depth(depth.unwrap_or(config.navigation.sibling_depth));
    query.locale = locale.or_else(|| Some(config.navigation.default_locale.clone()));

    info!(path, depth = query.depth, "resolving sibling pages");

    let outcome = resolve_siblings(&query, graph, &SiblingConfig::from(config)).await;
    let result = settle(outcome, strict, "sibling lookup")?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("  Parent: {}", result.parent_path);
    if result.pages.is_empty() {
        println!("  No sibling pages found.");
    }
    for page in &result.pages {
        let marker = if page.url.trim_end_matches('/').ends_with(path.trim_end_matches('/')) {
            "*"
        } else {
            " "
        };
        println!("  {marker} {:<40} {}", page.display_name, page.url);
    }
    println!();

    Ok(())
}

async fn cmd_url(
    graph: &dyn ContentGraph,
    key: &str,
    locale: Option<&str>,
    json: bool,
    strict: bool,
) -> Result<()> {
    info!(key, "resolving content URL");

    let outcome = resolve_content_url(key, locale, graph).await;
    let result = settle(outcome, strict, "URL lookup")?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("  URL:          {}", result.url.as_deref().unwrap_or("(none)"));
    println!(
        "  Hierarchical: {}",
        result.hierarchical_path.as_deref().unwrap_or("(none)")
    );
    println!();

    Ok(())
}

fn cmd_breadcrumbs(config: &AppConfig, path: &str) -> Result<()> {
    let trail = breadcrumbs(path, &config.navigation.home_label);
    let section = SectionNav::new(config.sections.clone());

    let rendered: Vec<String> = trail
        .iter()
        .map(|crumb| {
            if crumb.current {
                format!("[{}]", crumb.label)
            } else {
                crumb.label.clone()
            }
        })
        .collect();

    println!("{}", rendered.join(" › "));
    println!("section: {}", section.active_section(path));
    Ok(())
}

async fn cmd_nav(
    config: &AppConfig,
    graph: &dyn ContentGraph,
    path: &str,
    search: &str,
    locale: Option<String>,
) -> Result<()> {
    let mut options = SidebarOptions::from(config);
    if locale.is_some() {
        options.locale = locale;
    }

    let loader = SidebarLoader::new(options);
    loader.load(path, graph).await;
    let view = loader.view(search).await;

    println!();
    println!("  {}", view.title);
    println!("  {}", "-".repeat(view.title.chars().count()));
    for entry in &view.entries {
        let marker = if entry.active { ">" } else { " " };
        println!("  {marker} {}", entry.item.label);
    }
    if let Some(message) = &view.empty_message {
        println!("  {message}");
    }
    println!();

    Ok(())
}

fn cmd_parent(path: &str, depth: usize) -> Result<()> {
    print_json(&resolve_parent(path, depth))
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
