use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront::config::Config;
use shopfront::handoff::InstallRequest;
use shopfront::probe::AvailabilityProber;
use shopfront::session::{CatalogSession, CatalogView};
use shopfront::types::AvailabilityStatus;
use shopfront::ResilientFetcher;

/// Client-side catalog browser for app repository sources
#[derive(Parser, Debug)]
#[command(name = "shopfront")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the source registry document
    #[arg(long, value_name = "PATH")]
    registry_path: Option<PathBuf>,

    /// Base URL of the CORS proxy relay
    #[arg(long, value_name = "URL")]
    proxy_base: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List configured catalog sources
    Sources {
        /// Filter sources by name or URL
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Probe every source for best-effort availability
    Probe,
    /// Open a source and list its normalized items
    Open {
        /// Registry index of the source to open
        index: usize,
        /// Filter items by name or description
        #[arg(short, long)]
        query: Option<String>,
        /// Print install hand-off URLs for downloadable items
        #[arg(long)]
        handoff: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(
        args.config.as_ref(),
        args.registry_path.as_ref(),
        args.proxy_base.as_deref(),
        args.timeout_secs,
    )?;

    info!(
        "Configuration loaded: registry={}",
        config.registry_path.display()
    );

    let sources = shopfront::registry::load_sources(&config.registry_path).await?;

    match args.command {
        Command::Sources { query } => {
            let fetcher = Arc::new(ResilientFetcher::new(&config.proxy_base, config.timeout())?);
            let session = CatalogSession::new(sources, fetcher);
            let matched = session.filter_sources(query.as_deref().unwrap_or(""));
            if matched.is_empty() {
                println!("No repositories found. Try adjusting your search terms.");
                return Ok(());
            }
            for source in &matched {
                println!("{}  {}", source.name, source.url);
            }
            println!("{} source(s)", matched.len());
        }

        Command::Probe => {
            let prober = AvailabilityProber::new(&config.proxy_base, config.timeout())?;
            let mut statuses = prober.probe_all(&sources).await;
            statuses.sort_by_key(|(index, _)| *index);
            for (index, status) in statuses {
                let label = match status {
                    AvailabilityStatus::Available => "available",
                    AvailabilityStatus::Unavailable => "unavailable",
                };
                println!("{}  {}", sources[index].name, label);
            }
        }

        Command::Open {
            index,
            query,
            handoff,
        } => {
            let fetcher = Arc::new(ResilientFetcher::new(&config.proxy_base, config.timeout())?);
            let session = CatalogSession::new(sources, fetcher);
            let source = session
                .sources()
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no source at index {index}"))?;

            println!("Loading apps from {}...", source.name);
            if let Err(e) = session.open_source(index).await {
                return Err(report_open_failure(&source.name, &source.url, e));
            }

            let items = session.filter_items(query.as_deref().unwrap_or(""));
            if items.is_empty() {
                println!("No apps found. Seems like nothing is here...");
                return Ok(());
            }

            for item in &items {
                let version = item.version.as_deref().unwrap_or("-");
                println!("{}  v{}", item.display_name, version);
                if let Some(identifier) = &item.identifier {
                    println!("  bundle: {identifier}");
                }
                match &item.download_url {
                    Some(url) if handoff => {
                        if let Some(request) = InstallRequest::for_item(item, &source) {
                            println!("  install: {}", request.page_url(&config.install_page));
                        }
                        println!("  download: {url}");
                    }
                    Some(url) => println!("  download: {url}"),
                    None => println!("  no download link"),
                }
            }
            println!("{} item(s)", items.len());

            // Leave the detail view the way the UI would on dismissal.
            session.close_source();
            debug_assert!(matches!(session.view(), CatalogView::Idle));
        }
    }

    Ok(())
}

/// Translate a failed open into the user-facing remedy.
fn report_open_failure(
    name: &str,
    url: &str,
    error: shopfront::SessionError,
) -> anyhow::Error {
    if matches!(&error, shopfront::SessionError::Fetch(e) if e.is_cross_origin_block()) {
        eprintln!("{name} is blocked by cross-origin restrictions.");
        eprintln!("You can open it externally instead: {url}");
    } else {
        eprintln!("Could not load apps from {name}. Try again or switch source.");
    }
    anyhow::Error::new(error)
}
