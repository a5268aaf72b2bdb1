//! Binary entrypoint: lays out an artwork collection for one viewport and
//! prints the timeline as JSON.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use artwork_timeline::config::Configuration;
use artwork_timeline::measure::breakpoints::Viewport;
use artwork_timeline::store::Store;
use artwork_timeline::tasks::collection;
use artwork_timeline::timeline::SortMode;
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "artwork-timeline", about = "Lay out an artwork collection along a timeline")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the collection JSON file from the config
    #[arg(long, value_name = "FILE")]
    collection: Option<PathBuf>,

    /// Viewport to lay out for, as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", default_value = "1440x900")]
    viewport: Viewport,

    /// latest, oldest or random
    #[arg(long, default_value = "latest")]
    sort: SortMode,

    /// Only include artworks from this series (repeatable)
    #[arg(long = "series", value_name = "NAME")]
    series: Vec<String>,

    /// Only include artworks whose title contains this text
    #[arg(long, default_value = "")]
    search: String,

    /// Re-emit the timeline whenever the collection file changes
    #[arg(long)]
    watch: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("artwork_timeline={level}").parse()?)
        .add_directive("notify=warn".parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn print_timeline(store: &Store) -> Result<()> {
    match store.timeline() {
        Some(timeline) => {
            println!("{}", serde_json::to_string_pretty(timeline)?);
        }
        None => {
            warn!("viewport too small to lay out the timeline");
            println!("null");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("validating configuration")?;

    let collection_path = cli.collection.unwrap_or_else(|| cfg.collection_path.clone());
    let artworks = collection::load(&collection_path)?;

    let mut store = Store::new(artworks, &cfg);
    store.set_sorting(cli.sort);
    store.set_filters(cli.series.into_iter().collect::<BTreeSet<_>>());
    store.set_search(cli.search);
    store.set_viewport(cli.viewport);
    print_timeline(&store)?;

    if !cli.watch {
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel(4);
    let watcher = tokio::spawn(collection::run(collection_path, tx, cancel.clone()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received; stopping");
                cancel.cancel();
                break;
            }
            next = rx.recv() => match next {
                Some(artworks) => {
                    store.replace_collection(artworks);
                    print_timeline(&store)?;
                }
                None => break,
            }
        }
    }

    watcher.await.context("collection watcher panicked")??;
    Ok(())
}
