use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use review_feed::{
    FeedConfig, FeedHandle, FeedWindow, ProximitySignal, TopicSelector, TopicSuggester,
};
use review_ingest::{source_for, Fallback, LoadOutcome, ReviewLoader};
use review_protocol::serialize_json_pretty;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

mod render;
mod scroll;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "reviews")]
#[command(about = "Browse Cochrane review listings by topic", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Review document: path or http(s) URL (overrides REVIEWS_SOURCE)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Fallback data: builtin, none, or a JSON file (overrides REVIEWS_FALLBACK)
    #[arg(long, global = true)]
    fallback: Option<String>,

    /// Records per page (overrides REVIEWS_PAGE_SIZE)
    #[arg(long, global = true)]
    page_size: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the visible window of reviews, optionally filtered by topic
    List(ListArgs),

    /// List distinct topics in first-seen order
    Topics(JsonArgs),

    /// Suggest topics containing the given text
    Suggest(SuggestArgs),

    /// Describe the structure of the review document
    Inspect(JsonArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Only show reviews with exactly this topic
    #[arg(long, short = 't')]
    topic: Option<String>,

    /// Number of pages to reveal by scrolling
    #[arg(long, short = 'p', default_value_t = 1)]
    pages: usize,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct JsonArgs {
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SuggestArgs {
    /// Text typed into the search box
    input: String,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(&cli)?;
    log::debug!("Effective config: {config:?}");

    match cli.command {
        Commands::List(args) => run_list(args, &config).await?,
        Commands::Topics(args) => run_topics(args, &config).await?,
        Commands::Suggest(args) => run_suggest(args, &config).await?,
        Commands::Inspect(args) => run_inspect(args, &config).await?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<FeedConfig> {
    let mut config = match &cli.config {
        Some(path) => FeedConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FeedConfig::default(),
    };
    config.apply_env().context("Invalid REVIEWS_* environment")?;

    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(fallback) = &cli.fallback {
        config.fallback = fallback.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.validate()?;
    Ok(config)
}

async fn load(config: &FeedConfig) -> Result<LoadOutcome> {
    let source = source_for(&config.source)
        .with_context(|| format!("Failed to set up source {}", config.source))?;
    let fallback: Fallback = config.fallback.parse()?;
    Ok(ReviewLoader::new(source).with_fallback(fallback).load().await)
}

async fn run_list(args: ListArgs, config: &FeedConfig) -> Result<()> {
    let outcome = load(config).await?;
    let window = FeedWindow::new(outcome.records.clone(), config.page_size);
    let feed = FeedHandle::spawn(window, outcome.topics, config.settle_delay());

    if let Some(topic) = args.topic {
        feed.change_filter(TopicSelector::topic(topic)).await?;
    }

    let mut signal = ProximitySignal::from_config(config);
    let snapshot = scroll::reveal_pages(&feed, &mut signal, args.pages).await?;
    feed.shutdown().await;

    if args.json {
        print_stdout(&serialize_json_pretty(&snapshot)?)
    } else {
        print_stdout(&render::feed(&snapshot))
    }
}

async fn run_topics(args: JsonArgs, config: &FeedConfig) -> Result<()> {
    let outcome = load(config).await?;
    if args.json {
        print_stdout(&serialize_json_pretty(&outcome.topics)?)
    } else {
        print_stdout(&outcome.topics.join("\n"))
    }
}

async fn run_suggest(args: SuggestArgs, config: &FeedConfig) -> Result<()> {
    let outcome = load(config).await?;
    let mut suggester = TopicSuggester::new();
    let suggestions = suggester.suggest(&args.input, &outcome.topics);
    if args.json {
        print_stdout(&serialize_json_pretty(&suggestions)?)
    } else {
        print_stdout(&suggestions.join("\n"))
    }
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    location: &'a str,
    report: Option<&'a review_ingest::PayloadReport>,
    stats: &'a review_ingest::LoadStats,
}

async fn run_inspect(args: JsonArgs, config: &FeedConfig) -> Result<()> {
    let outcome = load(config).await?;
    let output = InspectOutput {
        location: &config.source,
        report: outcome.report.as_ref(),
        stats: &outcome.stats,
    };
    if args.json {
        print_stdout(&serialize_json_pretty(&output)?)
    } else {
        print_stdout(&render::inspection(output.location, output.report, output.stats))
    }
}
