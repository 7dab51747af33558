//! whatmovie - KOFIC movie metadata fetcher CLI.

/// Application configuration (TOML).
mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, AppConfig, resolve_config_path};
use whatmovie_api::kofic::{
    KoficClient, LocalKoficApi, MovieListParams, fetch_movies, fetch_movies_by_page,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of the movie list (adult titles removed) with details.
    Movies(MoviesArgs),
    /// Fetch the details of one movie.
    Detail(CodeArgs),
    /// Print the poster image path scraped from the KOBIS movie page.
    Image(CodeArgs),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// 1-based page number.
    #[arg(long, required = true, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,

    /// Page size (default: 100, the API maximum).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    item_per_page: Option<u32>,
}

/// Arguments for subcommands taking a movie code.
#[derive(clap::Args)]
struct CodeArgs {
    /// KOFIC movie code (e.g. "20124079").
    #[arg(long, required = true)]
    code: String,
}

/// Builds a `KoficClient` from the config file and `KOFIC_API_KEY`.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, no API key is
/// available, or the client fails to build.
#[instrument(skip_all)]
fn build_kofic_client(dir: Option<&PathBuf>) -> Result<KoficClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let api_key = config
        .kofic
        .resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let mut builder = KoficClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.kofic.timeout());
    if let Some(url) = config.kofic.base_url {
        builder = builder.base_url(url);
    }
    if let Some(url) = config.kofic.web_base_url {
        builder = builder.web_base_url(url);
    }

    builder.build().context("failed to build KOFIC client")
}

/// Writes `value` to stdout as pretty JSON followed by a newline.
fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write JSON output")?;
    writeln!(stdout).context("failed to write output")?;
    Ok(())
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or any request of the
/// page fails.
#[instrument(skip_all, fields(page = args.page))]
async fn run_movies(args: &MoviesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_kofic_client(dir)?;

    let movies = match args.item_per_page {
        Some(item_per_page) => {
            let params = MovieListParams::new(args.page).item_per_page(item_per_page);
            fetch_movies(&client, &params).await
        }
        None => fetch_movies_by_page(&client, args.page).await,
    }
    .with_context(|| format!("failed to fetch movie list page {}", args.page))?;

    tracing::info!("Fetched {} movie(s)", movies.len());
    write_json(&movies)
}

/// Runs the `detail` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all, fields(code = %args.code))]
async fn run_detail(args: &CodeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_kofic_client(dir)?;

    let movie = client
        .movie_detail(&args.code)
        .await
        .with_context(|| format!("failed to fetch movie {}", args.code))?;

    write_json(&movie)
}

/// Runs the `image` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the page cannot be
/// fetched, or it has no image path.
#[instrument(skip_all, fields(code = %args.code))]
async fn run_image(args: &CodeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_kofic_client(dir)?;

    let image_path = client
        .movie_image_path(&args.code)
        .await
        .with_context(|| format!("failed to extract image path for movie {}", args.code))?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{image_path}").context("failed to write output")?;
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Movies(args) => run_movies(&args, cli.dir.as_ref()).await,
        Commands::Detail(args) => run_detail(&args, cli.dir.as_ref()).await,
        Commands::Image(args) => run_image(&args, cli.dir.as_ref()).await,
    }
}
