//! popmovies - browse popular and top-rated movies on TMDB.

/// Application configuration (TOML).
mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use popmovies_api::tmdb::{LocalMovieApi, Movie, SortCriteria, TmdbClient, TmdbUrls};

/// CLI argument parser.
#[derive(Debug, Parser)]
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
#[derive(Debug, Subcommand)]
enum Commands {
    /// List popular or top-rated movies.
    List(ListArgs),
    /// Show one movie with its videos and reviews.
    Details(DetailsArgs),
    /// Print the poster URL for an image path.
    Poster(PosterArgs),
}

/// Sort order accepted by `--sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    /// Most popular first.
    Popular,
    /// Highest rated first.
    #[value(alias = "top_rated")]
    TopRated,
}

impl From<SortArg> for SortCriteria {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Popular => Self::Popular,
            SortArg::TopRated => Self::TopRated,
        }
    }
}

/// Arguments for the `list` subcommand.
#[derive(Debug, clap::Args)]
struct ListArgs {
    /// Sort order.
    #[arg(long, value_enum, default_value_t = SortArg::Popular)]
    sort: SortArg,
    /// Print the movies as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `details` subcommand.
#[derive(Debug, clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID (e.g. 550).
    #[arg(long, required = true)]
    id: u64,
    /// Print the movie as JSON.
    #[arg(long)]
    json: bool,
}

/// Arguments for the `poster` subcommand.
#[derive(Debug, clap::Args)]
struct PosterArgs {
    /// Poster path as returned by TMDB (e.g. "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg").
    #[arg(long, required = true)]
    path: String,
}

/// Loads the config file for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds a `TmdbClient` from the config file and `TMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key = config.api_key()?;

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = &config.tmdb.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().context("failed to build TMDB client")
}

/// Formats a movie's release date, or "-" when unknown.
fn release_label(movie: &Movie) -> String {
    movie
        .released_on()
        .map_or_else(|| String::from("-"), |date| date.to_string())
}

/// Writes `value` to stdout as pretty JSON, outside the log formatter.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
fn write_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize JSON")?;
    writeln!(stdout).context("failed to write to stdout")?;
    Ok(())
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let sort = SortCriteria::from(args.sort);
    let page = client
        .movie_page(sort)
        .await
        .with_context(|| format!("TMDB movie/{sort} request failed"))?;

    if args.json {
        return write_json(&page.results);
    }

    if page.results.is_empty() {
        tracing::info!("No movies found.");
        return Ok(());
    }

    tracing::info!("Total results: {}", page.total_results);
    tracing::info!("ID\tRating\tReleased\tTitle");
    for movie in &page.results {
        tracing::info!(
            "{}\t{:.1}\t{}\t{}",
            movie.id,
            movie.vote_average,
            release_label(movie),
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let movie = client
        .movie_details(args.id)
        .await
        .with_context(|| format!("TMDB movie/{} request failed", args.id))?;

    if args.json {
        return write_json(&movie);
    }

    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.title);
    tracing::info!(
        "Original Title: {} ({})",
        movie.original_title,
        movie.original_language
    );
    tracing::info!("Released: {}", release_label(&movie));
    tracing::info!("Runtime: {}min", movie.runtime);
    tracing::info!(
        "Rating: {:.1}/10 ({} votes)",
        movie.vote_average,
        movie.vote_count
    );
    if movie.has_poster() {
        let poster = client
            .urls()
            .poster_url(&movie.poster_path)
            .context("failed to build poster URL")?;
        tracing::info!("Poster: {poster}");
    }
    tracing::info!("Overview: {}", movie.overview);

    tracing::info!("--- Videos ({})", movie.videos.len());
    for video in &movie.videos {
        tracing::info!(
            "  {} [{}] {}",
            video.name,
            video.site,
            video
                .resolved_url
                .as_ref()
                .map_or("-", url::Url::as_str),
        );
    }

    tracing::info!("--- Reviews ({})", movie.reviews.len());
    for review in &movie.reviews {
        tracing::info!(
            "  {} {}",
            review.author,
            review.url.as_ref().map_or("-", url::Url::as_str),
        );
    }

    Ok(())
}

/// Runs the `poster` subcommand.
///
/// # Errors
///
/// Returns an error if `path` is empty or the URL cannot be built.
#[instrument(skip_all)]
fn run_poster(args: &PosterArgs) -> Result<()> {
    if args.path.is_empty() {
        bail!("poster path is empty: the movie has no poster");
    }

    let url = TmdbUrls::new()
        .and_then(|urls| urls.poster_url(&args.path))
        .context("failed to build poster URL")?;
    tracing::info!("{url}");

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
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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
        Commands::List(args) => run_list(&args, cli.dir.as_ref()).await,
        Commands::Details(args) => run_details(&args, cli.dir.as_ref()).await,
        Commands::Poster(args) => run_poster(&args),
    }
}
