use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clubfind::catalog::{FetchOutcome, JsonPageSource, SearchOrchestrator};
use clubfind::index::ClubId;
use clubfind::output::{self, FacetReport};
use clubfind::query::{parse_query, FilterSelection};
use clubfind::utils::progress::LoadProgress;
use clubfind::utils::AppConfig;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use termcolor::{ColorChoice, StandardStream};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clubfind")]
#[command(about = "Search and filter a paginated club directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// When to colorize output
    #[arg(long, global = true, value_enum)]
    color: Option<ColorArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search clubs by name or alias prefix
    Search {
        /// Directory of page-<n>.json files, or a single JSON file
        #[arg(short, long)]
        pages: PathBuf,

        /// Query words; inline school:, category: and is:followed filters are honoured
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        #[command(flatten)]
        facets: FacetArgs,

        /// Only show clubs listed in --followed
        #[arg(long)]
        follow_only: bool,

        /// File of followed club ids (JSON array or one id per line)
        #[arg(long)]
        followed: Option<PathBuf>,

        /// Maximum number of results to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show index statistics
    Stats {
        /// Directory of page-<n>.json files, or a single JSON file
        #[arg(short, long)]
        pages: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// List selected school and category values and the ones still available
    Facets {
        /// Directory of page-<n>.json files, or a single JSON file
        #[arg(short, long)]
        pages: PathBuf,

        #[command(flatten)]
        facets: FacetArgs,

        /// Print facet values as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Facet selection on top of the configured defaults
#[derive(Args)]
struct FacetArgs {
    /// Restrict to a school (repeatable, replaces the configured defaults)
    #[arg(short, long)]
    school: Vec<String>,

    /// Ignore the configured default schools
    #[arg(long, conflicts_with = "school")]
    all_schools: bool,

    /// Restrict to a category or affiliation (repeatable)
    #[arg(short, long)]
    category: Vec<String>,
}

impl FacetArgs {
    fn apply(self, mut selection: FilterSelection) -> FilterSelection {
        if self.all_schools {
            selection.schools.clear();
        } else if !self.school.is_empty() {
            selection.schools = self.school.into_iter().collect();
        }
        selection.categories.extend(self.category);
        selection
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let color = color_choice(cli.color, &config);

    match cli.command {
        Commands::Search {
            pages,
            query,
            facets,
            follow_only,
            followed,
            limit,
            json,
        } => {
            let mut orchestrator = SearchOrchestrator::from_config(&config);
            let mut selection = facets.apply(orchestrator.selection().clone());
            selection.follow_only = follow_only;
            selection.merge_parsed(parse_query(&query.join(" ")));
            debug!(target: "clubfind::cli", ?selection, "Search selection");
            orchestrator.set_selection(selection);

            if let Some(path) = followed {
                orchestrator.set_followed(read_followed(&path)?);
            }
            load_pages(&mut orchestrator, &pages)?;

            let results = orchestrator.results();
            if json {
                output::print_json(&mut io::stdout().lock(), &results[..])?;
            } else {
                let mut out = StandardStream::stdout(color);
                output::print_results(&mut out, &results, limit.unwrap_or(config.result_limit))?;
            }
        }
        Commands::Stats { pages, json } => {
            let mut orchestrator = SearchOrchestrator::new();
            load_pages(&mut orchestrator, &pages)?;

            let stats = orchestrator.index().stats();
            if json {
                output::print_json(&mut io::stdout().lock(), &stats)?;
            } else {
                print!("{}", stats);
                println!("Pages loaded:     {}", orchestrator.last_page());
            }
        }
        Commands::Facets { pages, facets, json } => {
            let mut orchestrator = SearchOrchestrator::from_config(&config);
            let selection = facets.apply(orchestrator.selection().clone());
            orchestrator.set_selection(selection);
            load_pages(&mut orchestrator, &pages)?;

            let report = FacetReport::new(orchestrator.facets(), orchestrator.selection());
            if json {
                output::print_json(&mut io::stdout().lock(), &report)?;
            } else {
                let mut out = StandardStream::stdout(color);
                output::print_facets(&mut out, &report)?;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn color_choice(arg: Option<ColorArg>, config: &AppConfig) -> ColorChoice {
    match arg {
        Some(ColorArg::Always) => ColorChoice::Always,
        Some(ColorArg::Never) => ColorChoice::Never,
        None if !config.color => ColorChoice::Never,
        Some(ColorArg::Auto) | None => {
            if io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    }
}

/// Load every page from `path` until the source reports the end.
///
/// A failure on the first page is fatal; later failures keep what was
/// already loaded and are reported on stderr.
fn load_pages(orchestrator: &mut SearchOrchestrator, path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Page source not found: {}", path.display());
    }

    let mut source = JsonPageSource::new(path);
    let progress = LoadProgress::start(io::stderr().is_terminal());

    while let Some(outcome) = orchestrator.load_more(&mut source) {
        match outcome {
            FetchOutcome::Applied { page, total, .. } => progress.page_loaded(page, total),
            FetchOutcome::Failed(e) => {
                progress.finish();
                if orchestrator.clubs().is_empty() {
                    return Err(e).context("Failed to load clubs");
                }
                warn!(target: "clubfind::cli", page = e.page(), "Stopped loading after failure");
                eprintln!("Warning: {} (showing {} clubs loaded so far)", e, orchestrator.clubs().len());
                return Ok(());
            }
            FetchOutcome::EndOfPages { .. }
            | FetchOutcome::Superseded { .. }
            | FetchOutcome::Deferred { .. } => break,
        }
    }

    progress.finish();
    Ok(())
}

/// Read followed club ids from a JSON array or a plain list, one id per line
fn read_followed(path: &Path) -> Result<Vec<ClubId>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read followed clubs from {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse followed clubs in {}", path.display()));
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
