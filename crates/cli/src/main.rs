use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use features::{
    FRANCHISE_CHOICES, FeatureEncoder, FeatureSchema, Genre, MovieAttributes, NO_FRANCHISE, YesNo,
};
use rand::Rng;
use server::{
    ArtifactPaths, FailureReason, PredictionFailure, PredictionOutcome, PredictionService, render,
};
use server::config::{DEFAULT_MODEL_FILE, DEFAULT_PREPROCESSOR_FILE, DEFAULT_TARGET_SCALER_FILE};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

/// Box Office - Movie Revenue Predictor
#[derive(Parser)]
#[command(name = "box-office")]
#[command(about = "Predict box office revenue from movie attributes", long_about = None)]
struct Cli {
    /// Directory holding the model artifacts
    #[arg(short = 'd', long, default_value = ".", global = true)]
    artifacts_dir: PathBuf,

    /// Model file, relative to the artifacts directory
    #[arg(long, default_value = DEFAULT_MODEL_FILE, global = true)]
    model: PathBuf,

    /// Preprocessor file, relative to the artifacts directory
    #[arg(long, default_value = DEFAULT_PREPROCESSOR_FILE, global = true)]
    preprocessor: PathBuf,

    /// Optional target scaler file; skipped when it does not exist
    #[arg(long, default_value = DEFAULT_TARGET_SCALER_FILE, global = true)]
    target_scaler: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            dir: self.artifacts_dir.clone(),
            model: self.model.clone(),
            preprocessor: self.preprocessor.clone(),
            target_scaler: self.target_scaler.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Predict revenue for one movie
    Predict(MovieArgs),

    /// Print the encoded feature record as JSON
    Encode(MovieArgs),

    /// Show the feature schema the artifacts must match
    Schema,

    /// Read one JSON request per line from stdin and predict each
    Interactive {
        /// Print outcomes as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark to test prediction latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

/// The prediction form. Bounds match the form widgets.
#[derive(Args, Debug, Clone)]
struct MovieArgs {
    /// Budget in dollars
    #[arg(long, default_value_t = 50_000_000, value_parser = clap::value_parser!(u64).range(1_000_000..=1_000_000_000))]
    budget: u64,

    /// Running time in minutes
    #[arg(long, default_value_t = 150, value_parser = clap::value_parser!(u16).range(60..=400))]
    running_time: u16,

    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=12))]
    release_month: u8,

    #[arg(long, default_value_t = 2025, value_parser = clap::value_parser!(u16).range(1980..=2030))]
    release_year: u16,

    /// Director popularity ($ average revenue)
    #[arg(long, default_value_t = 50_000_000, value_parser = clap::value_parser!(u64).range(0..=1_000_000_000))]
    director_popularity: u64,

    /// Lead actor popularity ($ average revenue)
    #[arg(long, default_value_t = 50_000_000, value_parser = clap::value_parser!(u64).range(0..=1_000_000_000))]
    lead_actor_popularity: u64,

    /// Yes or No
    #[arg(long, default_value_t = YesNo::Yes)]
    holiday_season: YesNo,

    /// Yes or No
    #[arg(long, default_value_t = YesNo::Yes)]
    has_sequel: YesNo,

    #[arg(long, default_value = NO_FRANCHISE, value_parser = FRANCHISE_CHOICES)]
    franchise: String,

    /// Genres (repeat the flag or separate with commas)
    #[arg(long = "genre", value_name = "GENRE", value_delimiter = ',')]
    genres: Vec<Genre>,
}

impl From<MovieArgs> for MovieAttributes {
    fn from(args: MovieArgs) -> Self {
        Self {
            budget: args.budget,
            running_time: args.running_time,
            release_month: args.release_month,
            release_year: args.release_year,
            director_popularity: args.director_popularity,
            lead_actor_popularity: args.lead_actor_popularity,
            holiday_season: args.holiday_season,
            has_sequel: args.has_sequel,
            franchise: args.franchise,
            genres: args.genres,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = cli.artifact_paths();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Predict(movie) => handle_predict(&paths, movie.into()).await?,
        Commands::Encode(movie) => handle_encode(movie.into())?,
        Commands::Schema => handle_schema(),
        Commands::Interactive { json } => handle_interactive(&paths, json).await?,
        Commands::Benchmark { requests } => handle_benchmark(&paths, requests).await?,
    }

    Ok(())
}

/// Load artifacts once for the lifetime of the command
async fn load_service(paths: &ArtifactPaths) -> Result<PredictionService> {
    eprintln!("Loading artifacts from {}...", paths.dir.display());
    let start = Instant::now();
    let service = PredictionService::load(paths)
        .await
        .context("Failed to load prediction artifacts")?;
    eprintln!("{} Loaded artifacts in {:?}", "✓".green(), start.elapsed());
    Ok(service)
}

/// Handle the 'predict' command
async fn handle_predict(paths: &ArtifactPaths, attrs: MovieAttributes) -> Result<()> {
    let service = load_service(paths).await?;
    let outcome = service.submit(&attrs);
    print_outcome(&outcome);
    Ok(())
}

/// Handle the 'encode' command
fn handle_encode(attrs: MovieAttributes) -> Result<()> {
    attrs.validate()?;
    let record = FeatureEncoder::new().encode(&attrs);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Handle the 'schema' command
fn handle_schema() {
    let schema = FeatureSchema::CURRENT;
    println!(
        "{}",
        format!("Feature schema v{} ({} fields)", schema.version(), schema.len())
            .bold()
            .blue()
    );
    for (i, field) in schema.fields().iter().enumerate() {
        println!("{:>3}. {:<24} {:?}", i, field.name, field.kind);
    }
}

/// Handle the 'interactive' command
///
/// Each line is one form submission. Failures are printed and the loop keeps
/// going, like re-submitting the form after fixing an input.
async fn handle_interactive(paths: &ArtifactPaths, json: bool) -> Result<()> {
    let service = load_service(paths).await?;
    eprintln!(
        "Enter one JSON object per line, e.g. {}. Type 'quit' to exit.",
        r#"{"budget": 80000000, "genres": ["Action", "Sci-Fi"]}"#.cyan()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let processed = run_interactive(&service, stdin, std::io::stdout(), json).await?;
    info!("Interactive session ended after {} request(s)", processed);
    Ok(())
}

/// Serve JSON-line requests from `input` until `quit`, `exit` or EOF.
///
/// Every non-blank line yields exactly one outcome line on `output`; a
/// line that is not valid JSON becomes an `InvalidInput` failure.
/// Returns the number of requests answered.
async fn run_interactive<R, W>(
    service: &PredictionService,
    input: R,
    mut output: W,
    json: bool,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut processed = 0;
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        let outcome = match serde_json::from_str::<MovieAttributes>(line) {
            Ok(attrs) => service.submit(&attrs),
            Err(e) => PredictionOutcome::Failure(PredictionFailure {
                reason: FailureReason::InvalidInput,
                message: format!("Invalid request: {}", e),
            }),
        };

        if json {
            writeln!(output, "{}", serde_json::to_string(&outcome)?)?;
        } else {
            writeln!(output, "{}", outcome_line(&outcome))?;
        }
        output.flush()?;
        processed += 1;
    }
    Ok(processed)
}

/// Handle the 'benchmark' command
async fn handle_benchmark(paths: &ArtifactPaths, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }
    let service = load_service(paths).await?;

    // Generate random, valid form submissions up front
    let mut rng = rand::rng();
    let inputs: Vec<MovieAttributes> = (0..requests)
        .map(|_| random_attributes(&mut rng))
        .collect();

    // Run them one at a time, like consecutive presses of the predict button
    let wall_clock = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut failures = 0usize;
    for attrs in &inputs {
        let start = Instant::now();
        let outcome = service.predict(attrs);
        timings.push(start.elapsed());
        if !outcome.is_success() {
            failures += 1;
        }
    }
    let total_time = wall_clock.elapsed();

    // Calculate and display statistics
    let stats = LatencyStats::from_timings(timings);
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} failed)", requests, failures);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", stats.mean);
    println!("P50 latency: {:?}", stats.p50);
    println!("P95 latency: {:?}", stats.p95);
    println!("P99 latency: {:?}", stats.p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Latency summary over a benchmark run
#[derive(Debug, Clone, Copy, PartialEq)]
struct LatencyStats {
    mean: Duration,
    p50: Duration,
    p95: Duration,
    p99: Duration,
}

impl LatencyStats {
    /// `timings` must not be empty
    fn from_timings(mut timings: Vec<Duration>) -> Self {
        let mean = timings.iter().sum::<Duration>().div_f64(timings.len() as f64);
        timings.sort();
        let percentile = |p: f64| {
            let index = ((timings.len() as f64 * p) as usize).min(timings.len() - 1);
            timings[index]
        };
        Self {
            mean,
            p50: percentile(0.50),
            p95: percentile(0.95),
            p99: percentile(0.99),
        }
    }
}

/// A random submission that satisfies every form bound
fn random_attributes(rng: &mut impl Rng) -> MovieAttributes {
    let yes_no = |yes: bool| if yes { YesNo::Yes } else { YesNo::No };

    MovieAttributes {
        budget: rng.random_range(1_000_000..=300_000_000),
        running_time: rng.random_range(80..=200),
        release_month: rng.random_range(1..=12),
        release_year: rng.random_range(1980..=2030),
        director_popularity: rng.random_range(0..=1_000_000_000),
        lead_actor_popularity: rng.random_range(0..=1_000_000_000),
        holiday_season: yes_no(rng.random_bool(0.3)),
        has_sequel: yes_no(rng.random_bool(0.2)),
        franchise: FRANCHISE_CHOICES[rng.random_range(0..FRANCHISE_CHOICES.len())].to_string(),
        genres: Genre::ALL
            .into_iter()
            .filter(|_| rng.random_bool(0.15))
            .collect(),
    }
}

/// The rendered outcome, colored by success
fn outcome_line(outcome: &PredictionOutcome) -> ColoredString {
    let line = render(outcome);
    if outcome.is_success() {
        line.green().bold()
    } else {
        line.red()
    }
}

/// Helper function to print an outcome the way the form shows it
fn print_outcome(outcome: &PredictionOutcome) {
    println!("{}", outcome_line(outcome));
}
