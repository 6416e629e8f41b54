use adaptive_trend::calibration::ComparabilityRunner;
use adaptive_trend::crawl::{observations_from_crawl, CrawlDocument};
use adaptive_trend::history::HistorySnapshot;
use adaptive_trend::{
    format_float, format_number, BatchProcessor, EngineConfig, Externals, MemoryHistory,
    Observation, RawMetrics, ScoreRecord, TrendScorer,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adaptive-trend", about = "Cross-platform trend scoring engine")]
struct Cli {
    /// Engine config (TOML). Defaults to TREND_CONFIG_PATH or config/engine.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Velocity history snapshot, loaded before and saved after scoring.
    #[arg(long, global = true)]
    history: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score one keyword on one platform.
    Score(ScoreArgs),
    /// Score a JSON array of observations, grouped by platform.
    Batch(BatchArgs),
    /// Rank a JSON array of observations across platforms.
    Top(TopArgs),
    /// Score and rank a crawler output document.
    Crawl(CrawlArgs),
    /// Report score spread across platforms for the built-in sample tiers.
    Comparability(ComparabilityArgs),
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[arg(long)]
    keyword: String,
    #[arg(long)]
    platform: String,
    #[arg(long)]
    views: Option<f64>,
    #[arg(long)]
    likes: Option<f64>,
    #[arg(long)]
    comments: Option<f64>,
    #[arg(long)]
    shares: Option<f64>,
    #[arg(long)]
    saves: Option<f64>,
    #[arg(long)]
    upvotes: Option<f64>,
    #[arg(long)]
    downvotes: Option<f64>,
    #[arg(long)]
    vote_score: Option<f64>,
    #[arg(long, default_value_t = 0)]
    posts: u64,
    /// Previous-period counters as a JSON object.
    #[arg(long)]
    previous: Option<String>,
    #[arg(long)]
    feasibility: Option<u8>,
    #[arg(long)]
    monetization: Option<f64>,
    #[arg(long)]
    ip_risk: Option<f64>,
    #[arg(long)]
    competition_risk: Option<f64>,
    #[arg(long)]
    category: Option<String>,
    /// Leave the velocity history untouched.
    #[arg(long)]
    no_history_update: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct BatchArgs {
    /// JSON file with an array of observations. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct TopArgs {
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    #[arg(long)]
    min_score: Option<u8>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct CrawlArgs {
    #[arg(long)]
    current: PathBuf,
    /// Crawl document of the previous period.
    #[arg(long)]
    previous: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    #[arg(long)]
    min_score: Option<u8>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct ComparabilityArgs {
    #[arg(long)]
    json: bool,
}

/// Scorer plus the in-memory history it writes to, so the CLI can persist it.
struct Engine {
    config: EngineConfig,
    history: Arc<MemoryHistory>,
    snapshot: Option<HistorySnapshot>,
    scorer: TrendScorer,
}

impl Engine {
    async fn open(config: EngineConfig, history_path: Option<PathBuf>) -> Result<Self, String> {
        let history = Arc::new(MemoryHistory::from_config(&config.history));
        let snapshot = history_path
            .or_else(|| config.history.snapshot_path.clone())
            .map(HistorySnapshot::new);

        if let Some(snapshot) = snapshot.as_ref() {
            let entries = snapshot
                .load()
                .await
                .map_err(|err| format!("failed to load history snapshot: {}", err))?;
            info!(path = %snapshot.path().display(), entries = entries.len(), "loaded velocity history");
            history.seed(entries);
        }

        let scorer = TrendScorer::from_config(&config, history.clone());
        Ok(Self {
            config,
            history,
            snapshot,
            scorer,
        })
    }

    fn processor(&self) -> Result<BatchProcessor, String> {
        BatchProcessor::new(self.scorer.clone(), &self.config.batch).map_err(|err| err.to_string())
    }

    async fn persist(&self) -> Result<(), String> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(());
        };
        let entries = self.history.entries();
        let count = entries.len();
        snapshot
            .save(entries)
            .await
            .map_err(|err| format!("failed to save history snapshot: {}", err))?;
        info!(path = %snapshot.path().display(), entries = count, "saved velocity history");
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = EngineConfig::load(cli.config).map_err(|err| err.to_string())?;
    if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
        info!(path = %path.display(), "loaded engine config");
    }

    if let Command::Comparability(args) = &cli.command {
        return run_comparability(&config, args);
    }

    let engine = Engine::open(config, cli.history).await?;
    match cli.command {
        Command::Score(args) => run_score(&engine, args)?,
        Command::Batch(args) => run_batch(&engine, args)?,
        Command::Top(args) => run_top(&engine, args)?,
        Command::Crawl(args) => run_crawl(&engine, args).await?,
        Command::Comparability(_) => {}
    }
    engine.persist().await
}

fn run_score(engine: &Engine, args: ScoreArgs) -> Result<(), String> {
    let stats = RawMetrics {
        views: args.views,
        likes: args.likes,
        comments: args.comments,
        shares: args.shares,
        saves: args.saves,
        upvotes: args.upvotes,
        downvotes: args.downvotes,
        score: args.vote_score,
    };
    let externals = Externals {
        feasibility: args.feasibility,
        monetization: args.monetization,
        ip_risk: args.ip_risk,
        competition_risk: args.competition_risk,
        category: args.category,
    };

    let mut observation =
        Observation::new(args.keyword, args.platform, stats, args.posts).with_externals(externals);
    if let Some(previous) = args.previous {
        let previous: RawMetrics = serde_json::from_str(&previous)
            .map_err(|err| format!("invalid --previous JSON: {}", err))?;
        observation = observation.with_previous(previous);
    }
    if args.no_history_update {
        observation = observation.without_history_update();
    }

    let record = engine
        .scorer
        .score(&observation)
        .map_err(|err| err.to_string())?;

    if args.json {
        return print_json(&record);
    }
    print_record(&record);
    Ok(())
}

fn run_batch(engine: &Engine, args: BatchArgs) -> Result<(), String> {
    let observations = read_observations(args.input.as_deref())?;
    let report = engine.processor()?.process_batch(&observations);

    if args.json {
        return print_json(&report);
    }

    for (platform, records) in &report.records {
        println!("{} ({} records)", platform, records.len());
        for record in records {
            print_summary(record);
        }
    }
    for rejected in &report.rejected {
        println!(
            "rejected #{} {} on {}: {}",
            rejected.index, rejected.keyword, rejected.platform, rejected.reason
        );
    }
    Ok(())
}

fn run_top(engine: &Engine, args: TopArgs) -> Result<(), String> {
    let observations = read_observations(args.input.as_deref())?;
    let top_n = args.top_n.unwrap_or(engine.config.batch.top_n);
    let min_score = args.min_score.unwrap_or(engine.config.batch.min_score);
    let ranked = engine
        .processor()?
        .top_trends(&observations, top_n, min_score);
    print_ranked(&ranked, args.json)
}

async fn run_crawl(engine: &Engine, args: CrawlArgs) -> Result<(), String> {
    let current = CrawlDocument::load(&args.current)
        .await
        .map_err(|err| format!("failed to read {}: {}", args.current.display(), err))?;
    let previous = match args.previous.as_ref() {
        Some(path) => Some(
            CrawlDocument::load(path)
                .await
                .map_err(|err| format!("failed to read {}: {}", path.display(), err))?,
        ),
        None => None,
    };

    let observations = observations_from_crawl(&current, previous.as_ref());
    info!(observations = observations.len(), "ingested crawl document");

    let top_n = args.top_n.unwrap_or(engine.config.batch.top_n);
    let min_score = args.min_score.unwrap_or(engine.config.batch.min_score);
    let ranked = engine
        .processor()?
        .top_trends(&observations, top_n, min_score);
    print_ranked(&ranked, args.json)
}

fn run_comparability(config: &EngineConfig, args: &ComparabilityArgs) -> Result<(), String> {
    let scorer = TrendScorer::with_memory_history(config);
    let report = ComparabilityRunner::builtin().compute_metrics(&scorer);

    if args.json {
        return print_json(&report);
    }

    for (tier, summary) in &report.tiers {
        println!(
            "{:?}: {} samples | min {} | max {} | mean {} | spread {} | view-based spread {}",
            tier,
            summary.samples,
            summary.min,
            summary.max,
            format_float(summary.mean, 1),
            summary.spread,
            summary.view_based_spread
        );
    }
    println!(
        "Tier ordering accuracy: {}",
        format_float(report.tier_ordering_accuracy, 2)
    );
    println!(
        "Viral band respected: {}",
        if report.within_viral_band() { "yes" } else { "no" }
    );
    Ok(())
}

fn print_ranked(records: &[ScoreRecord], json: bool) -> Result<(), String> {
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        println!("No trends above the minimum score.");
    }
    for (rank, record) in records.iter().enumerate() {
        print!("{:>2}. ", rank + 1);
        print_summary(record);
    }
    Ok(())
}

fn print_record(record: &ScoreRecord) {
    println!(
        "Trend score: {} ({} | {})",
        record.trend_score, record.lifecycle, record.priority
    );
    println!(
        "Dimensions: H {} | V {} | D {} | F {} | M {} | R {}",
        format_float(record.hotness, 3),
        format_float(record.velocity, 3),
        format_float(record.density, 3),
        format_float(record.feasibility, 3),
        format_float(record.monetization, 3),
        format_float(record.risk, 3)
    );
    println!(
        "Metrics: views {} | likes {} | comments {} | shares {} | saves {} | posts {}",
        format_number(record.raw_metrics.views),
        format_number(record.raw_metrics.likes),
        format_number(record.raw_metrics.comments),
        format_number(record.raw_metrics.shares),
        format_number(record.raw_metrics.saves),
        record.raw_metrics.posts
    );
    println!(
        "Category: {} | agent ready: {}",
        record.category,
        if record.agent_ready { "yes" } else { "no" }
    );
}

fn print_summary(record: &ScoreRecord) {
    println!(
        "{:>3} {} [{}] {} {}",
        record.trend_score, record.keyword, record.platform_type, record.lifecycle, record.priority
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let payload = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize output: {}", err))?;
    println!("{}", payload);
    Ok(())
}

fn read_observations(path: Option<&Path>) -> Result<Vec<Observation>, String> {
    let data = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {}", path.display(), err))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed reading stdin: {}", err))?;
            buffer
        }
    };
    if data.trim().is_empty() {
        return Err("missing observations: pass --input or pipe stdin".to_string());
    }
    serde_json::from_str(&data).map_err(|err| format!("invalid observations JSON: {}", err))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
