use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sonarpool_core::config::AppConfig;
use sonarpool_core::{init_logging, Navigator, Pool};
use sonarpool_data::Steps;
use sonarpool_io::{load_heightmap, to_json, to_json_pretty, write_json_file, TrajectoryRecord};
use sonarpool_lib::app::render::render_layer;
use sonarpool_lib::app::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "headless")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Terrain heightmap (.json, .txt, .csv or an image)
    #[arg(long)]
    heightmap: PathBuf,

    /// Seed overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Move budget per navigator: a positive integer or "all"
    #[arg(long)]
    steps: Option<Steps>,

    /// Write trajectory records to this JSON file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Headless,
    Replay,
}

fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::info!(path = ?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {:?}", path))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {:?}", path))
}

fn run_headless(
    pool: &Arc<Pool>,
    config: &AppConfig,
    steps: Steps,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<TrajectoryRecord>> {
    let source = pool.source().map(|s| s.coord);
    let mut records = Vec::with_capacity(config.playback.navigators);
    for _ in 0..config.playback.navigators {
        let mut navigator = Navigator::spawn(Arc::clone(pool), config.navigator.placement(), rng)?;
        let trajectory = navigator.advance(steps)?;
        let arrived = navigator.has_arrived()?;
        records.push(TrajectoryRecord::new(navigator.id(), source, trajectory, arrived));
    }
    Ok(records)
}

async fn run_replay(
    pool: &Arc<Pool>,
    config: &AppConfig,
    steps: Steps,
    rng: ChaCha8Rng,
) -> Result<Vec<TrajectoryRecord>> {
    let placement = config.navigator.placement();
    let mut session = Session::new(Arc::clone(pool), placement, steps, &config.playback, rng)?;
    let mut records = Vec::new();
    let mut spawned = 1;

    if let Some(start) = session.position() {
        print!("{}", render_layer(pool, start.z, &[start])?);
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(10));
    loop {
        ticker.tick().await;
        let now = Instant::now();

        if let Some(position) = session.next_position(now) {
            println!("{} -> {}", session.navigator().id(), position);
            continue;
        }
        if !session.is_finished() {
            continue;
        }
        if spawned >= config.playback.navigators {
            break;
        }
        if let Some(finished) = session.respawn(now, placement)? {
            records.push(finished);
            spawned += 1;
        }
    }

    records.push(session.record()?);
    Ok(records)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    tracing::info!(fingerprint = %config.fingerprint(), "Configuration loaded");

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let field = load_heightmap(&args.heightmap)?;
    let mut pool = match config.pool.height {
        Some(height) => Pool::new(&field, height)?,
        None => Pool::with_headroom(&field)?,
    };
    let report = pool.place_source(
        config.source.placement(),
        config.source.intensity,
        config.source.mode,
        &mut rng,
    )?;
    tracing::info!(
        source = %report.source,
        cells = report.cells_computed,
        forced = report.forced_closures,
        elapsed_ms = report.elapsed_ms,
        "Propagation finished"
    );
    let pool = Arc::new(pool);
    let steps = args.steps.unwrap_or_else(|| config.navigator.steps());

    let records = match args.mode {
        Mode::Headless => run_headless(&pool, &config, steps, &mut rng)?,
        Mode::Replay => run_replay(&pool, &config, steps, rng).await?,
    };

    match &args.output {
        Some(path) => {
            write_json_file(&records, path)?;
            tracing::info!(path = ?path, runs = records.len(), "Trajectories written");
        }
        None => println!("{}", to_json_pretty(&records)?),
    }

    tracing::debug!(summary = %to_json(&pool.summary())?, "Pool summary");
    let metrics = pool.metrics();
    tracing::info!(
        vertices = metrics.path_vertices(),
        forced = metrics.forced_closures(),
        memo_hits = metrics.memo_hits(),
        steps = metrics.navigator_steps(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        "Run complete"
    );
    Ok(())
}
