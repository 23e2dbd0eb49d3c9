use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use journey_core::model::Route;
use services::{
    Clock, JourneyService, JourneyView, SensorFeed, SensorSample, StepSensor,
    report_sensor_missing,
};
use storage::repository::Storage;
use tokio::io::AsyncBufReadExt;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Walk,
    Status,
    Route,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "walk" => Some(Self::Walk),
            "status" => Some(Self::Status),
            "route" => Some(Self::Route),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    json: bool,
    no_sensor: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("JOURNEY_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://journey.sqlite3".into(), normalize_sqlite_url);
        let mut json = false;
        let mut no_sensor = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--json" => json = true,
                "--no-sensor" => no_sensor = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            json,
            no_sensor,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- walk   [--db <sqlite_url>] [--no-sensor]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>] [--json]");
    eprintln!("  cargo run -p app -- route  [--db <sqlite_url>] [--json]");
    eprintln!();
    eprintln!("walk reads cumulative step-counter values from stdin, one per line,");
    eprintln!("and advances the journey until the input ends.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:journey.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  JOURNEY_DB_URL");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Desktop stand-in for the device step counter: cumulative readings arrive
/// as integer lines on stdin. Non-numeric lines are skipped.
struct StdinStepSensor {
    lines: tokio::io::Lines<tokio::io::BufReader<tokio::io::Stdin>>,
}

impl StdinStepSensor {
    fn open() -> Self {
        Self {
            lines: tokio::io::BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl StepSensor for StdinStepSensor {
    async fn sample(&mut self) -> Option<SensorSample> {
        loop {
            let line = self.lines.next_line().await.ok().flatten()?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse::<u32>() {
                Ok(cumulative) => return Some(SensorSample::step_counter(cumulative)),
                Err(_) => {
                    tracing::debug!(line = trimmed, "ignoring non-numeric sensor line");
                }
            }
        }
    }
}

fn print_view(view: &JourneyView) {
    println!("steps this session: {}", view.session_steps);
    println!("total steps:        {}", view.total_steps);
    println!("current location:   {}", view.location_name);
    println!("                    {}", view.location_description);
    println!("journey progress:   {}%", view.percent);
}

fn print_next(journey: &JourneyService) {
    match journey.next_waypoint() {
        Some(next) => println!(
            "next waypoint:      {} at {} steps",
            next.name(),
            next.required_steps()
        ),
        None => println!("next waypoint:      none - the quest is complete"),
    }
}

async fn open_journey(db_url: &str) -> Result<Arc<JourneyService>, Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(db_url)?;
    let storage = Storage::sqlite(db_url).await?;
    let journey = Arc::new(JourneyService::new(
        Clock::default_clock(),
        Route::fellowship(),
        storage.progress,
    ));
    journey.load().await?;
    Ok(journey)
}

async fn run_walk(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let journey = open_journey(&args.db_url).await?;

    let resumed = journey.view(0);
    println!("resuming at {} ({}%)", resumed.location_name, resumed.percent);
    print_next(&journey);

    if args.no_sensor {
        report_sensor_missing();
        print_view(&resumed);
        return Ok(());
    }

    println!("reading cumulative step counts from stdin (one per line, Ctrl-D to finish)");
    let mut sensor = StdinStepSensor::open();
    let mut feed = SensorFeed::new(Arc::clone(&journey));
    while let Some(sample) = sensor.sample().await {
        if let Some(view) = feed.apply(sample).await? {
            println!();
            print_view(&view);
            print_next(&journey);
        }
    }

    println!();
    println!("journey saved.");
    Ok(())
}

async fn run_status(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let journey = open_journey(&args.db_url).await?;
    let view = journey.view(0);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
        print_next(&journey);
    }
    Ok(())
}

async fn run_route(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let journey = open_journey(&args.db_url).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(journey.waypoints())?);
        return Ok(());
    }

    let current = journey.snapshot();
    for waypoint in journey.waypoints() {
        let marker = if waypoint.name() == current.waypoint().name() {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:>7} steps  {}",
            waypoint.required_steps(),
            waypoint.name()
        );
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: walking when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Walk,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Walk,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Walk => run_walk(parsed).await,
        Command::Status => run_status(parsed).await,
        Command::Route => run_route(parsed).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
