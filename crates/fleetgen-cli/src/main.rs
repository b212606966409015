mod registry;

use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use fleetgen_core::{
    Error as CoreError, SeedConfig, parse_reference_time, redact_connection_string,
    validate_config,
};
use fleetgen_generate::{GenerateOptions, GenerationEngine, GenerationError, GenerationResult};
use fleetgen_store::{DatasetSink, LoadOptions, PostgresSink, StoreError};
use registry::{RunContext, RunPaths, init_run_logging, start_run, write_load_report};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
}

#[derive(Parser, Debug)]
#[command(name = "fleetgen", version, about = "Synthetic fleet-logistics data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the dataset and write one CSV per table.
    Generate(GenerateArgs),
    /// Generate the dataset and insert it into PostgreSQL.
    Load(LoadArgs),
}

/// Seed parameters shared by every subcommand. Flags override the TOML file.
#[derive(Args, Debug, Default)]
struct SeedArgs {
    /// TOML seed configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    /// Instant treated as "now", as `YYYY-MM-DD HH:MM:SS`.
    #[arg(long, value_parser = parse_reference_time)]
    reference_time: Option<NaiveDateTime>,
    /// Ordered city list, comma separated.
    #[arg(long, value_delimiter = ',')]
    cities: Vec<String>,
    #[arg(long, conflicts_with = "no_hub")]
    hub_city: Option<String>,
    /// Give no city the extra hub route variant.
    #[arg(long, default_value_t = false)]
    no_hub: bool,
    /// Days of history the trips are spread over.
    #[arg(long)]
    window_days: Option<u32>,
    /// Faker locale for names and addresses.
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    vehicles: Option<usize>,
    #[arg(long)]
    drivers: Option<usize>,
    #[arg(long)]
    routes: Option<usize>,
    #[arg(long)]
    trips: Option<usize>,
    #[arg(long)]
    deliveries: Option<usize>,
    #[arg(long)]
    maintenance: Option<usize>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    seed: SeedArgs,
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[command(flatten)]
    seed: SeedArgs,
    /// Database connection string.
    #[arg(long, value_name = "CONNECTION_STRING")]
    conn: String,
    /// Rows per INSERT batch (1-5000).
    #[arg(long, default_value_t = fleetgen_store::DEFAULT_BATCH_SIZE)]
    batch_size: usize,
    /// Create the tables before loading.
    #[arg(long, default_value_t = false)]
    create_schema: bool,
    /// Truncate every table before loading.
    #[arg(long, default_value_t = false)]
    truncate: bool,
    /// Skip writing CSV files to the run directory.
    #[arg(long, default_value_t = false)]
    skip_csv: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Load(args) => run_load(args).await,
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let config = args.seed.resolve_config()?;
    let ctx = run_context("generate", args.seed.run_dir, config, None, None);
    let paths = start_logged_run(&ctx)?;

    let timer = Instant::now();
    let result = generate(&ctx, &paths, true)?;

    tracing::info!(
        event = "run_finished",
        status = "success",
        run_dir = %result.run_dir.display(),
        rows_total = result.report.rows_total,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

async fn run_load(args: LoadArgs) -> Result<(), CliError> {
    let LoadArgs {
        seed,
        conn,
        batch_size,
        create_schema,
        truncate,
        skip_csv,
    } = args;

    let engine = detect_engine(&conn)?;
    let options = LoadOptions {
        batch_size,
        create_schema,
        truncate,
    };
    options.validate()?;

    let config = seed.resolve_config()?;
    let connection = redact_connection_string(&conn);
    let ctx = run_context("load", seed.run_dir, config, Some(connection), Some(options.clone()));
    let paths = start_logged_run(&ctx)?;
    tracing::info!(event = "engine_detected", engine = %engine);

    let timer = Instant::now();
    let result = generate(&ctx, &paths, !skip_csv)?;

    let pool = fleetgen_store::connect(&conn).await?;
    let sink = PostgresSink::new(pool);
    let report = sink.load(&result.dataset, &options).await?;
    write_load_report(&paths, &report)?;
    tracing::info!(event = "load_report_written", path = %paths.load_report_path.display());

    if !report.validations_passed() {
        tracing::warn!(event = "validations_failed", checks = ?report.integrity);
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        rows_inserted = report.rows_total,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

fn run_context(
    command: &str,
    run_dir: PathBuf,
    config: SeedConfig,
    connection: Option<fleetgen_core::RedactedConnection>,
    load: Option<LoadOptions>,
) -> RunContext {
    RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        run_dir,
        config,
        connection,
        load,
    }
}

fn start_logged_run(ctx: &RunContext) -> Result<RunPaths, CliError> {
    let paths = start_run(ctx)?;
    init_run_logging(&paths.logs_path)?;
    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        command = %ctx.command,
        seed = ctx.config.seed
    );
    Ok(paths)
}

fn generate(
    ctx: &RunContext,
    paths: &RunPaths,
    write_csv: bool,
) -> Result<GenerationResult, CliError> {
    let options = GenerateOptions {
        out_dir: paths.root.clone(),
        run_id: Some(ctx.run_id.clone()),
        write_csv,
    };
    let result = GenerationEngine::new(options).run(&ctx.config)?;
    tracing::info!(
        event = "generation_report_written",
        path = %result.run_dir.join("generation_report.json").display()
    );
    Ok(result)
}

impl SeedArgs {
    /// Load the TOML file when given, apply flag overrides and validate.
    fn resolve_config(&self) -> Result<SeedConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SeedConfig::from_toml_path(path)?,
            None => SeedConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(reference_time) = self.reference_time {
            config.reference_time = Some(reference_time);
        }
        if !self.cities.is_empty() {
            config.cities = self.cities.iter().map(|city| city.trim().to_string()).collect();
            // A hub left over from the file or defaults only applies if it is still listed.
            if config
                .hub_city
                .as_ref()
                .is_some_and(|hub| !config.cities.contains(hub))
            {
                config.hub_city = None;
            }
        }
        if self.no_hub {
            config.hub_city = None;
        } else if let Some(hub_city) = &self.hub_city {
            config.hub_city = Some(hub_city.clone());
        }
        if let Some(window_days) = self.window_days {
            config.window_days = window_days;
        }
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }

        let counts = &mut config.counts;
        for (slot, value) in [
            (&mut counts.vehicles, self.vehicles),
            (&mut counts.drivers, self.drivers),
            (&mut counts.routes, self.routes),
            (&mut counts.trips, self.trips),
            (&mut counts.deliveries, self.deliveries),
            (&mut counts.maintenance, self.maintenance),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn detect_engine(conn: &str) -> Result<&'static str, CliError> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(
            redact_connection_string(conn).redacted,
        ))
    }
}
