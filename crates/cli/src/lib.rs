use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use mapping_detector::{CallSiteDetector, DetectorConfig};
use mapping_protocol::{report_json_schema, serialize_json_pretty, Report};
use mapping_reconcile::reconcile;
use mapping_registry::load_registry;
use mapping_scanner::{load_sources, FileScanner};
use mapping_schema::{load_schema_file, SchemaIndex};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod report;

pub use config::{CheckConfig, SchemaSource};

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
#[command(name = "check-mapping")]
#[command(
    about = "Reconcile front-end API calls with the backend OpenAPI schema",
    long_about = None
)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the endpoint registry and detected calls with the schema (default)
    Check(CheckArgs),

    /// Print the JSON Schema of the report file
    #[command(name = "report-schema")]
    ReportSchema,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Project root; relative paths below are resolved against it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// File declaring the endpoint registry (default: src/config/api.ts)
    #[arg(long)]
    pub registry_file: Option<PathBuf>,

    /// Name of the registry declaration (default: ENDPOINTS)
    #[arg(long)]
    pub registry_name: Option<String>,

    /// Source directory scanned for HTTP calls (default: src)
    #[arg(long)]
    pub src: Option<PathBuf>,

    /// Report output file (default: reports/mapping-report.json)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// OpenAPI document URL (overrides OPENAPI_URL; default: <base>/openapi.json)
    #[arg(long, conflicts_with = "openapi_file")]
    pub openapi_url: Option<String>,

    /// Read the OpenAPI document from a local file instead of fetching it
    #[arg(long)]
    pub openapi_file: Option<PathBuf>,

    /// HTTP client identifiers to detect (repeatable or comma-separated)
    #[arg(long = "client", value_delimiter = ',')]
    pub clients: Vec<String>,

    /// Schema fetch timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries for transport failures while fetching the schema
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Exit with status 1 when METHOD_MISMATCH or NOT_FOUND records exist
    #[arg(long)]
    pub fail_on_drift: bool,

    /// Print the report JSON to stdout instead of the summary
    #[arg(long)]
    pub json: bool,
}

pub async fn main_entry() -> Result<ExitCode> {
    let mut cli = Cli::parse();

    let command = cli.command.take();
    let json_output = match &command {
        Some(Commands::Check(args)) => args.json,
        Some(Commands::ReportSchema) => true,
        None => cli.check.json,
    };
    // stdout is reserved for JSON
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match command {
        Some(Commands::ReportSchema) => {
            print_stdout(&report_json_schema()?)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check(args)) => run_check(&args).await,
        None => run_check(&cli.check).await,
    }
}

async fn run_check(args: &CheckArgs) -> Result<ExitCode> {
    let config = CheckConfig::resolve(args, |key| env::var(key).ok());
    log::debug!("Resolved configuration: {config:?}");

    let report = check(&config).await?;
    report::write_report(&config.report_path, &report)?;

    if config.json {
        print_stdout(&serialize_json_pretty(&report)?)?;
    } else {
        print_stdout(report::render_summary(&report, &config.report_path).trim_end())?;
    }

    if config.fail_on_drift && report.has_drift() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run every stage and assemble the report. Errors here are fatal
/// configuration or schema failures; drift is data.
pub async fn check(config: &CheckConfig) -> Result<Report> {
    let registry = load_registry(&config.registry_file, &config.registry_name)
        .context("Failed to load the endpoint registry")?;

    let files = FileScanner::new(&config.source_dir).scan();
    let sources = load_sources(&files);
    let detector = CallSiteDetector::new(
        &registry,
        &DetectorConfig {
            clients: config.clients.clone(),
        },
    )
    .context("Invalid call detector configuration")?;
    let calls = detector.detect(&sources, &config.root);

    let schema = load_schema(config).await?;
    let details = reconcile(registry.entries(), &calls, &schema);

    Ok(report::build_report(
        &config.api_base_url,
        &config.schema.describe(),
        registry.len(),
        calls.len(),
        details,
    ))
}

async fn load_schema(config: &CheckConfig) -> Result<SchemaIndex> {
    match &config.schema {
        SchemaSource::Url(url) => config
            .fetcher
            .fetch(url)
            .await
            .with_context(|| format!("Failed to fetch the OpenAPI schema from {url}")),
        SchemaSource::File(path) => load_schema_file(path)
            .with_context(|| format!("Failed to load the OpenAPI schema from {}", path.display())),
    }
}
