use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sds_dataviews::{
    format_sds_error, Config, Dataview, DataviewData, DataviewsClient, DecodeMode,
    InterpolatedQuery, Paging, PreviewQuery,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for SDS dataviews
#[derive(Parser, Debug)]
#[command(name = "sds-dataviews", version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Namespace to work against (defaults to the configured one)
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List dataviews
    List(PagingArgs),
    /// Show one dataview
    Get { dataview_id: String },
    /// Create a dataview from a JSON file
    Create { file: PathBuf },
    /// Update a dataview from a JSON file
    Update { file: PathBuf },
    /// Delete a dataview
    Delete { dataview_id: String },
    /// List the datagroups of a dataview
    Datagroups {
        dataview_id: String,
        #[command(flatten)]
        paging: PagingArgs,
        /// Print the response envelope as returned by the server
        #[arg(long)]
        raw: bool,
    },
    /// Show one datagroup
    Datagroup {
        dataview_id: String,
        datagroup_id: String,
    },
    /// Preview interpolated data
    Preview {
        dataview_id: String,
        #[arg(long)]
        start_index: Option<String>,
        #[arg(long)]
        end_index: Option<String>,
        #[arg(long)]
        interval: Option<String>,
        /// Alternate output form, e.g. csvh
        #[arg(long)]
        form: Option<String>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Read interpolated data
    Interpolated {
        dataview_id: String,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        form: Option<String>,
        /// Continue a previous paged read
        #[arg(long)]
        session_id: Option<String>,
    },
}

#[derive(Args, Debug)]
struct PagingArgs {
    #[arg(long, default_value_t = sds_dataviews::dataview::DEFAULT_SKIP)]
    skip: u32,
    #[arg(long, default_value_t = sds_dataviews::dataview::DEFAULT_COUNT)]
    count: u32,
}

impl From<&PagingArgs> for Paging {
    fn from(args: &PagingArgs) -> Self {
        Paging::new(args.skip, args.count)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("sds-dataviews started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("sds-dataviews").join("sds-dataviews.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".sds-dataviews").join("sds-dataviews.log");
    }
    PathBuf::from("sds-dataviews.log")
}

fn read_dataview(path: &PathBuf) -> Result<Dataview> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Dataview::from_json(json)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_data(data: DataviewData<Value>) -> Result<()> {
    match data {
        DataviewData::Text(text) => {
            println!("{}", text);
            Ok(())
        }
        DataviewData::Structured(value) | DataviewData::Typed(value) => print_json(&value),
    }
}

async fn run(cli: Cli, client: DataviewsClient, namespace: String) -> Result<()> {
    let ns = namespace.as_str();
    match cli.command {
        Command::List(paging) => print_json(&client.list_dataviews(ns, (&paging).into()).await?),
        Command::Get { dataview_id } => print_json(&client.get_dataview(ns, &dataview_id).await?),
        Command::Create { file } => {
            let dataview = read_dataview(&file)?;
            print_json(&client.create_dataview(ns, &dataview).await?)
        }
        Command::Update { file } => {
            let dataview = read_dataview(&file)?;
            print_json(&client.update_dataview(ns, &dataview).await?)
        }
        Command::Delete { dataview_id } => {
            client.delete_dataview(ns, &dataview_id).await?;
            println!("Deleted dataview {}", dataview_id);
            Ok(())
        }
        Command::Datagroups {
            dataview_id,
            paging,
            raw,
        } => {
            if raw {
                print_json(&client.list_datagroups_raw(ns, &dataview_id, (&paging).into()).await?)
            } else {
                print_json(&client.list_datagroups(ns, &dataview_id, (&paging).into()).await?)
            }
        }
        Command::Datagroup {
            dataview_id,
            datagroup_id,
        } => print_json(&client.get_datagroup(ns, &dataview_id, &datagroup_id).await?),
        Command::Preview {
            dataview_id,
            start_index,
            end_index,
            interval,
            form,
            count,
        } => {
            let query = PreviewQuery {
                start_index,
                end_index,
                interval,
                form,
                count,
            };
            print_data(
                client
                    .get_preview::<Value>(ns, &dataview_id, &query, DecodeMode::Structured)
                    .await?,
            )
        }
        Command::Interpolated {
            dataview_id,
            skip,
            count,
            form,
            session_id,
        } => {
            let query = InterpolatedQuery {
                count,
                skip,
                form,
                session_id,
            };
            print_data(
                client
                    .get_interpolated::<Value>(ns, &dataview_id, &query, DecodeMode::Structured)
                    .await?,
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = setup_logging(cli.log_level)?;

    let config = Config::load(cli.config.as_deref())?.merge_env();
    tracing::debug!("Loaded config: {:?}", config);

    let namespace = cli
        .namespace
        .clone()
        .or_else(|| config.namespace_id.clone())
        .context("No namespace configured. Set SDS_NAMESPACE_ID or use --namespace")?;

    let base = config
        .build_client()
        .context("Failed to initialize SDS client")?;
    let client = DataviewsClient::new(base);

    tracing::info!(
        "Using tenant: {}, namespace: {}",
        client.base().tenant_id(),
        namespace
    );

    if let Err(err) = run(cli, client, namespace).await {
        match err.downcast_ref::<sds_dataviews::SdsError>() {
            Some(sds_err) => eprintln!("Error: {}", format_sds_error(sds_err)),
            None => eprintln!("Error: {err:?}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
