use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod catalog_store;
use catalog_store::{CatalogStore, SqliteCatalogStore};

mod error;

mod query;

mod storage;
use storage::{AudioBackend, FsBackend, HttpBackend};

mod server;
use server::{run_server, RequestsLoggingLevel, ServerConfig};

const CATALOG_READ_POOL_SIZE: usize = 4;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum StreamBackendArg {
    Fs,
    Http,
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(value_parser = parse_path)]
    pub catalog_db: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Which storage backend serves audio bytes.
    #[clap(long, value_enum, default_value = "fs")]
    pub stream_backend: StreamBackendArg,

    /// Root directory for the fs backend. Defaults to the catalog db's
    /// parent directory.
    #[clap(long, value_parser = parse_path)]
    pub audio_root: Option<PathBuf>,

    /// Base URL keys are joined onto for the http backend.
    #[clap(long)]
    pub audio_base_url: Option<String>,

    /// Extra upstream hosts allowed for absolute stream URLs (http backend).
    #[clap(long)]
    pub allowed_upstream_host: Vec<String>,

    /// Allowed CORS origins. Entries starting with '.' are suffix matches.
    #[clap(long)]
    pub allowed_origin: Vec<String>,

    /// Timeout in seconds for upstream storage requests.
    #[clap(long, default_value_t = 30)]
    pub upstream_timeout_sec: u64,

    /// Hard cap on search result counts.
    #[clap(long, default_value_t = 100)]
    pub max_search_limit: usize,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!(
        "Opening SQLite catalog database at {:?}...",
        cli_args.catalog_db
    );
    let catalog_store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::new(
        &cli_args.catalog_db,
        CATALOG_READ_POOL_SIZE,
    )?);

    let audio_backend: Arc<dyn AudioBackend> = match cli_args.stream_backend {
        StreamBackendArg::Fs => {
            let audio_root = match cli_args.audio_root {
                Some(path) => path,
                None => cli_args
                    .catalog_db
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".")),
            };
            if !audio_root.is_dir() {
                bail!("Audio root does not exist: {:?}", audio_root);
            }
            info!("Serving audio from {:?}", audio_root);
            Arc::new(FsBackend::new(audio_root))
        }
        StreamBackendArg::Http => {
            if cli_args.audio_base_url.is_none() && cli_args.allowed_upstream_host.is_empty() {
                bail!("The http backend needs --audio-base-url or --allowed-upstream-host");
            }
            info!(
                "Proxying audio from {}",
                cli_args.audio_base_url.as_deref().unwrap_or("(url param only)")
            );
            Arc::new(HttpBackend::new(
                cli_args.audio_base_url,
                cli_args.allowed_upstream_host,
                Duration::from_secs(cli_args.upstream_timeout_sec),
            )?)
        }
    };

    let mut config = ServerConfig {
        requests_logging_level: cli_args.logging_level,
        port: cli_args.port,
        max_search_limit: cli_args.max_search_limit,
        ..ServerConfig::default()
    };
    if !cli_args.allowed_origin.is_empty() {
        config.allowed_origins = cli_args.allowed_origin;
    }

    info!("Ready to serve at port {}!", config.port);
    run_server(config, catalog_store, audio_backend).await
}
