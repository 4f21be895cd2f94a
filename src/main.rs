//! CLI entry point for the plan coalescer.
//!
//! Provides subcommands for serving the plan info page and for one-shot
//! coalescing of a single member's plan values.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plan_coalescer::{
    aggregator::Aggregator,
    config::{DEFAULT_ADDR, default_sources},
    fetch::{HttpTransport, SocketTransport, Transport},
    plan::{PlanInfo, Weights},
    server::{AppState, serve},
    sim,
};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "plan_coalescer")]
#[command(about = "Coalesce health-plan cost values from several providers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the plan info page over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = DEFAULT_ADDR)]
        addr: SocketAddr,

        /// How providers are queried
        #[arg(short, long, value_enum, default_value_t = TransportKind::Fixture)]
        transport: TransportKind,

        /// Provider base URL (repeatable, replaces the defaults)
        #[arg(short, long = "source", value_name = "URL")]
        sources: Vec<String>,
    },
    /// Coalesce plan values for a single member
    Compute {
        /// Member to look up
        #[arg(short, long)]
        member_id: i64,

        /// Weight of the mode in the blend
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        mode_weight: f64,

        /// Weight of the median in the blend
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        median_weight: f64,

        /// How providers are queried
        #[arg(short, long, value_enum, default_value_t = TransportKind::Http)]
        transport: TransportKind,

        /// Provider base URL (repeatable, replaces the defaults)
        #[arg(short, long = "source", value_name = "URL")]
        sources: Vec<String>,

        /// Also log the coalesced plan as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransportKind {
    /// Built-in simulated provider responses
    Fixture,
    /// reqwest HTTP client
    Http,
    /// Raw TCP, plain http:// only
    Socket,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/plan_coalescer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("plan_coalescer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            addr,
            transport,
            sources,
        } => {
            let aggregator = aggregator_for(sources);
            info!(
                sources = aggregator.base_urls().count(),
                transport = ?transport,
                "Plan info server configured"
            );

            // blocking clients must be built off the async workers
            let transport = tokio::task::spawn_blocking(move || build_transport(transport))
                .await
                .context("transport setup task failed")??;

            serve(addr, AppState::new(aggregator, transport)).await;
        }
        Commands::Compute {
            member_id,
            mode_weight,
            median_weight,
            transport,
            sources,
            json,
        } => {
            let aggregator = aggregator_for(sources);
            let weights = Weights::new(mode_weight, median_weight);

            // the transport is built and dropped on the blocking pool
            let plan = tokio::task::spawn_blocking(move || -> Result<PlanInfo> {
                let transport = build_transport(transport)?;
                Ok(aggregator.compute(member_id, transport.as_ref(), weights))
            })
            .await
            .context("aggregation task failed")??;

            if json {
                let plan = serde_json::to_string(&plan)?;
                info!(member_id, plan = %plan, "Coalesced plan");
            }
        }
    }

    Ok(())
}

fn aggregator_for(sources: Vec<String>) -> Aggregator {
    if sources.is_empty() {
        Aggregator::new(default_sources())
    } else {
        Aggregator::new(sources)
    }
}

fn build_transport(kind: TransportKind) -> Result<Arc<dyn Transport>> {
    let transport: Arc<dyn Transport> = match kind {
        TransportKind::Fixture => Arc::new(sim::transport()),
        TransportKind::Http => Arc::new(HttpTransport::new()?),
        TransportKind::Socket => Arc::new(SocketTransport::new()),
    };
    Ok(transport)
}
