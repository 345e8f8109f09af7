use {
    clap::Parser,
    daylog_config::{DaylogConfig, Error as ConfigError},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser, Debug)]
#[command(name = "daylog", about = "Daylog: remembers what you send and replays it daily")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "daylog starting");

    run(|name| std::env::var(name).ok(), daylog_gateway::start_gateway).await
}

/// Load configuration through `lookup` and hand it to `start`.
///
/// A missing required variable prints a diagnostic and returns `Ok(())`
/// without calling `start`, so nothing is bound or contacted.
async fn run<F, Fut>(lookup: impl Fn(&str) -> Option<String>, start: F) -> anyhow::Result<()>
where
    F: FnOnce(DaylogConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let config = match daylog_config::load_with(lookup) {
        Ok(config) => config,
        Err(e @ ConfigError::MissingVar { .. }) => {
            eprintln!("daylog: {e}");
            return Ok(());
        },
        Err(e) => return Err(e.into()),
    };

    start(config).await
}
