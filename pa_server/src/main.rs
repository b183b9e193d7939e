use anyhow::Context;
use chrono::Utc;
use pa_server::{
    api,
    config::{Overrides, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use pool_arena::TournamentManager;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::info;

const HELP: &str = "\
Run a pool arena battle server

USAGE:
  pa_server [OPTIONS]

OPTIONS:
  --bind           IP:PORT  Server socket bind address  [default: 127.0.0.1:8080]
  --clock-interval SECS     Seconds between schedule checks  [default: 1]
  --metrics-bind   IP:PORT  Serve Prometheus metrics on this address

FLAGS:
  -h, --help                Print help information

ENVIRONMENT:
  SERVER_BIND, CLOCK_INTERVAL_SECS, METRICS_BIND and the ARENA_* rule
  variables are read from the environment or a .env file.
";

fn parse_args() -> Result<Overrides, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let overrides = Overrides {
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        clock_interval_secs: pargs.opt_value_from_str("--clock-interval")?,
        metrics_bind: pargs.opt_value_from_str::<_, SocketAddr>("--metrics-bind")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}", remaining);
    }

    Ok(overrides)
}

/// Fire lifecycle signals for tournaments whose schedule has been reached.
async fn run_clock(
    manager: Arc<TournamentManager>,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Utc::now();
                let transitions = manager.apply_clock(now).await;
                let archived = manager.archive_ended(now).await;
                let tournaments = manager.tournament_count().await;
                metrics::clock_transitions(transitions);
                metrics::tournaments_archived(archived);
                metrics::tournaments_active(tournaments);
                logging::log_clock_pass(transitions, archived, tournaments);
            }
            _ = shutdown.changed() => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    logging::init();

    let overrides = parse_args().context("Invalid command line arguments")?;
    let config = ServerConfig::from_env(overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "Rules: fee {} bps, refund cutoff {} bps, top {} exact, feed capacity {}",
        config.arena.fee_rate_bps,
        config.arena.refund_fraction_bps,
        config.arena.exact_disclosure_count,
        config.arena.feed_capacity
    );

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics available at http://{}/metrics", addr);
    }

    let manager = Arc::new(TournamentManager::new(config.arena.clone()));

    let (clock_stop, clock_stopped) = watch::channel(false);
    let clock = tokio::spawn(run_clock(
        manager.clone(),
        config.clock_interval_secs,
        clock_stopped,
    ));

    let app = api::create_router(api::AppState {
        manager: manager.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    let _ = clock_stop.send(true);
    if let Err(e) = clock.await {
        tracing::warn!("Clock task ended abnormally: {}", e);
    }
    manager.shutdown().await;

    Ok(())
}
