//! Demo driver for the resilience decorators.
//!
//! ```text
//!     caller loop
//!         │
//!         ▼
//!   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐
//!   │ DebounceFirst │───▶│ CircuitBreaker │───▶│  dependency  │
//!   │ (cache check) │    │  (gate check)  │    │ (simulated)  │
//!   └───────────────┘    └────────────────┘    └──────────────┘
//! ```
//!
//! Each subcommand wires one arrangement, calls it in a loop and prints
//! every result or error.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use circuit_patterns::config::{load_config, PatternsConfig};
use circuit_patterns::observability::{logging, metrics};
use circuit_patterns::{circuit_fn, Circuit, CircuitError, CircuitExt, CircuitResult, Context};

/// Simulated latency of every demo dependency.
const DEPENDENCY_LATENCY: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "circuit-patterns")]
#[command(about = "Exercise the circuit breaker and debounce decorators", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Breaker around a dependency that always fails
    Breaker {
        /// Calls made after the initial failure streak
        #[arg(long, default_value_t = 2)]
        calls: u32,
        /// Pause after the failure streak, in milliseconds
        #[arg(long, default_value_t = 1000)]
        pause_ms: u64,
    },
    /// Debounce around a dependency that counts its invocations
    Debounce {
        #[arg(long, default_value_t = 6)]
        calls: u32,
        /// Pause between calls, in milliseconds
        #[arg(long, default_value_t = 300)]
        interval_ms: u64,
    },
    /// Debounce wrapped around a breaker wrapped around a flaky dependency
    Compose {
        #[arg(long, default_value_t = 12)]
        calls: u32,
        #[arg(long, default_value_t = 400)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PatternsConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        failure_threshold = config.breaker.failure_threshold,
        debounce_threshold_ms = config.debounce.threshold_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let (ctx, cancel) = Context::with_cancel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling demo context");
            cancel.cancel();
        }
    });

    match cli.command {
        Commands::Breaker { calls, pause_ms } => run_breaker(&config, &ctx, calls, pause_ms).await,
        Commands::Debounce { calls, interval_ms } => {
            run_debounce(&config, &ctx, calls, interval_ms).await
        }
        Commands::Compose { calls, interval_ms } => {
            run_compose(&config, &ctx, calls, interval_ms).await
        }
    }

    Ok(())
}

async fn run_breaker(config: &PatternsConfig, ctx: &Context, calls: u32, pause_ms: u64) {
    let dependency = circuit_fn(|ctx| async move {
        simulate_latency(&ctx).await?;
        Err(CircuitError::dependency("concurrency error"))
    });
    let breaker = dependency
        .breaker(config.breaker.failure_threshold)
        .named("always-failing");

    for _ in 0..config.breaker.failure_threshold {
        print_outcome(breaker.call(ctx).await);
    }

    tokio::time::sleep(Duration::from_millis(pause_ms)).await;

    for _ in 0..calls {
        print_outcome(breaker.call(ctx).await);
    }
}

async fn run_debounce(config: &PatternsConfig, ctx: &Context, calls: u32, interval_ms: u64) {
    let count = Arc::new(AtomicU32::new(0));
    let dependency = circuit_fn(move |ctx| {
        let count = count.clone();
        async move {
            simulate_latency(&ctx).await?;
            Ok(format!("ok:{}", count.fetch_add(1, Ordering::SeqCst) + 1))
        }
    });
    let debounced = dependency
        .debounce_first(config.debounce.threshold())
        .named("counting");

    call_repeatedly(&debounced, ctx, calls, interval_ms).await;
}

async fn run_compose(config: &PatternsConfig, ctx: &Context, calls: u32, interval_ms: u64) {
    let count = Arc::new(AtomicU32::new(0));
    let dependency = circuit_fn(move |ctx| {
        let count = count.clone();
        async move {
            simulate_latency(&ctx).await?;
            let n = count.fetch_add(1, Ordering::SeqCst) + 1;
            // Healthy for a few calls, then down for a stretch.
            if (n / 4) % 2 == 1 {
                Err(CircuitError::dependency(format!("flaky dependency down (call {n})")))
            } else {
                Ok(format!("ok:{n}"))
            }
        }
    });
    let composed = dependency
        .breaker(config.breaker.failure_threshold)
        .named("flaky")
        .debounce_first(config.debounce.threshold())
        .named("flaky");

    call_repeatedly(&composed, ctx, calls, interval_ms).await;
}

async fn call_repeatedly(circuit: &impl Circuit, ctx: &Context, calls: u32, interval_ms: u64) {
    for i in 0..calls {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
        print_outcome(circuit.call(ctx).await);
    }
}

async fn simulate_latency(ctx: &Context) -> Result<(), CircuitError> {
    tokio::select! {
        _ = tokio::time::sleep(DEPENDENCY_LATENCY) => Ok(()),
        _ = ctx.cancelled() => Err(CircuitError::Cancelled),
    }
}

fn print_outcome(outcome: CircuitResult) {
    match outcome {
        Ok(res) => println!("{res}"),
        Err(e) => println!("Error: {e}"),
    }
}
