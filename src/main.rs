use axum::Router;
use chrono::Utc;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::time::Duration;

use critiq_payments::config::Config;
use critiq_payments::handlers;
use critiq_payments::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "critiq-payments")]
#[command(about = "Payment session and regional pricing service for Critiq")]
struct Cli {
    /// Resolve and print the price table for a region, then exit
    #[arg(long, value_name = "REGION")]
    show_pricing: Option<String>,
}

/// Resolve a region's full table and print it (ops aid; exercises the same
/// resolver path the server uses, including live fetch and fallback).
async fn show_pricing(state: &AppState, region: &str) {
    match state.pricing.region_prices(region).await {
        Ok(prices) => {
            println!("Pricing for region '{}':", region);
            for price in prices {
                println!(
                    "  {:<20} {:>8} {}  ({})  [{:?}]",
                    price.product_id, price.amount, price.currency, price.display, price.source
                );
            }
        }
        Err(e) => {
            eprintln!("Failed to resolve pricing for '{}': {}", region, e);
            std::process::exit(1);
        }
    }
}

/// Spawns a background task that periodically sweeps the session store:
/// overdue Pending sessions become Expired, and sessions past the grace
/// period are evicted to bound memory.
fn spawn_sweep_task(state: AppState, interval_secs: u64) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let stats = state.sessions.expire_sweep(Utc::now().timestamp());
            if stats.expired > 0 || stats.evicted > 0 {
                tracing::debug!(
                    expired = stats.expired,
                    evicted = stats.evicted,
                    remaining = state.sessions.len(),
                    "session sweep complete"
                );
            }
        }
    });

    tracing::info!("Session sweep task started (runs every {}s)", interval_secs);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "critiq_payments=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let state = AppState::from_config(&config);

    // Utility command: print a region's resolved table and exit.
    if let Some(ref region) = cli.show_pricing {
        show_pricing(&state, region).await;
        return;
    }

    if config.pricing_api_url.is_none() {
        tracing::warn!("PRICING_API_URL not set; serving fallback pricing only");
    }

    // Start the background session sweeper
    spawn_sweep_task(state.clone(), config.sweep_interval_secs);

    // Build the application router
    let app: Router = handlers::router(config.rate_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("critiq-payments listening on {}", addr);

    // Run server with graceful shutdown.
    // Use into_make_service_with_connect_info to enable IP-based rate limiting.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
