//! # Coinfolio — Paper-Trading Crypto Portfolio Backend
//!
//! ```text
//!  ┌─────────────┐  fetch_latest(tracked)      ┌─────────────────────────────┐
//!  │  CoinGecko  │ ◀────────────────────────── │ Scheduler loop (every tick) │
//!  └─────────────┘                             │ ├─ poll cycle  → PriceStore │
//!                                              │ └─ alert cycle → Evaluator  │
//!  ┌─────────────┐  📧 notify on match         │      ├─ Notifier            │
//!  │  Recipient  │ ◀───────────────────────────┤      └─ AlertRegistry ⏸     │
//!  └─────────────┘                             └─────────────────────────────┘
//!
//!  ┌─────────────┐  POST /api/trade/{buy,sell} ┌─────────────────────────────┐
//!  │  Dashboard  │ ─────────────────────────▶  │ Ledger (balance, holdings,  │
//!  │             │  GET  /api/trade/*          │         transaction log)    │
//!  └─────────────┘  /api/alerts /api/prices    └─────────────────────────────┘
//! ```

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::sync::watch;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod alerts;
mod config;
mod engine;
mod error;
mod ledger;
mod models;
mod prices;
mod routes;
mod scheduler;
mod state;

use config::Config;
use engine::{fetcher::CoinGeckoFeed, notifier::EmailNotifier};
use routes::{
    alerts::{add_alert, delete_alert, list_alerts},
    prices::{get_history, get_prices, health_check},
    trading::{buy, get_balance, get_portfolio, get_transactions, get_valuation, sell},
};
use scheduler::Scheduler;
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("coinfolio=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════════════╗
  ║           COINFOLIO — Paper Trading Backend           ║
  ║  Prices · Ledger · Alerts · Scheduler                 ║
  ╚═══════════════════════════════════════════════════════╝"#);

    // ── 3. Config + shared state ──────────────────────────────────────────────
    let config = Config::from_env();
    let state = build_state(config);

    // ── 4. Scheduler loop (poll + alert cycles) ───────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let feed = CoinGeckoFeed::new(state.http_client.clone(), &state.config.price_api_url);
    let notifier = EmailNotifier::new(
        state.http_client.clone(),
        state.config.notify_webhook_url.clone(),
    );
    let loop_task = tokio::spawn(
        Scheduler::new(
            feed,
            notifier,
            state.prices.clone(),
            state.alerts.clone(),
            state.config.tracked_assets.clone(),
            state.config.poll_interval,
            state.poll_count.clone(),
            state.alerts_fired.clone(),
        )
        .run(shutdown_rx),
    );

    let addr: SocketAddr = state.config.bind_addr.parse()?;

    // ── 5. CORS ───────────────────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 6. Router ─────────────────────────────────────────────────────────────
    let app = Router::new()
        // ── Prices ────────────────────────────────────────────────────────────
        .route("/api/health",             get(health_check))
        .route("/api/prices",             get(get_prices))
        .route("/api/history/:asset",     get(get_history))
        // ── Ledger ────────────────────────────────────────────────────────────
        .route("/api/trade/buy",          post(buy))
        .route("/api/trade/sell",         post(sell))
        .route("/api/trade/balance",      get(get_balance))
        .route("/api/trade/portfolio",    get(get_portfolio))
        .route("/api/trade/valuation",    get(get_valuation))
        .route("/api/trade/transactions", get(get_transactions))
        // ── Alerts ────────────────────────────────────────────────────────────
        .route("/api/alerts",             post(add_alert))
        .route("/api/alerts",             get(list_alerts))
        .route("/api/alerts/:id",         delete(delete_alert))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // ── 7. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "🚀 Coinfolio server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    // ── 8. Clean shutdown — let an in-flight cycle finish ─────────────────────
    let _ = shutdown_tx.send(true);
    loop_task.await?;
    info!("Scheduler loop stopped — goodbye");

    Ok(())
}
