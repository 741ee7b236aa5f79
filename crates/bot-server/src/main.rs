//! TA Signal Bot Server
//!
//! Axum-based chat transport for the technical-analysis bot: REST and
//! WebSocket endpoints that drive the conversation flows over the
//! configured market-data provider.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bot_core::{Dispatcher, DispatcherConfig, FlowRegistry, MemorySessionStore};
use ta_advisor::{
    RiskRewardFlow, RsiFlow, VolatilityFlow,
    market::{CoinGeckoClient, MarketDataClient, MockMarketClient},
};

use crate::handlers::{chat_handler, chat_stream_handler, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize market data provider
    let market: Arc<dyn MarketDataClient> =
        if std::env::var("MARKET_PROVIDER").as_deref() == Ok("mock") {
            Arc::new(MockMarketClient::new())
        } else {
            Arc::new(CoinGeckoClient::from_env()?)
        };

    if market.health_check().await {
        tracing::info!("✓ Connected to {}", market.name());
    } else {
        tracing::warn!("⚠ {} not reachable - analyses will fail", market.name());
        tracing::warn!("  Set MARKET_PROVIDER=mock for offline development");
    }

    // Register conversation flows
    let mut flows = FlowRegistry::new();
    flows.register(RsiFlow::new(market.clone()));
    flows.register(VolatilityFlow::new(market.clone()));
    flows.register(RiskRewardFlow::new());

    tracing::info!("Registered {} flows:", flows.len());
    for name in flows.names() {
        tracing::info!("  • {}", name);
    }

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(flows),
        Arc::new(MemorySessionStore::new()),
        DispatcherConfig {
            welcome: ta_advisor::text::welcome(),
            ..Default::default()
        },
    ));

    // Build application state
    let state = AppState { dispatcher, market };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 ta-signal-bot server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /api/chat        - Send message");
    tracing::info!("  GET  /api/chat/stream - WebSocket chat");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
