mod config;
mod errors;
mod layout;
mod models;
mod persistence;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::{ContentMeasurer, ReportedRegion};
use crate::persistence::{FileStore, ResumeStore};
use crate::resume::{ProviderOptions, ResumeContext};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));

    // Local document store
    let store: Arc<dyn ResumeStore> = Arc::new(FileStore::new(config.data_dir.clone()).await?);

    // Mount the resume provider before any route can reach it
    let resume = ResumeContext::new();
    let facade = resume
        .provide(
            store.clone(),
            ProviderOptions {
                profile: config.profile_id,
                max_depth: config.history_depth,
                quiet_window: config.save_debounce,
            },
        )
        .await;
    info!(
        "Editing profile '{}' ({}), undo depth {}, save debounce {:?}",
        facade.profile().name,
        facade.profile().id,
        config.history_depth,
        config.save_debounce
    );

    // Pagination: the UI reports its preview height into this region
    let measurer = ContentMeasurer::new();
    let (region, layout_events) = ReportedRegion::new();
    measurer.attach(region.clone());
    measurer.observe(layout_events);

    let state = AppState {
        resume: resume.clone(),
        store,
        measurer: measurer.clone(),
        region,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("127.0.0.1:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Write out the last edits before exiting
    measurer.detach();
    resume.unmount().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
