mod api;
mod middleware;

use std::path::Path;
use std::sync::Arc;

use rvs_sentiment::{Lexicon, LexiconScorer, SentimentScorer};
use rvs_store::ReviewStore;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rvs_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let scorer = build_scorer(config.lexicon_path.as_deref())?;

    let store = Arc::new(ReviewStore::new(config.allowed_locations.clone()));
    let seed = rvs_store::load_reviews_csv(&config.data_path)?;
    store.load_initial(seed)?;

    let app = build_app(AppState::new(store, scorer));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_scorer(lexicon_path: Option<&Path>) -> anyhow::Result<Arc<dyn SentimentScorer>> {
    let lexicon = match lexicon_path {
        Some(path) => Arc::new(Lexicon::from_path(path)?),
        None => Lexicon::builtin(),
    };
    tracing::info!(version = lexicon.version(), entries = lexicon.len(), "sentiment lexicon ready");
    Ok(Arc::new(LexiconScorer::new(lexicon)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
