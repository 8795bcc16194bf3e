mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use shoprank_catalog::{AggregationPipeline, PipelineSettings, Registry};
use shoprank_scraper::ImageProxy;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(shoprank_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = Registry::from_config(&config)?;
    for descriptor in registry.iter() {
        tracing::info!(
            platform = descriptor.platform.id(),
            upstream = descriptor.upstream.state(),
            "platform registered"
        );
    }

    let pipeline = AggregationPipeline::new(
        registry,
        PipelineSettings {
            inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
            synthetic_seed: config.synthetic_seed,
        },
    );
    let image_proxy = ImageProxy::new(
        config.image_proxy_hosts.clone(),
        config.upstream_timeout_secs,
        &config.upstream_user_agent,
    )?;

    let app = build_app(AppState {
        config: Arc::clone(&config),
        pipeline: Arc::new(pipeline),
        image_proxy: Arc::new(image_proxy),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "shoprank server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
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

    tracing::info!("received shutdown signal, draining connections");
}
