//! Serve command - runs the HTTP API

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::{AppState, create_router};
use crate::config::AppConfig;
use crate::domain::VectorIndex;
use crate::infrastructure::index::ActiveIndex;
use crate::infrastructure::job::InMemoryJobRepository;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::services::{
    AnswerServiceTrait, JobService, JobServiceTrait, JobSweeper,
};

/// Run the API server. A corrupt index aborts start-up.
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let snapshot = crate::load_index(Path::new(&config.index.dir)).await?;
    let vector_index: Arc<dyn VectorIndex> = Arc::new(ActiveIndex::new(snapshot));

    let answer_service: Arc<dyn AnswerServiceTrait> =
        Arc::new(crate::create_answer_service(&config, vector_index.clone())?);
    let job_service: Arc<dyn JobServiceTrait> = Arc::new(JobService::with_config(
        Arc::new(InMemoryJobRepository::new()),
        answer_service.clone(),
        config.jobs.clone(),
    ));
    let sweeper = JobSweeper::start(job_service.clone(), config.jobs.sweep_interval());

    let metrics = init_metrics(&config.metrics);
    let state = AppState::new(answer_service, job_service, vector_index);
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop();
    info!("API server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}
