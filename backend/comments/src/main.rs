mod cli;
mod config;
mod delivery;
mod domain;
mod maintenance;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::{AppConfig, StorageBackend};
use crate::delivery::http::{router, RouterOptions};
use crate::repository::memory::InMemoryCommentRepository;
use crate::repository::postgres::{create_pool, PostgresCommentRepository};
use crate::repository::CommentStore;
use crate::usecase::comments::CommentsUseCase;

pub struct AppState {
    pub comments_usecase: CommentsUseCase<CommentStore>,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = AppConfig::from_env().context("failed to load configuration")?;

    telemetry::init(&config).map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;
    tracing::info!("starting the comments service");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    tracing::info!(
        telemetry_enabled = config.telemetry_enabled,
        storage_backend = ?config.storage_backend,
        "config loaded"
    );

    let store = build_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "comment store ready");

    let comments_usecase = CommentsUseCase::new(store);

    if cli.runs_maintenance() {
        if cli.delete {
            maintenance::delete_all_comments(&comments_usecase).await?;
        }
        if cli.import {
            maintenance::import_comments(&comments_usecase, &config.import_file).await?;
        }
        return Ok(());
    }

    let cors_origin = config
        .web_ip
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("WEB_IP is not a valid origin")?;
    let spa_dir = cli.build.then(|| config.static_dir.clone());

    let shared_state = Arc::new(AppState {
        comments_usecase,
        metrics_handle,
    });

    let app = router(shared_state, RouterOptions { cors_origin, spa_dir });

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("comments service running on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<CommentStore> {
    match config.storage_backend {
        StorageBackend::Memory => Ok(CommentStore::Memory(InMemoryCommentRepository::new())),
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is not set")?;

            let pool = create_pool(database_url, config.database_max_connections)
                .await
                .context("failed to create database pool")?;
            tracing::info!("database pool created");

            sqlx::migrate!().run(&pool).await?;
            tracing::info!("database migrations applied");

            Ok(CommentStore::Postgres(PostgresCommentRepository::new(pool)))
        }
    }
}
