mod config;
mod embeddings;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, FeedbackBackend};
use crate::embeddings::HttpEmbedder;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::LlmClient;
use crate::pipeline::feedback::{FeedbackStore, FileFeedbackStore, S3FeedbackStore};
use crate::pipeline::orchestrator::{Collaborators, ResumePipeline};
use crate::pipeline::redaction::PiiRedactor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake v{}", env!("CARGO_PKG_VERSION"));

    let thresholds = &config.pipeline;
    if thresholds.feedback_threshold < thresholds.classification_threshold {
        warn!(
            "FEEDBACK_THRESHOLD ({}) is below CLASSIFICATION_THRESHOLD ({}); accepted documents will never be queued for review",
            thresholds.feedback_threshold, thresholds.classification_threshold
        );
    }

    // Initialize embedding client
    let embedder = Arc::new(HttpEmbedder::new(&config.embedding_service_url)?);
    info!("Embedding client initialized ({})", config.embedding_service_url);

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize feedback store
    let feedback_store: Arc<dyn FeedbackStore> = match &config.feedback_backend {
        FeedbackBackend::File { dir } => {
            info!("Feedback records go to {}", dir.display());
            Arc::new(FileFeedbackStore::new(dir.clone()))
        }
        FeedbackBackend::S3 {
            bucket,
            endpoint,
            access_key_id,
            secret_access_key,
            prefix,
        } => {
            let s3 = build_s3_client(endpoint, access_key_id, secret_access_key).await;
            info!("Feedback records go to s3://{}/{}", bucket, prefix);
            Arc::new(S3FeedbackStore::new(s3, bucket.clone(), prefix.clone()))
        }
    };

    let pipeline = ResumePipeline::new(
        config.pipeline.clone(),
        Collaborators {
            extractors: ExtractorRegistry::with_defaults(),
            embedder,
            generator: llm,
            feedback_store,
        },
        PiiRedactor::new(config.pii_hash_salt.clone()),
    )?;
    info!(
        "Pipeline ready (classification_threshold={}, feedback_threshold={}, max_concurrent_documents={})",
        config.pipeline.classification_threshold,
        config.pipeline.feedback_threshold,
        config.max_concurrent_documents
    );

    let state = AppState::new(pipeline, config.max_concurrent_documents);

    // Build router
    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "intake-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
