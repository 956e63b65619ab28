use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::pipeline::config::{PipelineConfig, PrototypeSets};
use crate::pipeline::redaction::RedactionLevel;

/// Where review records are written.
#[derive(Debug, Clone)]
pub enum FeedbackBackend {
    File {
        dir: PathBuf,
    },
    S3 {
        bucket: String,
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
        prefix: String,
    },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub embedding_service_url: String,
    pub feedback_backend: FeedbackBackend,
    pub pii_hash_salt: Option<String>,
    pub max_concurrent_documents: usize,
    pub max_upload_bytes: usize,
    pub pipeline: PipelineConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let feedback_backend = match env_or("FEEDBACK_BACKEND", "file".to_string())?
            .to_lowercase()
            .as_str()
        {
            "file" => FeedbackBackend::File {
                dir: env_or("FEEDBACK_DIR", PathBuf::from("./feedback"))?,
            },
            "s3" => FeedbackBackend::S3 {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
                prefix: env_or("FEEDBACK_S3_PREFIX", "feedback/".to_string())?,
            },
            other => bail!("FEEDBACK_BACKEND must be 'file' or 's3', got '{other}'"),
        };

        let max_upload_bytes = env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?;

        let mut pipeline = PipelineConfig {
            classification_threshold: env_or(
                "CLASSIFICATION_THRESHOLD",
                crate::pipeline::config::DEFAULT_CLASSIFICATION_THRESHOLD,
            )?,
            feedback_threshold: env_or(
                "FEEDBACK_THRESHOLD",
                crate::pipeline::config::DEFAULT_FEEDBACK_THRESHOLD,
            )?,
            log_redaction: env_or("LOG_REDACTION_LEVEL", RedactionLevel::Partial)?,
            feedback_redaction: env_or("FEEDBACK_REDACTION_LEVEL", RedactionLevel::None)?,
            max_file_bytes: max_upload_bytes as u64,
            ..Default::default()
        };
        if let Ok(path) = std::env::var("CLASSIFIER_PROTOTYPES_PATH") {
            let sets = PrototypeSets::load(&PathBuf::from(path))?;
            pipeline.resume_prototypes = sets.resume;
            pipeline.non_resume_prototypes = sets.non_resume;
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            embedding_service_url: env_or(
                "EMBEDDING_SERVICE_URL",
                "http://localhost:5001".to_string(),
            )?,
            feedback_backend,
            pii_hash_salt: std::env::var("PII_HASH_SALT").ok().filter(|s| !s.is_empty()),
            max_concurrent_documents: env_or("MAX_CONCURRENT_DOCUMENTS", 4usize)?,
            max_upload_bytes,
            pipeline,
            port: env_or("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses `key` when set, otherwise returns `default`.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {key} ('{raw}'): {e}"))
}
