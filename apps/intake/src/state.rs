use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::pipeline::orchestrator::ResumePipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ResumePipeline>,
    /// One permit per in-flight document. Sized from MAX_CONCURRENT_DOCUMENTS.
    pub in_flight: Arc<Semaphore>,
}

impl AppState {
    pub fn new(pipeline: ResumePipeline, max_concurrent_documents: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            in_flight: Arc::new(Semaphore::new(max_concurrent_documents)),
        }
    }
}
