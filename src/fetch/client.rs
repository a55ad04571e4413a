use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam for the one external I/O boundary, so the pipeline can be
/// exercised against canned responses.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
