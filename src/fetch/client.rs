use async_trait::async_trait;
use reqwest::{Method, Request, Response};

/// Transport used by the loaders. Implemented over reqwest by
/// [`BasicClient`](super::BasicClient) and by stubs in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    async fn get(&self, url: reqwest::Url) -> reqwest::Result<Response> {
        self.execute(Request::new(Method::GET, url)).await
    }
}
