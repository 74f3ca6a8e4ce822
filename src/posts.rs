use std::sync::Arc;
use std::time::Duration;
use http::StatusCode;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use crate::error::{PostsApiError, TagError};

pub const POST_NOT_FOUND: &str = "Post id not found";

/// Verifies that a post owned by the external post service exists.
///
/// Exactly one remote attempt is made per call. A missing post is reported as
/// [`TagError::NotFound`]; every other failure is returned as
/// [`TagError::Internal`] with the original error as its cause.
#[async_trait::async_trait]
pub trait PostExistenceChecker: Send + Sync {
    async fn check(&self, post_id: i64) -> Result<(), TagError>;
}

#[derive(Debug)]
struct PostsApiConfig {
    api_url: String,
}

#[derive(Clone, Debug)]
pub struct PostsApiClient {
    client: Client,
    config: Arc<PostsApiConfig>,
}

impl PostsApiClient {
    pub fn new(api_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .use_rustls_tls()
            .build()?;
        let api_url = api_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            config: Arc::new(PostsApiConfig { api_url }),
        })
    }

    pub fn post_url(&self, post_id: i64) -> String {
        format!("{}/posts/{}", self.config.api_url, post_id)
    }

    pub async fn get_post(&self, post_id: i64) -> Result<reqwest::Response, PostsApiError> {
        let url = self.post_url(post_id);
        debug!("GET {url}");
        let res = self.client.get(&url).send().await.map_err(PostsApiError::NetworkError)?;
        Ok(res)
    }
}

#[async_trait::async_trait]
impl PostExistenceChecker for PostsApiClient {
    async fn check(&self, post_id: i64) -> Result<(), TagError> {
        let res = self.get_post(post_id).await?;
        match res.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(TagError::not_found(POST_NOT_FOUND)),
            status => Err(PostsApiError::NonSuccessfulStatusCode(status).into()),
        }
    }
}
