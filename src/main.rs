use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use post_tags::api::{self, ApiContext};
use post_tags::config::Config;
use post_tags::posts::PostsApiClient;
use post_tags::service::TagService;
use post_tags::storage::{FileTagStore, InMemoryTagStore, TagStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = filter::Targets::new()
        .with_target("tower_http::trace::on_response", tracing::Level::DEBUG)
        .with_target("tower_http::trace::make_span", tracing::Level::DEBUG)
        .with_default(config.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
    info!("{:?}", &config);

    let store: Arc<dyn TagStore> = match &config.db.db_path {
        Some(db_path) => Arc::new(FileTagStore::open(db_path).await?),
        None => {
            info!("DB_PATH is not set, tags are kept in memory only");
            Arc::new(InMemoryTagStore::new())
        }
    };
    let posts = Arc::new(PostsApiClient::new(&config.posts.api_url, config.posts.timeout)?);

    let ctx = ApiContext::new(config, TagService::new(store, posts));
    api::serve(ctx).await
}
