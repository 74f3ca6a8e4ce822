use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "post-tags", about = "Tagging service for posts")]
pub struct FlatConfig {
    #[arg(long, env = "LISTEN_ADDR", default_value = "[::]:8080", help = "Address the HTTP server binds to")]
    listen_addr: String,

    #[arg(long, env = "POSTS_API_URL", default_value = "http://localhost:8081/api/v1", help = "Base URL of the post service")]
    posts_api_url: String,

    #[arg(long, env = "POSTS_API_TIMEOUT_MS", default_value_t = 5000, help = "Request timeout for post lookups, in milliseconds")]
    posts_api_timeout_ms: u64,

    #[arg(long, env = "DB_PATH", help = "Tag log file; tags are kept in memory only when unset")]
    db_path: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info", help = "Default log level")]
    log_level: Level,
}

#[derive(Debug)]
pub struct Config {
    pub api: ApiConfiguration,
    pub posts: PostsConfiguration,
    pub db: DbConfiguration,
    pub log_level: Level,
}

#[derive(Debug)]
pub struct ApiConfiguration {
    pub listen_addr: String, // LISTEN_ADDR
}

#[derive(Debug)]
pub struct PostsConfiguration {
    pub api_url: String, // POSTS_API_URL
    pub timeout: Duration, // POSTS_API_TIMEOUT_MS
}

#[derive(Debug)]
pub struct DbConfiguration {
    pub db_path: Option<PathBuf>, // DB_PATH
}

impl Config {
    pub fn parse() -> Self {
        FlatConfig::parse().into()
    }
}

impl From<FlatConfig> for Config {
    fn from(value: FlatConfig) -> Self {
        Config {
            api: ApiConfiguration {
                listen_addr: value.listen_addr,
            },
            posts: PostsConfiguration {
                api_url: value.posts_api_url,
                timeout: Duration::from_millis(value.posts_api_timeout_ms),
            },
            db: DbConfiguration {
                db_path: value.db_path,
            },
            log_level: value.log_level,
        }
    }
}
