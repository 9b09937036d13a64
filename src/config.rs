use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_results: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub youtube: YoutubeConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:codetube.db".into());
        let youtube = YoutubeConfig {
            api_key: std::env::var("YOUTUBE_API_KEY").context("YOUTUBE_API_KEY is not set")?,
            base_url: std::env::var("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_API_BASE_URL.into()),
            max_results: std::env::var("YOUTUBE_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse::<u8>().ok())
                .unwrap_or(20),
        };
        Ok(Self {
            database_url,
            youtube,
        })
    }
}
