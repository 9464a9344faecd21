mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, ChromaConfig, LogFormat, LoggingConfig, OpenAiConfig, RetrievalConfig,
};
