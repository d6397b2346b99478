pub mod anthropic_client;
pub mod api;
pub mod api_client;
pub mod config;
pub mod error;
pub mod intent;
pub mod keyword_matcher;
pub mod llm_client;
pub mod llm_strategy;
pub mod openai_client;
pub mod parser;
pub mod prompt;
pub mod reply;
pub mod strategy;

pub use api::{CurrentRoute, ModifyRouteRequest, ModifyRouteResponse};
pub use api_client::IntentApiClient;
pub use config::IntentParserConfig;
pub use error::IntentError;
pub use intent::{IntentContext, IntentSource, RouteIntent};
pub use keyword_matcher::KeywordMatcher;
pub use parser::IntentParser;
pub use strategy::IntentStrategy;
