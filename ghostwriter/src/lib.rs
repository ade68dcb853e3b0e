//! HTTP service that writes board posts and replies in the voice of a
//! persona ("clone") by prompting a language model.
//!
//! The crate is a library so the router can be exercised in tests with a
//! stub [`llm::LLMClient`]; `main.rs` only wires configuration to [`app`].

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod generate;
pub mod logging;
pub mod parse;
pub mod prompt;
pub mod routes;
pub mod schema;

pub use config::{Config, ConfigError, Provider};
pub use error::ApiError;
pub use generate::{GenerationError, Generator, Variant};
pub use logging::init_logging;
pub use routes::AppState;

/// Build the application router with the provided state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/chat", post(routes::chat))
        .route("/post", post(routes::create_post))
        .route("/reply", post(routes::create_reply))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
