//! Centralized HTTP client factory for the quiz share crates.
//!
//! Provides factory functions to create HTTP clients with consistent configuration:
//! - `create_client(Option<Duration>)` - optional overall timeout from config
//! - `create_client_builder()` - for further customization
//!
//! All clients include: User-Agent, tcp_nodelay, and a pool idle timeout.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("quiz-share/", env!("CARGO_PKG_VERSION"));

/// Connection pool idle timeout so DNS is re-resolved periodically.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates an HTTP client, applying `timeout` only when one is given.
///
/// Without a timeout a share-link request resolves or fails according to
/// the server's own contract. The read timeout is capped at 60s.
///
/// # Example
/// ```ignore
/// let client = create_client(Some(Duration::from_secs(5)))?;
/// let resp = client.post("https://quiz.example.com/api/quiz/create-share-link").send().await;
/// ```
pub fn create_client(timeout: Option<Duration>) -> Result<Client, String> {
    let mut builder = create_client_builder();

    if let Some(timeout) = timeout {
        builder = builder
            .timeout(timeout)
            .read_timeout(timeout.min(Duration::from_secs(60)));
    }

    builder
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}

/// Creates an HTTP client builder with standard configuration.
///
/// Use this when you need to customize the client further before building.
pub fn create_client_builder() -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
}
