//! Common utilities shared across the quiz share crates.

pub mod http_client;
pub mod truncate;

pub use http_client::{POOL_IDLE_TIMEOUT, USER_AGENT, create_client, create_client_builder};
pub use truncate::truncate_with_ellipsis;
