//! Quiz result sharing.
//!
//! Builds a shareable summary of a finished quiz, obtains a short share link
//! from the quiz server (falling back to the quiz's play page when the
//! server is unreachable), and dispatches the result to Facebook, Twitter/X,
//! the native share sheet or the clipboard.
//!
//! Clipboard, popup windows, native share and user notices are capabilities
//! supplied by the host through the traits in [`capabilities`].
//!
//! # Example
//!
//! ```rust,ignore
//! use quiz_share::{FeedbackTrigger, Platform, QuizResult, ShareConfig, ShareSession};
//!
//! let config = ShareConfig::from_env()?;
//! let result = QuizResult::new("capitales", "Capitales", 850, 8, 10, true)?;
//! let session = ShareSession::new(result, &config, capabilities)?;
//! let trigger = FeedbackTrigger::new("Copier");
//! session.dispatch(Platform::Clipboard, &trigger).await;
//! ```

pub mod capabilities;
pub mod config;
pub mod feedback;
pub mod issuer;
pub mod result;
pub mod session;

pub use capabilities::{
    ClipboardWriter, NativeShare, NativeShareOutcome, Notice, NoticeLevel, Notifier, PopupOpener,
    ShareCapabilities, SharePayload, Viewport,
};
pub use config::ShareConfig;
pub use feedback::{FeedbackState, FeedbackTrigger};
pub use issuer::{CreateShareLinkRequest, HttpLinkIssuer, LinkIssuer, ShareLinkResponse};
pub use result::{Platform, QuizResult, ShareAttributes};
pub use session::{DispatchOutcome, ShareLink, ShareSession};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Invalid quiz result: {0}")]
    InvalidResult(String),
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Share API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Malformed share link response: {0}")]
    MalformedResponse(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Native share error: {0}")]
    NativeShare(String),
}

impl From<reqwest::Error> for ShareError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ShareError::MalformedResponse(err.to_string())
        } else if err.is_connect() {
            ShareError::Network(format!("Connection failed: {}", err))
        } else {
            ShareError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ShareError {
    fn from(err: serde_json::Error) -> Self {
        ShareError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShareError>;

/// Default path of the share link endpoint on the quiz server.
pub const DEFAULT_SHARE_ENDPOINT: &str = "/api/quiz/create-share-link";
