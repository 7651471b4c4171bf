//! Host capabilities the share session calls into.
//!
//! None of these are implemented here: a browser host wires them to the
//! clipboard, `window.open`, `navigator.share` and alerts; the CLI wires them
//! to the desktop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

/// Writes text to the system clipboard.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Content handed to the native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// How a native share sheet interaction ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeShareOutcome {
    Shared,
    /// The user dismissed the sheet. Not an error.
    Cancelled,
}

/// The host's native share sheet.
#[async_trait]
pub trait NativeShare: Send + Sync {
    /// Feature detection; a host may expose the capability but lack support.
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, payload: &SharePayload) -> Result<NativeShareOutcome>;
}

/// Size of the window popups are centered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

/// Opens share popups. Fire-and-forget.
pub trait PopupOpener: Send + Sync {
    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn open(&self, url: &str, title: &str, features: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Alert,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Alert,
            message: message.into(),
        }
    }
}

/// Surfaces notices to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Everything a share session needs from its host.
#[derive(Clone)]
pub struct ShareCapabilities {
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub popup: Arc<dyn PopupOpener>,
    pub notifier: Arc<dyn Notifier>,
    /// `None` when the host has no native share sheet at all.
    pub native_share: Option<Arc<dyn NativeShare>>,
}

impl ShareCapabilities {
    pub fn new(
        clipboard: Arc<dyn ClipboardWriter>,
        popup: Arc<dyn PopupOpener>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clipboard,
            popup,
            notifier,
            native_share: None,
        }
    }

    pub fn with_native_share(mut self, native_share: Arc<dyn NativeShare>) -> Self {
        self.native_share = Some(native_share);
        self
    }

    /// The native share sheet, if present and supported.
    pub fn native_share(&self) -> Option<&Arc<dyn NativeShare>> {
        self.native_share.as_ref().filter(|n| n.is_available())
    }
}

impl std::fmt::Debug for ShareCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareCapabilities")
            .field("native_share", &self.native_share().is_some())
            .finish_non_exhaustive()
    }
}
