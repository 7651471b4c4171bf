//! Per-trigger feedback state.
//!
//! A trigger (the button the user clicked) moves through
//! `Idle -> Loading -> Success | Copied -> Idle`. Renderers subscribe to the
//! state and redraw; nothing here touches a real UI.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

/// How long the "message copied" label stays before the Facebook popup opens.
pub const FACEBOOK_COPIED_DELAY: Duration = Duration::from_millis(1000);

/// How long the clipboard confirmation stays visible.
pub const CLIPBOARD_SUCCESS_DELAY: Duration = Duration::from_millis(2000);

pub const LOADING_LABEL: &str = "⏳ Création du lien...";
pub const COPIED_LABEL: &str = "✓ Message copié !";
pub const SUCCESS_LABEL: &str = "✅ Copié !";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackState {
    #[default]
    Idle,
    /// Waiting for the share link.
    Loading,
    /// Share text and link are in the clipboard.
    Success,
    /// Message copied ahead of the Facebook popup.
    Copied,
}

impl FeedbackState {
    /// Label shown for this state, given the trigger's own label.
    pub fn label<'a>(&self, original: &'a str) -> Cow<'a, str> {
        match self {
            FeedbackState::Idle => Cow::Borrowed(original),
            FeedbackState::Loading => Cow::Borrowed(LOADING_LABEL),
            FeedbackState::Success => Cow::Borrowed(SUCCESS_LABEL),
            FeedbackState::Copied => Cow::Borrowed(COPIED_LABEL),
        }
    }

    /// Triggers only accept clicks while idle.
    pub fn is_enabled(&self) -> bool {
        matches!(self, FeedbackState::Idle)
    }
}

/// The element that started a dispatch, owner of its feedback state.
///
/// Cheap to clone; clones observe and drive the same state.
#[derive(Debug, Clone)]
pub struct FeedbackTrigger {
    original_label: Arc<str>,
    state: Arc<watch::Sender<FeedbackState>>,
}

impl FeedbackTrigger {
    pub fn new(label: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(FeedbackState::Idle);
        Self {
            original_label: Arc::from(label.into()),
            state: Arc::new(tx),
        }
    }

    pub fn state(&self) -> FeedbackState {
        *self.state.borrow()
    }

    /// Label currently displayed.
    pub fn label(&self) -> String {
        self.state().label(&self.original_label).into_owned()
    }

    pub fn original_label(&self) -> &str {
        &self.original_label
    }

    pub fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    /// Receive every state change, e.g. to redraw the button.
    pub fn subscribe(&self) -> watch::Receiver<FeedbackState> {
        self.state.subscribe()
    }

    /// Subscribers are only woken when the state actually changes.
    pub(crate) fn set(&self, next: FeedbackState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            debug!(
                "Trigger '{}': {:?} -> {:?}",
                self.original_label, current, next
            );
            *current = next;
            true
        });
    }

    /// Back to the original label, enabled.
    pub(crate) fn restore(&self) {
        self.set(FeedbackState::Idle);
    }

    /// Hold `state` for `delay`, then restore.
    pub(crate) async fn hold(&self, state: FeedbackState, delay: Duration) {
        self.set(state);
        tokio::time::sleep(delay).await;
        self.restore();
    }
}
