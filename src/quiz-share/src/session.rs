//! Share session: one per results widget.
//!
//! Owns the quiz result, creates the share link lazily and caches it for
//! every later dispatch, whatever the platform.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::capabilities::{NativeShareOutcome, Notice, SharePayload, ShareCapabilities, Viewport};
use crate::feedback::{CLIPBOARD_SUCCESS_DELAY, FACEBOOK_COPIED_DELAY, FeedbackState, FeedbackTrigger};
use crate::issuer::{CreateShareLinkRequest, HttpLinkIssuer, LinkIssuer, ShareLinkResponse};
use crate::{Platform, QuizResult, Result, ShareConfig, ShareError};

pub const POPUP_WIDTH: u32 = 600;
pub const POPUP_HEIGHT: u32 = 400;

const FACEBOOK_SHARER: &str = "https://www.facebook.com/sharer/sharer.php";
const TWITTER_INTENT: &str = "https://twitter.com/intent/tweet";

pub const COPY_FAILED_NOTICE: &str = "Impossible de copier le lien";
pub const FACEBOOK_TIP_NOTICE: &str = "💡 Astuce : Facebook ne permet pas de pré-remplir le texte.\n\
     Vous pouvez copier votre message avec le bouton \"Copier\" puis le coller dans Facebook.";

/// Link to the shared result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    /// Server-side identifier; `None` for the fallback link.
    pub uuid: Option<String>,
    pub url: String,
}

impl ShareLink {
    /// True when the server could not issue a link and the quiz page is used instead.
    pub fn is_fallback(&self) -> bool {
        self.uuid.is_none()
    }
}

/// What a dispatch ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A share popup was opened.
    PopupOpened { url: String, message_copied: bool },
    /// Message and link are in the clipboard.
    Copied,
    CopyFailed,
    NativeShared,
    NativeCancelled,
    NativeFailed,
}

/// Share session for a single quiz result.
pub struct ShareSession {
    result: QuizResult,
    origin: Url,
    issuer: Arc<dyn LinkIssuer>,
    capabilities: ShareCapabilities,
    link: RwLock<Option<ShareLink>>,
}

impl ShareSession {
    /// Session issuing links through the quiz server's HTTP API.
    pub fn new(
        result: QuizResult,
        config: &ShareConfig,
        capabilities: ShareCapabilities,
    ) -> Result<Self> {
        let issuer = HttpLinkIssuer::new(config)?;
        Ok(Self::with_issuer(
            result,
            config,
            Arc::new(issuer),
            capabilities,
        ))
    }

    pub fn with_issuer(
        result: QuizResult,
        config: &ShareConfig,
        issuer: Arc<dyn LinkIssuer>,
        capabilities: ShareCapabilities,
    ) -> Self {
        Self {
            result,
            origin: config.origin.clone(),
            issuer,
            capabilities,
            link: RwLock::new(None),
        }
    }

    pub fn result(&self) -> &QuizResult {
        &self.result
    }

    /// Link cached by an earlier successful request, if any.
    pub async fn cached_link(&self) -> Option<ShareLink> {
        self.link.read().await.clone()
    }

    /// Human-readable summary of the result.
    pub fn build_message(&self) -> String {
        let result = &self.result;
        let (emoji, status) = if result.success() {
            ("🎉", "J'ai réussi")
        } else {
            ("💪", "J'ai participé à")
        };

        format!(
            "{emoji} {status} le quiz \"{}\" !\n\n\
             📊 Score : {} points\n\
             ✅ Bonnes réponses : {}/{}\n\n\
             🎮 Viens tester tes connaissances toi aussi !\n",
            result.quiz_name(),
            result.score(),
            result.correct_answers(),
            result.total_questions(),
        )
    }

    /// The quiz's play page, used when no share link can be issued.
    pub fn fallback_link(&self) -> ShareLink {
        ShareLink {
            uuid: None,
            url: format!(
                "{}/play/{}",
                self.origin.origin().ascii_serialization(),
                self.result.rule_set_slug()
            ),
        }
    }

    /// Get the share link, creating it on first use.
    ///
    /// Never fails: when the server cannot issue a link the fallback link is
    /// returned and nothing is cached, so the next call tries again.
    pub async fn ensure_share_link(&self, platform: Option<Platform>) -> ShareLink {
        if let Some(link) = self.link.read().await.clone() {
            debug!("Reusing cached share link {}", link.url);
            return link;
        }

        let request = CreateShareLinkRequest::new(&self.result, platform);
        let created = self
            .issuer
            .create_share_link(&request)
            .await
            .and_then(|response| self.resolve(response));

        match created {
            Ok(link) => {
                let mut cached = self.link.write().await;
                // A concurrent request may have landed first; keep that one.
                if let Some(existing) = cached.as_ref() {
                    return existing.clone();
                }
                info!(
                    "Created share link for {}: {}",
                    self.result.rule_set_slug(),
                    link.url
                );
                *cached = Some(link.clone());
                link
            }
            Err(e) => {
                let fallback = self.fallback_link();
                warn!(
                    "Share link creation failed for {}, using {}: {}",
                    self.result.rule_set_slug(),
                    fallback.url,
                    e
                );
                fallback
            }
        }
    }

    fn resolve(&self, response: ShareLinkResponse) -> Result<ShareLink> {
        let url = match Url::parse(&response.url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.origin.join(&response.url).map_err(|e| {
                    ShareError::MalformedResponse(format!("bad share url '{}': {e}", response.url))
                })?
            }
            Err(e) => {
                return Err(ShareError::MalformedResponse(format!(
                    "bad share url '{}': {e}",
                    response.url
                )));
            }
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ShareError::MalformedResponse(format!(
                "share url must be http or https: {}",
                response.url
            )));
        }

        Ok(ShareLink {
            uuid: Some(response.uuid),
            url: url.into(),
        })
    }

    /// Share the result on `platform`, driving `trigger`'s feedback.
    ///
    /// Every failure is handled here; the caller only learns the outcome.
    pub async fn dispatch(&self, platform: Platform, trigger: &FeedbackTrigger) -> DispatchOutcome {
        debug!("Dispatching share to {}", platform);
        if platform.shows_loading() {
            trigger.set(FeedbackState::Loading);
        }
        match platform {
            Platform::Facebook => self.share_on_facebook(trigger).await,
            Platform::Twitter => self.share_on_twitter(trigger).await,
            Platform::Native => self.share_native(trigger).await,
            Platform::Clipboard => self.copy_to_clipboard(trigger).await,
        }
    }

    /// Run [`dispatch`](Self::dispatch) as its own task.
    pub fn spawn_dispatch(
        self: &Arc<Self>,
        platform: Platform,
        trigger: FeedbackTrigger,
    ) -> JoinHandle<DispatchOutcome> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.dispatch(platform, &trigger).await })
    }

    async fn share_on_facebook(&self, trigger: &FeedbackTrigger) -> DispatchOutcome {
        let link = self.ensure_share_link(Some(Platform::Facebook)).await;
        let message = self.build_message();
        let popup_url = facebook_share_url(&link.url);

        // Facebook ignores pre-filled text, so the message goes to the clipboard.
        let message_copied = match self.capabilities.clipboard.write_text(&message).await {
            Ok(()) => {
                trigger.hold(FeedbackState::Copied, FACEBOOK_COPIED_DELAY).await;
                self.open_popup(&popup_url, "Partager sur Facebook");
                true
            }
            Err(e) => {
                warn!("Could not copy share message before Facebook popup: {}", e);
                trigger.restore();
                self.open_popup(&popup_url, "Partager sur Facebook");
                self.capabilities
                    .notifier
                    .notify(Notice::info(FACEBOOK_TIP_NOTICE));
                false
            }
        };

        DispatchOutcome::PopupOpened {
            url: popup_url,
            message_copied,
        }
    }

    async fn share_on_twitter(&self, trigger: &FeedbackTrigger) -> DispatchOutcome {
        let link = self.ensure_share_link(Some(Platform::Twitter)).await;
        let popup_url = twitter_share_url(&self.build_message(), &link.url);

        trigger.restore();
        self.open_popup(&popup_url, "Partager sur Twitter");

        DispatchOutcome::PopupOpened {
            url: popup_url,
            message_copied: false,
        }
    }

    async fn share_native(&self, trigger: &FeedbackTrigger) -> DispatchOutcome {
        let Some(native) = self.capabilities.native_share() else {
            debug!("Native share unavailable, copying to clipboard instead");
            return self.copy_to_clipboard(trigger).await;
        };

        let link = self.ensure_share_link(Some(Platform::Native)).await;
        let payload = SharePayload {
            title: format!("Quiz {}", self.result.quiz_name()),
            text: self.build_message(),
            url: link.url,
        };

        match native.share(&payload).await {
            Ok(NativeShareOutcome::Shared) => DispatchOutcome::NativeShared,
            Ok(NativeShareOutcome::Cancelled) => {
                info!("Native share cancelled");
                DispatchOutcome::NativeCancelled
            }
            Err(e) => {
                info!("Native share did not complete: {}", e);
                DispatchOutcome::NativeFailed
            }
        }
    }

    async fn copy_to_clipboard(&self, trigger: &FeedbackTrigger) -> DispatchOutcome {
        let link = self.ensure_share_link(Some(Platform::Clipboard)).await;
        let text = format!("{}\n{}", self.build_message(), link.url);

        match self.capabilities.clipboard.write_text(&text).await {
            Ok(()) => {
                trigger.hold(FeedbackState::Success, CLIPBOARD_SUCCESS_DELAY).await;
                DispatchOutcome::Copied
            }
            Err(e) => {
                warn!("Could not copy share text: {}", e);
                self.capabilities
                    .notifier
                    .notify(Notice::alert(COPY_FAILED_NOTICE));
                trigger.restore();
                DispatchOutcome::CopyFailed
            }
        }
    }

    fn open_popup(&self, url: &str, title: &str) {
        let features = popup_features(self.capabilities.popup.viewport());
        self.capabilities.popup.open(url, title, &features);
    }
}

impl std::fmt::Debug for ShareSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareSession")
            .field("result", &self.result)
            .field("origin", &self.origin.as_str())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

pub fn facebook_share_url(url: &str) -> String {
    format!("{}?u={}", FACEBOOK_SHARER, urlencoding::encode(url))
}

pub fn twitter_share_url(message: &str, url: &str) -> String {
    format!(
        "{}?text={}&url={}",
        TWITTER_INTENT,
        urlencoding::encode(message),
        urlencoding::encode(url)
    )
}

/// Window features for a chromeless popup centered in `viewport`.
pub fn popup_features(viewport: Viewport) -> String {
    let left = ((i64::from(viewport.width) - i64::from(POPUP_WIDTH)) / 2).max(0);
    let top = ((i64::from(viewport.height) - i64::from(POPUP_HEIGHT)) / 2).max(0);
    format!(
        "width={POPUP_WIDTH},height={POPUP_HEIGHT},left={left},top={top},toolbar=0,menubar=0,location=0,status=0"
    )
}
