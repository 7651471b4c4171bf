//! Share link issuance.
//!
//! The quiz server records each shared result and hands back a short link.
//! [`LinkIssuer`] is the seam; [`HttpLinkIssuer`] talks to the real endpoint.

use async_trait::async_trait;
use quiz_share_common::{create_client, truncate_with_ellipsis};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{Platform, QuizResult, Result, ShareConfig, ShareError};

/// Error bodies are kept to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Reading an error body stops after this many bytes.
const MAX_ERROR_BODY_BYTES: usize = 4096;

/// Body of `POST /api/quiz/create-share-link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShareLinkRequest {
    pub rule_set: String,
    pub total_score: u32,
    pub total_correct_answers: u32,
    pub total_questions: u32,
    pub success: bool,
    pub perfect_bonus: bool,
    pub combo_max: u32,
    pub platform: Option<String>,
}

impl CreateShareLinkRequest {
    pub fn new(result: &QuizResult, platform: Option<Platform>) -> Self {
        Self {
            rule_set: result.rule_set_slug().to_string(),
            total_score: result.score(),
            total_correct_answers: result.correct_answers(),
            total_questions: result.total_questions(),
            success: result.success(),
            perfect_bonus: result.perfect_bonus(),
            combo_max: result.combo_max(),
            platform: platform.map(|p| p.wire_name().to_string()),
        }
    }
}

/// Successful response from the share link endpoint.
///
/// `url` may be absolute or relative to the site origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    pub uuid: String,
    pub url: String,
}

/// Something that can issue share links for quiz results.
#[async_trait]
pub trait LinkIssuer: Send + Sync {
    async fn create_share_link(&self, request: &CreateShareLinkRequest)
    -> Result<ShareLinkResponse>;
}

/// Issues share links through the quiz server's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpLinkIssuer {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpLinkIssuer {
    pub fn new(config: &ShareConfig) -> Result<Self> {
        let client = create_client(config.request_timeout()).map_err(ShareError::Config)?;
        Ok(Self {
            endpoint: config.endpoint_url()?,
            client,
        })
    }
}

#[async_trait]
impl LinkIssuer for HttpLinkIssuer {
    async fn create_share_link(
        &self,
        request: &CreateShareLinkRequest,
    ) -> Result<ShareLinkResponse> {
        debug!(
            "Requesting share link for {} ({:?})",
            request.rule_set, request.platform
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShareError::Api {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body = response.bytes().await?;
        let link: ShareLinkResponse = serde_json::from_slice(&body)?;

        if link.uuid.is_empty() || link.url.is_empty() {
            return Err(ShareError::MalformedResponse(
                "empty uuid or url in share link response".into(),
            ));
        }

        Ok(link)
    }
}

async fn error_body(mut response: reqwest::Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    let text = String::from_utf8_lossy(&buf);
    truncate_with_ellipsis(&text, MAX_ERROR_BODY_CHARS).into_owned()
}
