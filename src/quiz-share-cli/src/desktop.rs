//! Desktop implementations of the share capabilities.

use anyhow::{Context, Result};
use async_trait::async_trait;
use quiz_share::{ClipboardWriter, Notice, NoticeLevel, Notifier, PopupOpener, ShareError};
use tracing::{debug, warn};

/// System clipboard through `arboard`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_text(&self, text: &str) -> quiz_share::Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ShareError::Clipboard(format!("clipboard unavailable: {e}")))?;
            clipboard
                .set_text(text)
                .map_err(|e| ShareError::Clipboard(e.to_string()))
        })
        .await
        .map_err(|e| ShareError::Clipboard(format!("clipboard task failed: {e}")))??;

        debug!("Copied share text to clipboard");
        Ok(())
    }
}

/// Opens share popups as browser tabs. Window features do not apply.
#[derive(Debug, Default)]
pub struct BrowserPopup;

impl PopupOpener for BrowserPopup {
    fn open(&self, url: &str, title: &str, _features: &str) {
        if let Err(e) = open_in_browser(url) {
            warn!("Could not open '{}' in the browser: {:#}", title, e);
            eprintln!("{title}: {url}");
        }
    }
}

/// Prints notices to stderr.
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Alert => eprintln!("error: {}", notice.message),
        }
    }
}

/// Only http(s) URLs without credentials are handed to the OS.
pub fn validate_browser_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url).context("invalid URL")?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            anyhow::bail!(
                "refusing to open URL with scheme '{scheme}': only http and https are allowed"
            );
        }
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        anyhow::bail!("refusing to open URL with embedded credentials");
    }

    Ok(parsed)
}

fn open_in_browser(url: &str) -> Result<()> {
    let url = validate_browser_url(url)?;

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = std::process::Command::new("open");
        command.arg("--");
        command
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = std::process::Command::new("rundll32");
        command.arg("url.dll,FileProtocolHandler");
        command
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = std::process::Command::new("xdg-open");

    command
        .arg(url.as_str())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .context("failed to open browser")?;

    Ok(())
}
