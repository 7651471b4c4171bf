use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_share::{
    ClipboardWriter, DispatchOutcome, FeedbackTrigger, Notice, Notifier, Platform, PopupOpener,
    QuizResult, ShareCapabilities, ShareConfig, ShareError, ShareSession,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    clipboard: Mutex<Vec<String>>,
    popups: Mutex<Vec<String>>,
    notices: Mutex<Vec<Notice>>,
    clipboard_fails: bool,
}

#[async_trait]
impl ClipboardWriter for Recorder {
    async fn write_text(&self, text: &str) -> quiz_share::Result<()> {
        if self.clipboard_fails {
            return Err(ShareError::Clipboard("not allowed".into()));
        }
        self.clipboard.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl PopupOpener for Recorder {
    fn open(&self, url: &str, _title: &str, _features: &str) {
        self.popups.lock().unwrap().push(url.to_string());
    }
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

fn session(server: &MockServer, recorder: Arc<Recorder>) -> ShareSession {
    let config = ShareConfig::new(&server.uri()).unwrap();
    let result = QuizResult::new("capitales", "Capitales", 850, 8, 10, true)
        .unwrap()
        .with_perfect_bonus(true)
        .with_combo_max(5);
    let capabilities = ShareCapabilities::new(recorder.clone(), recorder.clone(), recorder);
    ShareSession::new(result, &config, capabilities).unwrap()
}

#[tokio::test]
async fn test_second_call_reuses_server_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/create-share-link"))
        .and(body_partial_json(json!({
            "rule_set": "capitales",
            "total_score": 850,
            "perfect_bonus": true,
            "combo_max": 5,
            "platform": "twitter"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "9b2e7c",
            "url": "/share/9b2e7c"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server, Arc::new(Recorder::default()));

    let first = session.ensure_share_link(Some(Platform::Twitter)).await;
    let second = session.ensure_share_link(Some(Platform::Facebook)).await;

    assert_eq!(first.url, format!("{}/share/9b2e7c", server.uri()));
    assert_eq!(first.uuid.as_deref(), Some("9b2e7c"));
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_server_error_falls_back_to_play_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let session = session(&server, Arc::new(Recorder::default()));

    let link = session.ensure_share_link(None).await;
    assert_eq!(link.url, format!("{}/play/capitales", server.uri()));
    assert_eq!(link.uuid, None);

    // Nothing cached, so the next dispatch asks again.
    let again = session.ensure_share_link(None).await;
    assert_eq!(again, link);
}

#[tokio::test]
async fn test_twitter_dispatch_with_garbage_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let recorder = Arc::new(Recorder::default());
    let session = session(&server, recorder.clone());
    let trigger = FeedbackTrigger::new("Twitter");

    let outcome = session.dispatch(Platform::Twitter, &trigger).await;

    let popups = recorder.popups.lock().unwrap().clone();
    assert_eq!(popups.len(), 1);
    let encoded_fallback = urlencoding::encode(&format!("{}/play/capitales", server.uri())).into_owned();
    assert!(popups[0].ends_with(&format!("&url={encoded_fallback}")));
    assert!(matches!(outcome, DispatchOutcome::PopupOpened { .. }));
    assert!(trigger.is_enabled());
}

#[tokio::test]
async fn test_facebook_dispatch_without_clipboard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "77aa",
            "url": "/share/77aa"
        })))
        .mount(&server)
        .await;

    let recorder = Arc::new(Recorder {
        clipboard_fails: true,
        ..Default::default()
    });
    let session = session(&server, recorder.clone());
    let trigger = FeedbackTrigger::new("Facebook");

    session.dispatch(Platform::Facebook, &trigger).await;

    let popups = recorder.popups.lock().unwrap().clone();
    let share_url = urlencoding::encode(&format!("{}/share/77aa", server.uri())).into_owned();
    assert_eq!(
        popups,
        vec![format!(
            "https://www.facebook.com/sharer/sharer.php?u={share_url}"
        )]
    );
    assert_eq!(recorder.notices.lock().unwrap().len(), 1);
}
