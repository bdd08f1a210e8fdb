//! Request dispatcher — classifies inbound requests, drives the
//! permission-gated attribute flow, and records every non-probe request.
//!
//! Flow:
//! 1. Liveness probes short-circuit with an empty acknowledgment (no audit)
//! 2. Classify by request kind → minimal, can-fulfill, or attribute-gated
//! 3. Build an audit record and hand it to the sink, best-effort

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::audit::{AuditRecord, AuditSink};
use crate::config::SkillConfig;
use crate::dispatch::render;
use crate::error::{AuditError, Error, QueueError, RequestError};
use crate::protocol::request::InboundRequest;
use crate::protocol::response::{CanFulfillIntent, CanFulfillVerdict, OutboundResponse};
use crate::protocol::RequestKind;
use crate::providers::{AttributeOutcome, AttributeProvider, ProgressiveNotifier};

/// The single intent this skill can fulfill.
pub const EMAIL_CHECK_INTENT: &str = "EmailCheckIntent";

/// Early acknowledgment spoken while the attribute is being read back.
const PROGRESS_MESSAGE: &str = "I'm working on it";

/// Bound on the attribute-provider call.
const ATTRIBUTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on the early-acknowledgment send.
const PROGRESS_TIMEOUT: Duration = Duration::from_secs(2);

/// Bound on the audit send.
const AUDIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Dispatches inbound requests to responses.
pub struct RequestDispatcher {
    config: SkillConfig,
    attributes: Arc<dyn AttributeProvider>,
    notifier: Arc<dyn ProgressiveNotifier>,
    audit: Arc<AuditSink>,
}

impl RequestDispatcher {
    pub fn new(
        config: SkillConfig,
        attributes: Arc<dyn AttributeProvider>,
        notifier: Arc<dyn ProgressiveNotifier>,
        audit: Arc<AuditSink>,
    ) -> Self {
        Self {
            config,
            attributes,
            notifier,
            audit,
        }
    }

    /// Handle one inbound request.
    ///
    /// Expected protocol states never fail; only caller-input errors and
    /// fatal configuration defects cross this boundary.
    pub async fn handle(&self, request: InboundRequest) -> Result<OutboundResponse, Error> {
        let started = Instant::now();

        if request.is_probe() {
            // Probes are infrastructure noise, not user interactions
            info!("Ping request");
            return Ok(OutboundResponse::empty());
        }

        let kind = request.kind();
        let action_log = match kind {
            RequestKind::SkillPermissionAccepted => "Received skill permission accepted event",
            RequestKind::SkillPermissionChanged => "Received skill permission changed event",
            RequestKind::SkillAccountLinked => "Received skill account linked event",
            RequestKind::SkillEnabled => "Received skill enabled event",
            RequestKind::SkillDisabled => "Received skill disabled event",
            RequestKind::CanFulfillIntent => "Processing CanFulfill request",
            RequestKind::Launch => "Processing launch request",
            RequestKind::Intent => "Processing intent request",
            RequestKind::SessionEnded | RequestKind::Unknown => "Received unhandled request type",
        };
        info!("{action_log}");

        let response = match kind {
            RequestKind::CanFulfillIntent => self.can_fulfill_response(request.intent_name()),
            RequestKind::Launch | RequestKind::Intent => {
                self.attribute_gated_response(&request).await?
            }
            _ => OutboundResponse::empty(),
        };

        let verdict = response
            .response
            .can_fulfill_intent
            .as_ref()
            .map(|c| c.can_fulfill);
        let record = AuditRecord::from_request(&request, started.elapsed(), verdict)
            .with_pre_action_log(action_log);
        self.send_audit(record).await;

        info!(duration_ms = started.elapsed().as_millis() as u64, "Request handled");
        Ok(response)
    }

    /// Capability probe: YES iff the named intent is the one supported
    /// intent, case-insensitive. No attribute retrieval is attempted.
    fn can_fulfill_response(&self, intent_name: Option<&str>) -> OutboundResponse {
        let verdict = match intent_name {
            Some(name) if name.eq_ignore_ascii_case(EMAIL_CHECK_INTENT) => CanFulfillVerdict::Yes,
            _ => CanFulfillVerdict::No,
        };
        let mut response = OutboundResponse::empty();
        response.response.can_fulfill_intent = Some(CanFulfillIntent {
            can_fulfill: verdict,
        });
        response
    }

    /// The attribute-gated flow: permission check, attribute retrieval, and
    /// speech/card/display construction.
    async fn attribute_gated_response(
        &self,
        request: &InboundRequest,
    ) -> Result<OutboundResponse, Error> {
        let system = request
            .system()
            .ok_or_else(|| RequestError::missing("Context.System"))?;
        let endpoint = nonblank(system.api_endpoint.as_deref())
            .ok_or_else(|| RequestError::missing("Context.System.ApiEndpoint"))?;
        let token = nonblank(system.api_access_token.as_deref())
            .ok_or_else(|| RequestError::missing("Context.System.ApiAccessToken"))?;

        let outcome = match tokio::time::timeout(
            ATTRIBUTE_TIMEOUT,
            self.attributes.get_attribute(endpoint, token),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => AttributeOutcome::Failed {
                reason: format!("attribute lookup exceeded {ATTRIBUTE_TIMEOUT:?}"),
            },
        };

        // Denial is an expected end-user state; anything else unexpected
        // degrades to not-granted so the conversation stays coherent.
        let email = match outcome {
            AttributeOutcome::Granted(email) => Some(email),
            AttributeOutcome::Denied { status } => {
                info!(status, "User has not granted access to their email address");
                None
            }
            AttributeOutcome::Failed { reason } => {
                error!(%reason, "Unexpected error getting user email");
                None
            }
        };

        let supports_display = request.supports_display();
        let mut response = OutboundResponse::empty();

        match email {
            Some(email) => {
                self.send_progress(request).await;

                response.response.output_speech = Some(render::granted_speech(&email));
                response.response.card = Some(render::email_card(&email));
                if supports_display {
                    response.response.directives = Some(render::email_display_directives(
                        &self.config.image_root_path,
                        &email,
                    )?);
                }
            }
            None => {
                response.response.output_speech = Some(render::permission_speech());
                response.response.card = Some(render::permission_card());
                if supports_display {
                    response.response.directives = Some(render::permission_display_directives(
                        &self.config.image_root_path,
                    )?);
                }
            }
        }

        // This skill holds no multi-turn state
        response.response.should_end_session = Some(true);
        Ok(response)
    }

    /// Best-effort early acknowledgment. Failure is logged and ignored.
    async fn send_progress(&self, request: &InboundRequest) {
        match tokio::time::timeout(
            PROGRESS_TIMEOUT,
            self.notifier.notify(request, PROGRESS_MESSAGE),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => error!(%reason, "Error sending progressive response"),
            Err(_) => warn!("Progressive response timed out"),
        }
    }

    /// Best-effort audit delivery. Failure is logged, never escalated; a
    /// non-resolvable queue name is a deployment defect and logged as such.
    async fn send_audit(&self, record: AuditRecord) {
        match tokio::time::timeout(AUDIT_TIMEOUT, self.audit.send(record)).await {
            Ok(Ok(())) => {}
            Ok(Err(AuditError::Resolve(source)))
                if matches!(&*source, QueueError::DoesNotExist { .. }) =>
            {
                error!(error = %source, "Audit queue is misconfigured");
            }
            Ok(Err(e)) => error!(error = %e, "Failed to send audit record"),
            Err(_) => warn!("Audit send timed out"),
        }
    }
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::audit::{EndpointCache, MemoryEndpointCache, QueueClient};
    use crate::config::QueueConfig;
    use crate::error::QueueError;
    use crate::protocol::response::{Card, Directive, OutputSpeech};

    const TEST_EMAIL: &str = "myaddress@email.com";
    const IMAGE_ROOT: &str = "https://img.example.com/emailchecker/";

    /// Attribute provider with a scripted outcome, counting calls.
    struct ScriptedProvider {
        outcome: AttributeOutcome,
        calls: AtomicUsize,
        hang: Option<Duration>,
    }

    impl ScriptedProvider {
        fn granted() -> Self {
            Self::with(AttributeOutcome::Granted(TEST_EMAIL.into()))
        }

        fn denied() -> Self {
            Self::with(AttributeOutcome::Denied { status: 403 })
        }

        fn failing() -> Self {
            Self::with(AttributeOutcome::Failed {
                reason: "boom".into(),
            })
        }

        /// Stalls past the dispatcher's attribute timeout before answering.
        fn hanging() -> Self {
            Self {
                hang: Some(ATTRIBUTE_TIMEOUT * 10),
                ..Self::granted()
            }
        }

        fn with(outcome: AttributeOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                hang: None,
            }
        }
    }

    #[async_trait]
    impl AttributeProvider for ScriptedProvider {
        async fn get_attribute(&self, _endpoint: &str, _token: &str) -> AttributeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.hang {
                tokio::time::sleep(delay).await;
            }
            self.outcome.clone()
        }
    }

    /// Notifier that counts calls and optionally fails.
    struct MockNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockNotifier {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ProgressiveNotifier for MockNotifier {
        async fn notify(&self, _request: &InboundRequest, _text: &str) -> Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err("notifier offline".into())
            } else {
                Ok(())
            }
        }
    }

    /// Queue that records sent payloads; the sink is otherwise real.
    struct RecordingQueue {
        sends: tokio::sync::Mutex<Vec<String>>,
        fail_sends: bool,
        hang_sends: Option<Duration>,
    }

    impl RecordingQueue {
        fn new() -> Self {
            Self {
                sends: tokio::sync::Mutex::new(Vec::new()),
                fail_sends: false,
                hang_sends: None,
            }
        }

        fn failing() -> Self {
            Self {
                fail_sends: true,
                ..Self::new()
            }
        }

        /// Stalls every send past the dispatcher's audit timeout.
        fn hanging() -> Self {
            Self {
                hang_sends: Some(AUDIT_TIMEOUT * 10),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl QueueClient for RecordingQueue {
        async fn resolve_queue_url(&self, _name: &str) -> Result<String, QueueError> {
            Ok("https://queue.example.com/1/q".into())
        }

        async fn send(&self, _queue_url: &str, payload: &str) -> Result<(), QueueError> {
            if let Some(delay) = self.hang_sends {
                tokio::time::sleep(delay).await;
            }
            if self.fail_sends {
                return Err(QueueError::Http("connection reset".into()));
            }
            self.sends.lock().await.push(payload.to_string());
            Ok(())
        }
    }

    struct Fixture {
        dispatcher: RequestDispatcher,
        provider: Arc<ScriptedProvider>,
        notifier: Arc<MockNotifier>,
        queue: Arc<RecordingQueue>,
    }

    fn fixture(provider: ScriptedProvider) -> Fixture {
        fixture_with(provider, MockNotifier::new(), RecordingQueue::new())
    }

    fn fixture_with(
        provider: ScriptedProvider,
        notifier: MockNotifier,
        queue: RecordingQueue,
    ) -> Fixture {
        let config = SkillConfig {
            image_root_path: IMAGE_ROOT.into(),
            queue: QueueConfig {
                queue_name: Some("dev-sessionqueue".into()),
                queue_url: None,
                region: "us-east-1".into(),
                cache_instance: "emailchecker".into(),
                service_endpoint: None,
            },
            bind_addr: "127.0.0.1:0".into(),
        };
        let provider = Arc::new(provider);
        let notifier = Arc::new(notifier);
        let queue = Arc::new(queue);
        let cache: Arc<dyn EndpointCache> = Arc::new(MemoryEndpointCache::new());
        let audit = Arc::new(AuditSink::new(&config.queue, queue.clone(), cache).unwrap());
        let dispatcher = RequestDispatcher::new(
            config,
            provider.clone(),
            notifier.clone(),
            audit,
        );
        Fixture {
            dispatcher,
            provider,
            notifier,
            queue,
        }
    }

    fn request(kind: &str) -> InboundRequest {
        request_json(kind, true, false)
    }

    fn request_json(kind: &str, with_auth: bool, with_display: bool) -> InboundRequest {
        let system = if with_auth {
            format!(
                r#"{{"apiEndpoint":"https://api.amazonalexa.com","apiAccessToken":"TOKEN","device":{{"supportedInterfaces":{{{}}}}}}}"#,
                if with_display { r#""Display":{}"# } else { "" }
            )
        } else {
            r#"{"device":{"supportedInterfaces":{}}}"#.to_string()
        };
        let json = format!(
            r#"{{
                "version": "1.0",
                "session": {{"new": true, "sessionId": "sess-1", "user": {{"userId": "user-1"}}}},
                "context": {{"System": {system}}},
                "request": {{
                    "type": "{kind}",
                    "requestId": "req-1",
                    "timestamp": "2026-01-10T12:00:00Z",
                    "locale": "en-US"
                }}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn can_fulfill_request(intent: &str) -> InboundRequest {
        let json = format!(
            r#"{{
                "version": "1.0",
                "request": {{
                    "type": "CanFulfillIntentRequest",
                    "requestId": "req-cf",
                    "locale": "en-US",
                    "intent": {{"name": "{intent}"}}
                }}
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    // ── Probe handling ──────────────────────────────────────────────

    #[tokio::test]
    async fn probe_returns_response_without_audit() {
        let f = fixture(ScriptedProvider::granted());
        let probe: InboundRequest = serde_json::from_str(r#"{"version":"ping"}"#).unwrap();

        let resp = f.dispatcher.handle(probe).await.unwrap();
        assert!(resp.response.output_speech.is_none());
        assert!(f.queue.sends.lock().await.is_empty());
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 0);
    }

    // ── Can-fulfill classification ──────────────────────────────────

    #[tokio::test]
    async fn can_fulfill_yes_for_supported_intent() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f
            .dispatcher
            .handle(can_fulfill_request("EmailCheckIntent"))
            .await
            .unwrap();
        assert_eq!(
            resp.response.can_fulfill_intent.unwrap().can_fulfill,
            CanFulfillVerdict::Yes
        );
        // No attribute retrieval for capability probes
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn can_fulfill_match_is_case_insensitive() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f
            .dispatcher
            .handle(can_fulfill_request("emailcheckintent"))
            .await
            .unwrap();
        assert_eq!(
            resp.response.can_fulfill_intent.unwrap().can_fulfill,
            CanFulfillVerdict::Yes
        );
    }

    #[tokio::test]
    async fn can_fulfill_no_for_other_intents() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f
            .dispatcher
            .handle(can_fulfill_request("WeatherIntent"))
            .await
            .unwrap();
        assert_eq!(
            resp.response.can_fulfill_intent.unwrap().can_fulfill,
            CanFulfillVerdict::No
        );
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn can_fulfill_no_when_intent_missing() {
        let f = fixture(ScriptedProvider::granted());
        let req: InboundRequest = serde_json::from_str(
            r#"{"version":"1.0","request":{"type":"CanFulfillIntentRequest","requestId":"r"}}"#,
        )
        .unwrap();
        let resp = f.dispatcher.handle(req).await.unwrap();
        assert_eq!(
            resp.response.can_fulfill_intent.unwrap().can_fulfill,
            CanFulfillVerdict::No
        );
    }

    #[tokio::test]
    async fn can_fulfill_verdict_lands_in_audit_record() {
        let f = fixture(ScriptedProvider::granted());
        f.dispatcher
            .handle(can_fulfill_request("EmailCheckIntent"))
            .await
            .unwrap();

        let sends = f.queue.sends.lock().await;
        assert_eq!(sends.len(), 1);
        let record: serde_json::Value = serde_json::from_str(&sends[0]).unwrap();
        assert_eq!(record["canFulfill"], "YES");
        assert_eq!(record["requestType"], "CanFulfillIntent");
    }

    // ── Caller-input validation ─────────────────────────────────────

    #[tokio::test]
    async fn missing_authorization_fields_fail_before_any_call() {
        let f = fixture(ScriptedProvider::granted());
        let req = request_json("LaunchRequest", false, false);

        let err = f.dispatcher.handle(req).await.unwrap_err();
        assert!(matches!(err, Error::Request(_)));
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_token_fails_as_caller_input_error() {
        let f = fixture(ScriptedProvider::granted());
        let json = r#"{
            "version": "1.0",
            "context": {"System": {"apiEndpoint": "https://api.amazonalexa.com", "apiAccessToken": "  "}},
            "request": {"type": "IntentRequest", "intent": {"name": "EmailCheckIntent"}}
        }"#;
        let req: InboundRequest = serde_json::from_str(json).unwrap();
        let err = f.dispatcher.handle(req).await.unwrap_err();
        assert!(matches!(err, Error::Request(RequestError::MissingField { field }) if field.contains("ApiAccessToken")));
    }

    // ── Granted branch ──────────────────────────────────────────────

    #[tokio::test]
    async fn granted_response_reads_email_in_two_segments() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f.dispatcher.handle(request("IntentRequest")).await.unwrap();

        let Some(OutputSpeech::Ssml { ssml }) = resp.response.output_speech else {
            panic!("Expected SSML speech");
        };
        assert!(ssml.contains("myaddress"));
        assert!(ssml.contains("email.com"));

        let Some(Card::Simple { content, .. }) = resp.response.card else {
            panic!("Expected simple card");
        };
        assert!(content.contains(TEST_EMAIL));
        assert_eq!(resp.response.should_end_session, Some(true));
        // No display support advertised → no directives
        assert!(resp.response.directives.is_none());
    }

    #[tokio::test]
    async fn granted_sends_progressive_response() {
        let f = fixture(ScriptedProvider::granted());
        f.dispatcher.handle(request("LaunchRequest")).await.unwrap();
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn progressive_failure_does_not_fail_response() {
        let f = fixture_with(
            ScriptedProvider::granted(),
            MockNotifier::failing(),
            RecordingQueue::new(),
        );
        let resp = f.dispatcher.handle(request("LaunchRequest")).await.unwrap();
        assert!(resp.response.card.is_some());
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn granted_with_display_emits_template_bundle() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f
            .dispatcher
            .handle(request_json("IntentRequest", true, true))
            .await
            .unwrap();

        let directives = resp.response.directives.unwrap();
        assert_eq!(directives.len(), 1);
        let Directive::RenderTemplate { template } = &directives[0] else {
            panic!("Expected render template");
        };
        assert_eq!(template.token, "user_email");
    }

    // ── Denied / degraded branch ────────────────────────────────────

    #[tokio::test]
    async fn denied_response_asks_for_permission() {
        let f = fixture(ScriptedProvider::denied());
        let resp = f.dispatcher.handle(request("LaunchRequest")).await.unwrap();

        let Some(OutputSpeech::Plain { ref text }) = resp.response.output_speech else {
            panic!("Expected plain speech");
        };
        assert!(text.contains("needs permission"));
        assert!(!text.contains(TEST_EMAIL));
        assert!(matches!(
            resp.response.card,
            Some(Card::AskForPermissionsConsent { .. })
        ));
        assert_eq!(resp.response.should_end_session, Some(true));

        // No early acknowledgment and no email anywhere in the payload
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 0);
        let payload = serde_json::to_string(&resp).unwrap();
        assert!(!payload.contains(TEST_EMAIL));
    }

    #[tokio::test]
    async fn denied_with_display_emits_explanation_then_hint() {
        let f = fixture(ScriptedProvider::denied());
        let resp = f
            .dispatcher
            .handle(request_json("LaunchRequest", true, true))
            .await
            .unwrap();

        let directives = resp.response.directives.unwrap();
        assert_eq!(directives.len(), 2);
        assert!(
            matches!(&directives[0], Directive::RenderTemplate { template } if template.token == "no_permission")
        );
        assert!(matches!(&directives[1], Directive::Hint { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_provider_times_out_into_permission_response() {
        let f = fixture(ScriptedProvider::hanging());
        let resp = f.dispatcher.handle(request("IntentRequest")).await.unwrap();

        // The stalled lookup behaves exactly like a failed one
        assert!(matches!(
            resp.response.card,
            Some(Card::AskForPermissionsConsent { .. })
        ));
        assert_eq!(resp.response.should_end_session, Some(true));
        let payload = serde_json::to_string(&resp).unwrap();
        assert!(!payload.contains(TEST_EMAIL));
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_permission_response() {
        let f = fixture(ScriptedProvider::failing());
        let resp = f.dispatcher.handle(request("IntentRequest")).await.unwrap();

        assert!(matches!(
            resp.response.card,
            Some(Card::AskForPermissionsConsent { .. })
        ));
        assert_eq!(resp.response.should_end_session, Some(true));
    }

    // ── Audit side-channel ──────────────────────────────────────────

    #[tokio::test]
    async fn every_non_probe_request_is_audited() {
        let f = fixture(ScriptedProvider::denied());
        for kind in [
            "LaunchRequest",
            "IntentRequest",
            "AlexaSkillEvent.SkillEnabled",
            "AlexaSkillEvent.SkillDisabled",
            "AlexaSkillEvent.SkillPermissionAccepted",
        ] {
            f.dispatcher.handle(request(kind)).await.unwrap();
        }
        assert_eq!(f.queue.sends.lock().await.len(), 5);
    }

    #[tokio::test]
    async fn audit_record_carries_classification_log() {
        let f = fixture(ScriptedProvider::denied());
        f.dispatcher.handle(request("LaunchRequest")).await.unwrap();

        let sends = f.queue.sends.lock().await;
        let record: serde_json::Value = serde_json::from_str(&sends[0]).unwrap();
        assert_eq!(record["preNodeActionLog"], "Processing launch request");
        assert_eq!(record["requestType"], "Launch");
        assert_eq!(record["sessionId"], "sess-1");
    }

    #[tokio::test(start_paused = true)]
    async fn hung_audit_send_does_not_block_dispatch() {
        let f = fixture_with(
            ScriptedProvider::granted(),
            MockNotifier::new(),
            RecordingQueue::hanging(),
        );
        let resp = f.dispatcher.handle(request("IntentRequest")).await.unwrap();

        // The primary response comes back intact despite the stalled sink
        assert!(matches!(resp.response.card, Some(Card::Simple { .. })));
        assert!(f.queue.sends.lock().await.is_empty());
    }

    #[tokio::test]
    async fn audit_failure_does_not_fail_dispatch() {
        let f = fixture_with(
            ScriptedProvider::granted(),
            MockNotifier::new(),
            RecordingQueue::failing(),
        );
        let resp = f.dispatcher.handle(request("IntentRequest")).await.unwrap();
        assert!(resp.response.card.is_some());
    }

    #[tokio::test]
    async fn skill_events_return_minimal_response() {
        let f = fixture(ScriptedProvider::granted());
        let resp = f
            .dispatcher
            .handle(request("AlexaSkillEvent.SkillAccountLinked"))
            .await
            .unwrap();
        assert!(resp.response.output_speech.is_none());
        assert!(resp.response.card.is_none());
        assert_eq!(f.provider.calls.load(Ordering::SeqCst), 0);
    }
}
