//! Audit record — immutable summary of one request/response pair.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::request::InboundRequest;
use crate::protocol::{CanFulfillVerdict, RequestKind};

/// Client tag stamped on every record.
const CLIENT_NAME: &str = "Alexa";

/// Title identity stamped on every record.
const TITLE_ID: &str = "emailaddresschecker";
const TITLE_VERSION: &str = "1.0";

/// Classified request type carried by the audit record. Coarser than the wire
/// request kinds; consumers only distinguish the three dialog-bearing kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditRequestType {
    Unknown,
    Launch,
    Intent,
    CanFulfillIntent,
}

impl From<RequestKind> for AuditRequestType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Launch => Self::Launch,
            RequestKind::Intent => Self::Intent,
            RequestKind::CanFulfillIntent => Self::CanFulfillIntent,
            _ => Self::Unknown,
        }
    }
}

/// Write-once summary of a handled request. Constructed immediately after
/// response construction, handed to the audit sink, never read again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub client: String,
    /// Generated when absent (can-fulfill probes carry no user id).
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "titleId", skip_serializing_if = "Option::is_none")]
    pub title_id: Option<String>,
    #[serde(rename = "titleVersion", skip_serializing_if = "Option::is_none")]
    pub title_version: Option<String>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(rename = "intentName", skip_serializing_if = "Option::is_none")]
    pub intent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<HashMap<String, String>>,
    pub time: DateTime<Utc>,
    #[serde(rename = "isNewSession", skip_serializing_if = "Option::is_none")]
    pub is_new_session: Option<bool>,
    #[serde(rename = "processDuration")]
    pub process_duration_ms: u64,
    #[serde(rename = "preNodeActionLog", skip_serializing_if = "Option::is_none")]
    pub pre_action_log: Option<String>,
    #[serde(rename = "postNodeActionLog", skip_serializing_if = "Option::is_none")]
    pub post_action_log: Option<String>,
    #[serde(rename = "requestType")]
    pub request_type: AuditRequestType,
    #[serde(rename = "canFulfill", skip_serializing_if = "Option::is_none")]
    pub can_fulfill: Option<CanFulfillVerdict>,
}

impl AuditRecord {
    /// Summarize an inbound request. Missing identifiers are replaced with
    /// generated UUIDs; a missing timestamp defaults to now.
    pub fn from_request(
        request: &InboundRequest,
        duration: Duration,
        can_fulfill: Option<CanFulfillVerdict>,
    ) -> Self {
        let session = request.session.as_ref();
        let body = request.request.as_ref();

        let session_id = session
            .and_then(|s| s.session_id.clone())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let user_id = session
            .and_then(|s| s.user.as_ref())
            .and_then(|u| u.user_id.clone())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let request_id = body
            .and_then(|r| r.request_id.clone())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| Some(Uuid::new_v4().to_string()));

        Self {
            session_id,
            client: CLIENT_NAME.to_string(),
            user_id,
            locale: body.and_then(|r| r.locale.clone()),
            title_id: Some(TITLE_ID.to_string()),
            title_version: Some(TITLE_VERSION.to_string()),
            request_id,
            intent_name: request.intent_name().map(str::to_string),
            slots: None,
            time: body.and_then(|r| r.timestamp).unwrap_or_else(Utc::now),
            is_new_session: session.and_then(|s| s.new),
            process_duration_ms: duration.as_millis() as u64,
            pre_action_log: None,
            post_action_log: None,
            request_type: AuditRequestType::from(request.kind()),
            can_fulfill,
        }
    }

    /// Attach the dispatcher's classification log line.
    pub fn with_pre_action_log(mut self, line: impl Into<String>) -> Self {
        self.pre_action_log = Some(line.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_request() -> InboundRequest {
        serde_json::from_str(
            r#"{
                "version": "1.0",
                "session": {"new": true, "sessionId": "sess-1", "user": {"userId": "user-1"}},
                "request": {
                    "type": "IntentRequest",
                    "requestId": "req-1",
                    "timestamp": "2026-01-10T12:00:00Z",
                    "locale": "en-US",
                    "intent": {"name": "EmailCheckIntent"}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn record_carries_request_identity() {
        let record =
            AuditRecord::from_request(&intent_request(), Duration::from_millis(42), None);
        assert_eq!(record.session_id, "sess-1");
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.request_id.as_deref(), Some("req-1"));
        assert_eq!(record.locale.as_deref(), Some("en-US"));
        assert_eq!(record.intent_name.as_deref(), Some("EmailCheckIntent"));
        assert_eq!(record.is_new_session, Some(true));
        assert_eq!(record.process_duration_ms, 42);
        assert_eq!(record.request_type, AuditRequestType::Intent);
        assert!(record.can_fulfill.is_none());
    }

    #[test]
    fn missing_identifiers_are_generated() {
        let request: InboundRequest =
            serde_json::from_str(r#"{"version":"1.0","request":{"type":"CanFulfillIntentRequest"}}"#)
                .unwrap();
        let record = AuditRecord::from_request(
            &request,
            Duration::from_millis(5),
            Some(CanFulfillVerdict::No),
        );
        assert!(Uuid::parse_str(&record.session_id).is_ok());
        assert!(Uuid::parse_str(&record.user_id).is_ok());
        assert!(Uuid::parse_str(record.request_id.as_deref().unwrap()).is_ok());
        assert_eq!(record.request_type, AuditRequestType::CanFulfillIntent);
        assert_eq!(record.can_fulfill, Some(CanFulfillVerdict::No));
    }

    #[test]
    fn event_requests_classify_as_unknown() {
        let request: InboundRequest = serde_json::from_str(
            r#"{"version":"1.0","request":{"type":"AlexaSkillEvent.SkillEnabled"}}"#,
        )
        .unwrap();
        let record = AuditRecord::from_request(&request, Duration::ZERO, None);
        assert_eq!(record.request_type, AuditRequestType::Unknown);
    }

    #[test]
    fn record_serializes_wire_field_names() {
        let record = AuditRecord::from_request(&intent_request(), Duration::from_millis(7), None)
            .with_pre_action_log("Processing intent request");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""sessionId":"sess-1""#));
        assert!(json.contains(r#""userId":"user-1""#));
        assert!(json.contains(r#""client":"Alexa""#));
        assert!(json.contains(r#""titleId":"emailaddresschecker""#));
        assert!(json.contains(r#""titleVersion":"1.0""#));
        assert!(json.contains(r#""processDuration":7"#));
        assert!(json.contains(r#""requestType":"Intent""#));
        assert!(json.contains(r#""preNodeActionLog":"Processing intent request""#));
        // Unset optionals stay off the wire
        assert!(!json.contains("canFulfill"));
        assert!(!json.contains("postNodeActionLog"));
        assert!(!json.contains("slots"));
    }
}
