//! Inbound request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::protocol::PROBE_VERSION;

/// The request-kind tag on an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    #[serde(rename = "LaunchRequest")]
    Launch,
    #[serde(rename = "IntentRequest")]
    Intent,
    #[serde(rename = "CanFulfillIntentRequest")]
    CanFulfillIntent,
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded,
    #[serde(rename = "AlexaSkillEvent.SkillPermissionAccepted")]
    SkillPermissionAccepted,
    #[serde(rename = "AlexaSkillEvent.SkillPermissionChanged")]
    SkillPermissionChanged,
    #[serde(rename = "AlexaSkillEvent.SkillAccountLinked")]
    SkillAccountLinked,
    #[serde(rename = "AlexaSkillEvent.SkillEnabled")]
    SkillEnabled,
    #[serde(rename = "AlexaSkillEvent.SkillDisabled")]
    SkillDisabled,
    #[serde(other)]
    Unknown,
}

/// A structured inbound request from the voice platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRequest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextAttributes {
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemAttributes>,
}

/// Authorization context: where to call the platform's user API, and the
/// bearer token to present. Both are absent when the caller lacks permission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_interfaces: Option<SupportedInterfaces>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportedInterfaces {
    /// Present (possibly as an empty object) when the device has a screen.
    #[serde(rename = "Display", default, skip_serializing_if = "Option::is_none")]
    pub display: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAttributes {
    #[serde(rename = "type")]
    pub kind: RequestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentAttributes>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAttributes {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<HashMap<String, serde_json::Value>>,
}

impl InboundRequest {
    /// Whether this is a bare liveness probe.
    pub fn is_probe(&self) -> bool {
        self.version == PROBE_VERSION
    }

    /// The request-kind tag, `Unknown` if the request body is absent.
    pub fn kind(&self) -> RequestKind {
        self.request
            .as_ref()
            .map(|r| r.kind)
            .unwrap_or(RequestKind::Unknown)
    }

    /// The intent name, if any.
    pub fn intent_name(&self) -> Option<&str> {
        self.request
            .as_ref()
            .and_then(|r| r.intent.as_ref())
            .map(|i| i.name.as_str())
    }

    /// The authorization context, if present.
    pub fn system(&self) -> Option<&SystemAttributes> {
        self.context.as_ref().and_then(|c| c.system.as_ref())
    }

    /// Whether the device advertises rich-display support.
    pub fn supports_display(&self) -> bool {
        self.system()
            .and_then(|s| s.device.as_ref())
            .and_then(|d| d.supported_interfaces.as_ref())
            .and_then(|i| i.display.as_ref())
            .is_some()
    }
}
