//! Outbound response DTOs.

use serde::{Deserialize, Serialize};

use crate::protocol::PROTOCOL_VERSION;

/// The outbound response returned to the voice platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundResponse {
    pub version: String,
    pub response: ResponseBody,
}

impl OutboundResponse {
    /// A minimal default response with no speech, card, or directives.
    pub fn empty() -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            response: ResponseBody::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directives: Option<Vec<Directive>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_fulfill_intent: Option<CanFulfillIntent>,
}

/// Spoken output — plain text or marked-up speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "PlainText")]
    Plain { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

/// A visual card shown in the companion app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    #[serde(rename = "Simple")]
    Simple { title: String, content: String },
    #[serde(rename = "AskForPermissionsConsent")]
    AskForPermissionsConsent { permissions: Vec<String> },
}

/// A rich-display directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "Display.RenderTemplate")]
    RenderTemplate { template: DisplayTemplate },
    #[serde(rename = "Hint")]
    Hint { hint: HintText },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTemplate {
    #[serde(rename = "type")]
    pub template_type: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<DisplayTextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<DisplayImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<DisplayImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_text: Option<DisplayTextField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<DisplayTextField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayTextField {
    #[serde(rename = "PlainText")]
    Plain { text: String },
    #[serde(rename = "RichText")]
    Rich { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    pub sources: Vec<DisplayImageSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayImageSource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_pixels: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_pixels: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HintText {
    #[serde(rename = "PlainText")]
    Plain { text: String },
}

/// Can-fulfill verdict returned for capability probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanFulfillIntent {
    pub can_fulfill: CanFulfillVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanFulfillVerdict {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "MAYBE")]
    Maybe,
}
