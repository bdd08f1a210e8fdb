//! Voice-platform wire protocol — inbound requests and outbound responses.
//!
//! Field names and enum string forms are a compatibility surface with the
//! external platform and must serialize exactly as the platform expects.

pub mod request;
pub mod response;

pub use request::{InboundRequest, RequestKind};
pub use response::{
    Card, CanFulfillIntent, CanFulfillVerdict, Directive, DisplayImage, DisplayImageSource,
    DisplayTemplate, DisplayTextContent, DisplayTextField, HintText, OutboundResponse,
    OutputSpeech, ResponseBody,
};

/// Reserved version marker identifying a bare liveness probe.
pub const PROBE_VERSION: &str = "ping";

/// Protocol version stamped on every real response.
pub const PROTOCOL_VERSION: &str = "1.0";
