//! Response builders — speech, cards, and rich-display directives.

use crate::error::ConfigError;
use crate::protocol::response::{
    Card, Directive, DisplayImage, DisplayImageSource, DisplayTemplate, DisplayTextContent,
    DisplayTextField, HintText, OutputSpeech,
};

/// Permission scope requested when the user has not granted email access.
pub const EMAIL_READ_SCOPE: &str = "alexa::profile:email:read";

/// Display template used for both the granted and the permission screens.
const BODY_TEMPLATE: &str = "BodyTemplate3";

const SIDE_ICON_576: &str = "emailicon_576x576.png";
const SIDE_ICON_340: &str = "emailicon_340x340.png";
const BACKGROUND_IMAGE: &str = "emailbackground_1200x600.png";

/// Fixed speech for the not-granted branch.
pub const PERMISSION_SPEECH: &str = "The email address checker needs permission to access your \
     email in order to repeat it to you.  Your email address is not retained or used by the \
     skill other than to repeat the email to you.";

const PERMISSION_PRIMARY_TEXT: &str = "The skill needs permission to access your email.";
const PERMISSION_SECONDARY_TEXT: &str = "A permission request has been sent to your Alexa \
     mobile app. You can check it on your mobile phone or open a browser and log into \
     alexa.amazon.com";
const PERMISSION_HINT: &str = "Check alexa.amazon.com or your Alexa mobile app.";

/// Build an image URL from the configured root path and a fixed filename.
/// The root is trimmed and normalized to end with exactly one separator.
/// A blank root is a deployment defect, not a per-request condition.
pub fn image_url(image_root: &str, image_file: &str) -> Result<String, ConfigError> {
    let root = image_root.trim();
    if root.is_empty() {
        return Err(ConfigError::MissingRequired {
            key: "EMAIL_SKILL_IMAGE_ROOT".into(),
            hint: "Image configuration path value missing".into(),
        });
    }
    Ok(format!("{}/{}", root.trim_end_matches('/'), image_file))
}

/// Marked-up speech reading the email address in two segments: the local
/// part spelled character-by-character at slow prosody, the domain read
/// normally. An address with no delimiter is spelled out in full.
pub fn granted_speech(email: &str) -> OutputSpeech {
    let (name, host) = match email.split_once('@') {
        Some((name, host)) => (name, Some(host)),
        None => (email, None),
    };

    let spelled = format!(
        "<prosody rate=\"x-slow\"><say-as interpret-as=\"characters\">{name}</say-as></prosody>"
    );
    let ssml = match host {
        Some(host) => format!("<speak>Your email is {spelled}@{host}</speak>"),
        None => format!("<speak>Your email is {spelled}</speak>"),
    };
    OutputSpeech::Ssml { ssml }
}

/// Plain-text speech explaining that permission is required.
pub fn permission_speech() -> OutputSpeech {
    OutputSpeech::Plain {
        text: PERMISSION_SPEECH.to_string(),
    }
}

/// Card showing the retrieved email address.
pub fn email_card(email: &str) -> Card {
    Card::Simple {
        title: "Your Email".to_string(),
        content: format!("Your email is {email}"),
    }
}

/// Card asking the user to grant the email-read permission.
pub fn permission_card() -> Card {
    Card::AskForPermissionsConsent {
        permissions: vec![EMAIL_READ_SCOPE.to_string()],
    }
}

/// Display directive bundle for the granted branch.
pub fn email_display_directives(
    image_root: &str,
    email: &str,
) -> Result<Vec<Directive>, ConfigError> {
    let template = DisplayTemplate {
        template_type: BODY_TEMPLATE.to_string(),
        token: "user_email".to_string(),
        title: Some("Your Email".to_string()),
        text_content: Some(DisplayTextContent {
            primary_text: Some(DisplayTextField::Rich {
                text: format!("<b><font size=\"6\">{}</font></b>", html_encode(email)),
            }),
            secondary_text: None,
        }),
        image: Some(side_icon(image_root)?),
        background_image: Some(background(image_root)?),
    };
    Ok(vec![Directive::RenderTemplate { template }])
}

/// Display directive bundle for the not-granted branch: one permission
/// explanation screen followed by one on-device hint.
pub fn permission_display_directives(image_root: &str) -> Result<Vec<Directive>, ConfigError> {
    let template = DisplayTemplate {
        template_type: BODY_TEMPLATE.to_string(),
        token: "no_permission".to_string(),
        title: Some("Permission Needed".to_string()),
        text_content: Some(DisplayTextContent {
            primary_text: Some(DisplayTextField::Rich {
                text: PERMISSION_PRIMARY_TEXT.to_string(),
            }),
            secondary_text: Some(DisplayTextField::Plain {
                text: PERMISSION_SECONDARY_TEXT.to_string(),
            }),
        }),
        image: Some(side_icon(image_root)?),
        background_image: Some(background(image_root)?),
    };
    Ok(vec![
        Directive::RenderTemplate { template },
        Directive::Hint {
            hint: HintText::Plain {
                text: PERMISSION_HINT.to_string(),
            },
        },
    ])
}

fn side_icon(image_root: &str) -> Result<DisplayImage, ConfigError> {
    Ok(DisplayImage {
        content_description: Some("email icon".to_string()),
        sources: vec![
            DisplayImageSource {
                url: image_url(image_root, SIDE_ICON_340)?,
                width_pixels: Some(340),
                height_pixels: Some(340),
            },
            DisplayImageSource {
                url: image_url(image_root, SIDE_ICON_576)?,
                width_pixels: Some(576),
                height_pixels: Some(576),
            },
        ],
    })
}

fn background(image_root: &str) -> Result<DisplayImage, ConfigError> {
    Ok(DisplayImage {
        content_description: Some("email background".to_string()),
        sources: vec![DisplayImageSource {
            url: image_url(image_root, BACKGROUND_IMAGE)?,
            width_pixels: Some(1200),
            height_pixels: Some(600),
        }],
    })
}

/// Minimal HTML escaping for rich-text fields.
fn html_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
