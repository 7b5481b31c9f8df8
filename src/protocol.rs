use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session ID type (opaque server-issued token)
pub type SessionId = String;

pub const DEFAULT_BOT_NAME: &str = "Assistant";
pub const DEFAULT_ACCENT: &str = "#e8341c";
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";
pub const HEADER_AVATAR_FALLBACK: &str = "🤖";
pub const LAUNCHER_AVATAR_FALLBACK: &str = "💬";

/// Per-client widget configuration, fetched once at startup and never
/// mutated afterwards. Unknown fields are ignored; missing optional
/// fields fall back to the documented defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default)]
    pub initial_open: bool,
}

fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}

impl WidgetConfig {
    /// The accent color, substituted everywhere the accent is needed.
    pub fn accent(&self) -> &str {
        self.primary_color.as_deref().unwrap_or(DEFAULT_ACCENT)
    }

    pub fn header_avatar(&self) -> &str {
        self.avatar.as_deref().unwrap_or(HEADER_AVATAR_FALLBACK)
    }

    pub fn launcher_avatar(&self) -> &str {
        self.avatar.as_deref().unwrap_or(LAUNCHER_AVATAR_FALLBACK)
    }

    pub fn greeting_text(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }
}

/// Anchor corner for the floating launcher and panel.
///
/// Anything other than `bottom-left` anchors bottom-right, so a backend
/// sending an unexpected value degrades to the default corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Position {
    BottomLeft,
    #[default]
    BottomRight,
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        if value == "bottom-left" {
            Position::BottomLeft
        } else {
            Position::BottomRight
        }
    }
}

/// Who authored a rendered message bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// Body of a chat POST. The session id is omitted entirely until the
/// server has issued one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest<'a> {
    pub client_id: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Body of a chat response. All fields are optional; `error` may be a
/// flag or an object depending on the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ChatResponse {
    /// The error field follows JS truthiness: `null`, `false`, `0`, and
    /// `""` are not errors; any other present value is, including empty
    /// arrays and objects.
    pub fn is_application_error(&self) -> bool {
        match &self.error {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => !text.is_empty(),
            Some(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
            Some(_) => true,
        }
    }
}
