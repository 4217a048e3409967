use serde_json::Value;

/// Structured answer to "who else is editing this resource".
///
/// Replaced wholesale on every successful poll. The next poll must always
/// target the most recently received `ping_url`; a stale one is never reused.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionDescriptor {
    /// Server-rendered fragment listing the other active sessions.
    pub html: String,
    /// Next poll target, when the server supplied one.
    pub ping_url: Option<String>,
    /// URL used to release this editing session, when supplied.
    pub release_url: Option<String>,
    /// The other sessions currently editing this resource.
    pub other_sessions: Vec<OtherSession>,
}

/// One other editing session reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtherSession {
    pub session_id: i64,
    pub revision_id: i64,
}

impl SessionDescriptor {
    /// Reads a descriptor out of an arbitrary JSON value, field by field.
    ///
    /// Absent or mistyped fields are skipped rather than failing the whole
    /// payload; `html` falls back to the empty string.
    pub fn from_value(value: &Value) -> Self {
        let html = value
            .get("html")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let ping_url = value
            .get("ping_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        let release_url = value
            .get("release_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        let other_sessions = value
            .get("other_sessions")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_session).collect())
            .unwrap_or_default();

        Self {
            html,
            ping_url,
            release_url,
            other_sessions,
        }
    }
}

fn parse_session(value: &Value) -> Option<OtherSession> {
    Some(OtherSession {
        session_id: value.get("session_id")?.as_i64()?,
        revision_id: value.get("revision_id")?.as_i64()?,
    })
}
