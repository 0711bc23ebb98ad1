//! Operation outcomes
//!
//! Every application-facing operation answers with a success flag and a
//! human-readable message, optionally carrying a payload when it succeeds.
//! Expected domain failures (wrong password, locked account, unknown reset
//! token, duplicate username) are reported through this type; only
//! infrastructure failures surface as [`crate::Error`].
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> Outcome<T> {
    /// An accepted outcome carrying a payload.
    pub fn accepted_with(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// A rejected outcome. The message is the only information callers get;
    /// keep it indistinguishable across branches where enumeration
    /// resistance matters.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }
}

impl Outcome<()> {
    /// An accepted outcome with no payload.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: None,
        }
    }
}
