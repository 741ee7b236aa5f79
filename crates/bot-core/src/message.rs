//! Chat Messages
//!
//! Transport-agnostic message types exchanged with a chat frontend:
//! incoming user events and outgoing replies with optional inline
//! keyboards and photo attachments.

use serde::{Deserialize, Serialize};

/// Unique chat identifier, assigned by the transport
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(String);

impl ChatId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An incoming chat event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Incoming {
    /// Slash command without the leading `/` (e.g. "start")
    Command(String),
    /// Free-form text message
    Text(String),
    /// Inline keyboard button press, carrying the button's data
    Callback(String),
}

impl Incoming {
    /// Classify raw message text: a leading `/` marks a command
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.strip_prefix('/') {
            Some(cmd) => Incoming::Command(cmd.to_string()),
            None => Incoming::Text(trimmed.to_string()),
        }
    }

    /// The free-form text, if this is a text event
    pub fn text(&self) -> Option<&str> {
        match self {
            Incoming::Text(t) => Some(t),
            _ => None,
        }
    }

    /// The callback data, if this is a button press
    pub fn callback(&self) -> Option<&str> {
        match self {
            Incoming::Callback(data) => Some(data),
            _ => None,
        }
    }
}

/// A single inline keyboard button
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Button {
    /// Text shown on the button
    pub label: String,

    /// Data delivered back as `Incoming::Callback` when pressed
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Inline keyboard: rows of buttons rendered under a reply
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rendered image attached to a reply
#[derive(Clone, Serialize, Deserialize)]
pub struct Photo {
    /// Suggested filename (e.g. "bitcoin_rsi_chart.svg")
    pub filename: String,

    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photo")
            .field("filename", &self.filename)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// An outgoing reply to a chat
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reply {
    /// Message text
    pub text: String,

    /// Optional inline keyboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,

    /// Optional photo attachment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
}

impl Reply {
    /// Create a plain text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            photo: None,
        }
    }

    /// Attach an inline keyboard
    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Attach a photo
    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_classification() {
        assert_eq!(
            Incoming::from_text("/start"),
            Incoming::Command("start".into())
        );
        assert_eq!(
            Incoming::from_text("  bitcoin "),
            Incoming::Text("bitcoin".into())
        );
    }

    #[test]
    fn test_reply_builder() {
        let reply = Reply::text("Pick one:")
            .with_keyboard(Keyboard::new().row(vec![Button::new("RSI", "rsi")]));

        assert_eq!(reply.text, "Pick one:");
        assert_eq!(reply.keyboard.unwrap().rows[0][0].data, "rsi");
        assert!(reply.photo.is_none());
    }
}
