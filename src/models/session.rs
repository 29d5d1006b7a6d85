use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One line of a session `.jsonl` file, as far as prompt extraction cares
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLine {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub message: Option<MessageBody>,
    #[serde(
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// `message.content` is either a plain string or a list of typed blocks.
/// Anything else is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Other(Value),
}

/// A content block; only blocks carrying a `text` string are text-bearing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Text { text: String },
    Other(Value),
}

impl MessageContent {
    /// Flattens the content into a single string.
    ///
    /// Block sequences join their text-bearing parts with a single space.
    /// Returns `None` when there is no content at all (`null`).
    pub fn normalize(&self) -> Option<String> {
        match self {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Blocks(blocks) => {
                let parts: Vec<Cow<'_, str>> = blocks.iter().filter_map(ContentBlock::text).collect();
                Some(parts.join(" "))
            }
            MessageContent::Other(Value::Null) => None,
            MessageContent::Other(value) => Some(value.to_string()),
        }
    }
}

impl ContentBlock {
    fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            ContentBlock::Text { text } => Some(Cow::Borrowed(text)),
            // Tool results, images and other structured blocks carry no prompt text
            ContentBlock::Other(Value::Object(_) | Value::Null) => None,
            ContentBlock::Other(Value::String(s)) => Some(Cow::Borrowed(s)),
            ContentBlock::Other(value) => Some(Cow::Owned(value.to_string())),
        }
    }
}
