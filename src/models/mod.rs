//! Data models for Claude Code session history.
//!
//! - [`SessionLine`] - One raw line of a session `.jsonl` file
//! - [`MessageContent`] - The string-or-blocks shape of `message.content`
//! - [`PromptRecord`] - A normalised user prompt, the unit the index serves
//! - [`SessionFile`] - A discovered session file and its owning project
//!
//! Raw line models are deserialized with serde; timestamps go through the
//! lenient parser in `parsers::deserializers`.

pub mod project;
pub mod prompt;
pub mod session;

pub use project::SessionFile;
pub use prompt::PromptRecord;
pub use session::{ContentBlock, MessageBody, MessageContent, SessionLine};
