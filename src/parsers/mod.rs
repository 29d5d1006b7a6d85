//! JSONL parser for Claude Code session files
//!
//! # Error Handling Strategy
//!
//! - **Individual line failures**: Malformed JSON, non-user turns and turns without a
//!   timestamp or text are skipped silently. A session log is append-only and may end
//!   in a half-written line, so a bad line says nothing about the rest of the file.
//!
//! - **File failures**: Failing to open or read a file is returned as an error with
//!   context. The ingestor catches it at the task boundary, logs it, and moves on.

pub mod deserializers;
pub mod session;

pub use deserializers::parse_timestamp;
pub use session::parse_session_file;
