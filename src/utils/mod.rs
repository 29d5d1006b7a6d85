pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::get_claude_dir;
pub use paths::format_path_with_tilde;
pub use terminal::{sanitize_for_display, strip_ansi_codes};
