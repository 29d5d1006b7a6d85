//! Terminal output sanitization utilities
//!
//! # Security: Terminal Injection Prevention
//!
//! User-controlled data from JSONL files should be sanitized before display to prevent
//! terminal injection attacks using ANSI escape sequences. Malicious sequences could:
//! - Clear the screen or move the cursor
//! - Change terminal colors or styles
//! - Trigger unexpected terminal behavior
//!
//! Every command that prints prompt text passes it through [`sanitize_for_display`].

/// Removes ANSI CSI sequences (`ESC [ ... letter`) and control characters other
/// than tab, newline and carriage return
///
/// ```
/// use ai_prompt_history::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mred\x1b[0m\x07"), "red");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameter bytes run until the final letter
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }
        result.push(ch);
    }

    result
}

/// Strips escape codes, collapses whitespace runs (including newlines) into single
/// spaces and truncates to `max_chars` characters, appending `...` when cut
pub fn sanitize_for_display(text: &str, max_chars: usize) -> String {
    let clean = strip_ansi_codes(text);
    let single_line = clean.split_whitespace().collect::<Vec<_>>().join(" ");

    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut truncated: String = single_line.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}
