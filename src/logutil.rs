//! Logging helpers that keep raw user input on a single log line.
//! Control characters are escaped so a pasted newline cannot forge entries.

/// Escape a string for single-line logging. Newlines, carriage returns, tabs
/// and backslashes become their two-character escapes; other control
/// characters are rendered as `\xNN`. Input longer than the preview cap is
/// truncated with an ellipsis.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 200;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (i, ch) in s.chars().enumerate() {
        if i >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
