//! Append-only command history with a navigation cursor.
//!
//! Every submitted line is recorded for the process lifetime. The cursor
//! supports backward/forward navigation (arrow keys in the hosting front end)
//! and resets to "no selection" after each submission.

/// Command history. `cursor == None` means nothing is selected (the input
/// line is live); `Some(i)` selects `entries[i]`.
#[derive(Debug, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line and reset the cursor.
    pub fn push(&mut self, raw: &str) {
        self.entries.push(raw.to_string());
        self.cursor = None;
    }

    /// Step backward (toward the oldest entry). Clamps at the oldest.
    pub fn prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let next = match self.cursor {
            None => self.entries.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.cursor = Some(next);
        Some(&self.entries[next])
    }

    /// Step forward (toward the newest entry). Stepping past the newest
    /// clears the selection.
    pub fn next(&mut self) -> Option<&str> {
        let i = self.cursor?;
        if i + 1 < self.entries.len() {
            self.cursor = Some(i + 1);
            Some(&self.entries[i + 1])
        } else {
            self.cursor = None;
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigates_backward_and_clamps() {
        let mut history = CommandHistory::new();
        history.push("help");
        history.push("look");
        assert_eq!(history.prev(), Some("look"));
        assert_eq!(history.prev(), Some("help"));
        assert_eq!(history.prev(), Some("help"));
    }

    #[test]
    fn forward_past_newest_clears_selection() {
        let mut history = CommandHistory::new();
        history.push("help");
        history.push("look");
        history.prev();
        history.prev();
        assert_eq!(history.next(), Some("look"));
        assert_eq!(history.next(), None);
        // Selection cleared: prev starts from the newest again.
        assert_eq!(history.prev(), Some("look"));
    }

    #[test]
    fn push_resets_cursor() {
        let mut history = CommandHistory::new();
        history.push("help");
        history.prev();
        history.push("look");
        assert_eq!(history.prev(), Some("look"));
    }

    #[test]
    fn empty_history_navigates_nowhere() {
        let mut history = CommandHistory::new();
        assert_eq!(history.prev(), None);
        assert_eq!(history.next(), None);
    }
}
