//! Render sink abstraction.
//!
//! The renderer only needs three capabilities from its host: append a child
//! node with a style class, append text to a node, and scroll to the bottom.
//! [`RenderSink`] captures that surface so the engine can drive an ANSI
//! terminal, an in-memory buffer, or any other front end.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Opaque handle to a node created by a sink.
pub type NodeId = usize;

/// Style class attached to a whole output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    System,
    Error,
    Success,
    Game,
    Plain,
}

impl StyleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::System => "system",
            StyleClass::Error => "error",
            StyleClass::Success => "success",
            StyleClass::Game => "game",
            StyleClass::Plain => "plain",
        }
    }
}

/// Minimal capability interface the renderer requires from a front end.
///
/// Node handles are only ever used within the line they were created for;
/// a sink may invalidate them on [`RenderSink::clear`].
pub trait RenderSink: Send {
    /// Begin a new output line styled with `style`; returns the line node.
    fn append_line(&mut self, style: StyleClass) -> NodeId;
    /// Append a styled child node under `parent`; returns the child node.
    fn append_span(&mut self, parent: NodeId, class: Option<&str>) -> NodeId;
    /// Append a line break under `parent`.
    fn append_break(&mut self, parent: NodeId);
    /// Append one revealed character to `node`.
    fn append_char(&mut self, node: NodeId, ch: char);
    /// Scroll the view to the bottom. May be called at a high rate; the
    /// renderer throttles, but sinks should still keep this cheap.
    fn scroll_to_end(&mut self);
    /// Discard all rendered output.
    fn clear(&mut self);
}

const ANSI_RESET: &str = "\x1b[0m";

/// ANSI color for a line style class.
fn line_color(style: StyleClass) -> &'static str {
    match style {
        StyleClass::System => "\x1b[36m",  // cyan
        StyleClass::Error => "\x1b[31m",   // red
        StyleClass::Success => "\x1b[32m", // green
        StyleClass::Game => "\x1b[37m",    // light gray
        StyleClass::Plain => "",
    }
}

/// ANSI color for an inline span class. Unknown classes inherit the line
/// color.
fn span_color(class: &str) -> Option<&'static str> {
    match class {
        "command" => Some("\x1b[33m"),         // yellow
        "title" => Some("\x1b[1;36m"),         // bold cyan
        "location" => Some("\x1b[35m"),        // magenta
        "current-user" => Some("\x1b[1;32m"),  // bold green
        "admin-badge" => Some("\x1b[1;31m"),   // bold red
        "prompt" => Some("\x1b[32m"),          // green
        "user-online" => Some("\x1b[32m"),     // green
        "user-offline" => Some("\x1b[2m"),     // dim
        "system-message" => Some("\x1b[36m"),  // cyan
        _ => None,
    }
}

/// Sink that writes ANSI-colored output to stdout. Scrolling is the
/// terminal's own behavior, so `scroll_to_end` only flushes.
pub struct TerminalSink {
    next_id: NodeId,
    /// ANSI prefix for each live node.
    colors: HashMap<NodeId, &'static str>,
    first_line: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        TerminalSink {
            next_id: 0,
            colors: HashMap::new(),
            first_line: true,
        }
    }

    fn alloc(&mut self, color: &'static str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.colors.insert(id, color);
        id
    }

    fn color_of(&self, node: NodeId) -> &'static str {
        self.colors.get(&node).copied().unwrap_or("")
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn append_line(&mut self, style: StyleClass) -> NodeId {
        if !self.first_line {
            println!();
        }
        self.first_line = false;
        self.colors.clear();
        self.alloc(line_color(style))
    }

    fn append_span(&mut self, parent: NodeId, class: Option<&str>) -> NodeId {
        let inherited = self.color_of(parent);
        let color = class.and_then(span_color).unwrap_or(inherited);
        self.alloc(color)
    }

    fn append_break(&mut self, _parent: NodeId) {
        println!();
    }

    fn append_char(&mut self, node: NodeId, ch: char) {
        let color = self.color_of(node);
        if color.is_empty() {
            print!("{}", ch);
        } else {
            print!("{}{}{}", color, ch, ANSI_RESET);
        }
    }

    fn scroll_to_end(&mut self) {
        let _ = std::io::stdout().flush();
    }

    fn clear(&mut self) {
        // Clear screen and home the cursor.
        print!("\x1b[2J\x1b[H");
        let _ = std::io::stdout().flush();
        self.first_line = true;
    }
}

/// One flat segment of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text appended directly to the line node.
    Text(String),
    /// Text inside a styled span.
    Span { class: Option<String>, text: String },
    /// A line break.
    Break,
}

/// One rendered line: its style class and flat segments in render order.
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub style: StyleClass,
    pub segments: Vec<Segment>,
}

impl LineRecord {
    /// All visible text of the line, breaks rendered as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(s) => out.push_str(s),
                Segment::Span { text, .. } => out.push_str(text),
                Segment::Break => out.push('\n'),
            }
        }
        out
    }
}

/// Backing store of a [`MemorySink`], shared with the test or embedder.
#[derive(Debug, Default)]
pub struct MemoryBuffer {
    pub lines: Vec<LineRecord>,
    /// `(line index, char)` in arrival order, across all lines.
    pub char_log: Vec<(usize, char)>,
    pub scrolls: usize,
    pub clears: usize,
}

impl MemoryBuffer {
    /// Visible text of every line, in render order.
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text()).collect()
    }
}

/// Node location inside the buffer: line index plus optional segment index
/// (None targets the line node itself).
type NodePath = (usize, Option<usize>);

/// In-memory sink for tests and headless embedding. All appended content is
/// recorded in a shared [`MemoryBuffer`].
pub struct MemorySink {
    buffer: Arc<Mutex<MemoryBuffer>>,
    nodes: HashMap<NodeId, NodePath>,
    next_id: NodeId,
}

impl MemorySink {
    pub fn new() -> (Self, Arc<Mutex<MemoryBuffer>>) {
        let buffer = Arc::new(Mutex::new(MemoryBuffer::default()));
        (
            MemorySink {
                buffer: Arc::clone(&buffer),
                nodes: HashMap::new(),
                next_id: 0,
            },
            buffer,
        )
    }

    fn alloc(&mut self, path: NodePath) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, path);
        id
    }
}

impl RenderSink for MemorySink {
    fn append_line(&mut self, style: StyleClass) -> NodeId {
        let mut buffer = self.buffer.lock().expect("memory sink poisoned");
        buffer.lines.push(LineRecord {
            style,
            segments: Vec::new(),
        });
        let line_idx = buffer.lines.len() - 1;
        drop(buffer);
        self.alloc((line_idx, None))
    }

    fn append_span(&mut self, parent: NodeId, class: Option<&str>) -> NodeId {
        let Some(&(line_idx, _)) = self.nodes.get(&parent) else {
            return self.alloc((0, None));
        };
        let mut buffer = self.buffer.lock().expect("memory sink poisoned");
        let line = &mut buffer.lines[line_idx];
        line.segments.push(Segment::Span {
            class: class.map(str::to_string),
            text: String::new(),
        });
        let seg_idx = line.segments.len() - 1;
        drop(buffer);
        self.alloc((line_idx, Some(seg_idx)))
    }

    fn append_break(&mut self, parent: NodeId) {
        let Some(&(line_idx, _)) = self.nodes.get(&parent) else {
            return;
        };
        let mut buffer = self.buffer.lock().expect("memory sink poisoned");
        buffer.lines[line_idx].segments.push(Segment::Break);
    }

    fn append_char(&mut self, node: NodeId, ch: char) {
        let Some(&(line_idx, seg)) = self.nodes.get(&node) else {
            return;
        };
        let mut buffer = self.buffer.lock().expect("memory sink poisoned");
        buffer.char_log.push((line_idx, ch));
        let line = &mut buffer.lines[line_idx];
        match seg {
            Some(seg_idx) => {
                if let Some(Segment::Span { text, .. }) = line.segments.get_mut(seg_idx) {
                    text.push(ch);
                }
            }
            None => {
                // Coalesce consecutive direct-text appends into one segment.
                if let Some(Segment::Text(text)) = line.segments.last_mut() {
                    text.push(ch);
                } else {
                    line.segments.push(Segment::Text(ch.to_string()));
                }
            }
        }
    }

    fn scroll_to_end(&mut self) {
        self.buffer.lock().expect("memory sink poisoned").scrolls += 1;
    }

    fn clear(&mut self) {
        let mut buffer = self.buffer.lock().expect("memory sink poisoned");
        buffer.lines.clear();
        buffer.clears += 1;
        self.nodes.clear();
    }
}
