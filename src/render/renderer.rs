//! Incremental renderer.
//!
//! Consumes a token sequence and reveals it into a sink one character at a
//! time. Scope handling is deliberately flat: a tag-open creates a child span
//! and moves the insertion point into it, a tag-close resets the insertion
//! point to the line root (nesting beyond one level is not tracked, matching
//! the one-level scope the tokenizer infers). A scroll-to-bottom is requested
//! after each character but coalesced to at most one per throttle window,
//! plus unconditionally once a text token finishes.
//!
//! The future completes when the token sequence is exhausted; the caller's
//! `.await` is the done notification. The output queue guarantees at most one
//! render is ever in flight per sink.

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::RenderConfig;
use crate::render::markup::{Token, LINE_BREAK_TAG};
use crate::render::sink::{NodeId, RenderSink};

/// Reveal `tokens` into `sink` under the line node `root`.
///
/// An empty token sequence completes immediately. A text token embedded
/// between zero-width tags is still revealed character by character.
pub async fn render(tokens: &[Token], sink: &mut dyn RenderSink, root: NodeId, cfg: &RenderConfig) {
    let char_delay = Duration::from_millis(cfg.char_delay_ms);
    let throttle = Duration::from_millis(cfg.scroll_throttle_ms);
    let mut target = root;
    let mut last_scroll: Option<Instant> = None;

    for token in tokens {
        match token {
            Token::TagOpen { class, .. } => {
                target = sink.append_span(target, class.as_deref());
            }
            Token::TagClose { .. } => {
                target = root;
            }
            Token::LineBreak => {
                sink.append_break(root);
                target = root;
            }
            Token::SelfClosing { name } if name == LINE_BREAK_TAG => {
                // `<br/>` reads the same as `<br>`.
                sink.append_break(root);
                target = root;
            }
            Token::SelfClosing { .. } => {
                // Zero-width: nothing appended, no scope push.
            }
            Token::Text(text) => {
                for ch in text.chars() {
                    sink.append_char(target, ch);
                    let now = Instant::now();
                    if last_scroll.map_or(true, |t| now.duration_since(t) >= throttle) {
                        sink.scroll_to_end();
                        last_scroll = Some(now);
                    }
                    if !char_delay.is_zero() {
                        sleep(char_delay).await;
                    }
                }
                sink.scroll_to_end();
                last_scroll = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::markup::tokenize;
    use crate::render::sink::{MemorySink, Segment, StyleClass};

    #[tokio::test]
    async fn reveals_spans_into_their_own_nodes() {
        let (mut sink, buffer) = MemorySink::new();
        let tokens = tokenize("a<span class='x'>b</span>c");
        let root = sink.append_line(StyleClass::Game);
        render(&tokens, &mut sink, root, &RenderConfig::immediate()).await;

        let buffer = buffer.lock().unwrap();
        assert_eq!(
            buffer.lines[0].segments,
            vec![
                Segment::Text("a".into()),
                Segment::Span {
                    class: Some("x".into()),
                    text: "b".into()
                },
                Segment::Text("c".into()),
            ]
        );
        assert_eq!(buffer.lines[0].text(), "abc");
    }

    #[tokio::test]
    async fn line_breaks_reset_to_root() {
        let (mut sink, buffer) = MemorySink::new();
        let tokens = tokenize("<span class='title'>HEAD</span><br>body");
        let root = sink.append_line(StyleClass::System);
        render(&tokens, &mut sink, root, &RenderConfig::immediate()).await;

        let buffer = buffer.lock().unwrap();
        assert_eq!(buffer.lines[0].text(), "HEAD\nbody");
        // "body" landed on the line root, not inside the span.
        assert_eq!(buffer.lines[0].segments[2], Segment::Text("body".into()));
    }

    #[tokio::test]
    async fn empty_markup_completes_immediately() {
        let (mut sink, buffer) = MemorySink::new();
        let root = sink.append_line(StyleClass::Plain);
        render(&tokenize(""), &mut sink, root, &RenderConfig::immediate()).await;
        assert!(buffer.lock().unwrap().lines[0].segments.is_empty());
    }

    #[tokio::test]
    async fn scrolls_at_least_once_per_text_token() {
        let (mut sink, buffer) = MemorySink::new();
        let root = sink.append_line(StyleClass::Game);
        render(&tokenize("ab<br>cd"), &mut sink, root, &RenderConfig::immediate()).await;
        assert!(buffer.lock().unwrap().scrolls >= 2);
    }
}
