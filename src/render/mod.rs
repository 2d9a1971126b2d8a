//! # Render Module
//!
//! Everything between a markup string and visible output:
//!
//! - [`markup`] - tokenizer for the inline-tag format
//! - [`renderer`] - incremental per-character reveal
//! - [`sink`] - the capability interface front ends implement, plus the
//!   bundled ANSI terminal and in-memory implementations
//! - [`queue`] - the FIFO output queue that serializes renders
//!
//! ## Data Flow
//!
//! ```text
//! markup string ──► tokenize ──► [Token] ──► render ──► RenderSink
//!        ▲                                     ▲
//!        └────────── OutputQueue (FIFO) ───────┘
//! ```
//!
//! Command handlers never touch a sink directly; they enqueue markup and the
//! queue's drain task performs the reveal.

pub mod markup;
pub mod queue;
pub mod renderer;
pub mod sink;

pub use markup::{flatten_text, tokenize, Token};
pub use queue::{start_output_queue, OutputEntry, QueueHandle, QueueStats};
pub use sink::{
    LineRecord, MemoryBuffer, MemorySink, NodeId, RenderSink, Segment, StyleClass, TerminalSink,
};
