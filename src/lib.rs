//! # Termquest - a retro console adventure terminal
//!
//! Termquest is a single-user text-console simulation: a command session
//! engine (user registry, world state, dispatch) layered under a streaming
//! output renderer that reveals responses character-by-character, correctly
//! handling embedded inline markup such as styled spans and line breaks.
//!
//! ## Features
//!
//! - **Typewriter Output**: Every response is tokenized and revealed one
//!   character at a time at a configurable cadence, with throttled scrolling.
//! - **Inline Markup**: A tiny tag format (`<span class="...">`, `<br>`)
//!   drives styled spans and line breaks without an HTML dependency.
//! - **Output Queue**: Messages render strictly in submission order; at most
//!   one reveal is ever in flight.
//! - **User Registry**: Password-less name registry with a single active
//!   session and an online set, seeded with an `admin` identity.
//! - **World State**: A fixed location graph with cardinal movement,
//!   inventory, and vitals, gated behind `start`.
//! - **Pluggable Sinks**: The renderer only needs an append/scroll capability
//!   interface, so output can go to an ANSI terminal or an in-memory buffer.
//! - **Async Design**: Built with Tokio; dispatch is synchronous and
//!   non-blocking while rendering runs on a single drain task.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use termquest::config::Config;
//! use termquest::game::GameEngine;
//! use termquest::render::{start_output_queue, MemorySink};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let graph = termquest::world_graph(&config)?;
//!     let (sink, _buffer) = MemorySink::new();
//!     let queue = start_output_queue(config.render.clone(), Box::new(sink));
//!     let mut engine = GameEngine::new(graph, queue);
//!     engine.greet();
//!     engine.dispatch("register neo")?;
//!     engine.output().flush().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Session registry, world state machine, history, and dispatch
//! - [`render`] - Markup tokenizer, incremental renderer, sinks, output queue
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Username validation
//!
//! ## Architecture
//!
//! ```text
//! raw input ──► GameEngine (dispatch) ──► markup string
//!                     │                        │
//!              Session / World          OutputQueue (FIFO)
//!                                             │
//!                                   tokenize ─► incremental render
//!                                             │
//!                                        RenderSink
//! ```
//!
//! State is memory-only and lost on restart; there is no persistence layer
//! and the name registry is deliberately password-less.

pub mod config;
pub mod game;
pub mod logutil;
pub mod render;
pub mod validation;

use crate::config::Config;
use crate::game::world::LocationGraph;

/// Build the location graph for a configuration: load the rooms seed file if
/// one is present, otherwise fall back to the embedded seed.
pub fn world_graph(config: &Config) -> anyhow::Result<LocationGraph> {
    match &config.world.rooms_path {
        Some(path) if std::path::Path::new(path).exists() => {
            Ok(LocationGraph::load_from_json(path)?)
        }
        _ => Ok(LocationGraph::builtin()?),
    }
}
