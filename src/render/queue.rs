//! Output queue: serializes render requests so messages appear in submission
//! order, never interleaved.
//!
//! A spawned drain task owns the sink and processes entries strictly FIFO; at
//! most one render is in flight at any time, and an in-flight render always
//! runs to completion (no cancellation). Enqueue is fire-and-forget through
//! an unbounded channel, so dispatching never blocks the caller. A fixed
//! settle delay separates consecutive messages.
//!
//! The public surface is kept to a small cloneable [`QueueHandle`] so the
//! internals can evolve safely.

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Duration};

use crate::config::RenderConfig;
use crate::render::markup::tokenize;
use crate::render::renderer;
use crate::render::sink::{RenderSink, StyleClass};

/// One pending message: markup plus the style class of its line container.
#[derive(Debug, Clone)]
pub struct OutputEntry {
    pub markup: String,
    pub style: StyleClass,
}

enum QueueCommand {
    Enqueue(OutputEntry),
    /// Discard all queued and rendered output.
    Clear,
    /// Resolve once everything enqueued before this point has rendered.
    Flush(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<QueueStats>),
    Shutdown(oneshot::Sender<()>),
}

enum PendingItem {
    Message(OutputEntry),
    FlushMarker(oneshot::Sender<()>),
}

/// Runtime counters for the drain task.
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    pub queued: usize,
    pub rendered_total: u64,
    pub cleared_total: u64,
}

/// Cloneable handle to the output queue's drain task.
#[derive(Clone, Debug)]
pub struct QueueHandle {
    tx: mpsc::UnboundedSender<QueueCommand>,
}

impl QueueHandle {
    /// Append a message. Fire-and-forget: never blocks, never fails from the
    /// caller's perspective.
    pub fn enqueue(&self, markup: impl Into<String>, style: StyleClass) {
        let _ = self.tx.send(QueueCommand::Enqueue(OutputEntry {
            markup: markup.into(),
            style,
        }));
    }

    /// Discard all queued entries and rendered output. An in-flight render
    /// still runs to completion first.
    pub fn clear(&self) {
        let _ = self.tx.send(QueueCommand::Clear);
    }

    /// Wait until every previously enqueued message has rendered (or was
    /// discarded by a clear).
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(QueueCommand::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    pub async fn snapshot(&self) -> Option<QueueStats> {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(QueueCommand::Snapshot(tx)).is_ok() {
            rx.await.ok()
        } else {
            None
        }
    }

    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(QueueCommand::Shutdown(tx));
        let _ = rx.await;
    }
}

/// Spawn the drain task that owns `sink` and returns its handle.
pub fn start_output_queue(cfg: RenderConfig, mut sink: Box<dyn RenderSink>) -> QueueHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<QueueCommand>();
    let handle = QueueHandle { tx };
    let settle = Duration::from_millis(cfg.settle_delay_ms);

    tokio::spawn(async move {
        let mut pending: VecDeque<PendingItem> = VecDeque::new();
        let mut stats = QueueStats::default();
        let mut shutdown: Option<oneshot::Sender<()>> = None;

        'run: loop {
            // Absorb control traffic that arrived while rendering. New
            // enqueues only ever append to the tail, never reorder.
            loop {
                match rx.try_recv() {
                    Ok(cmd) => {
                        if apply(cmd, &mut pending, sink.as_mut(), &mut stats, &mut shutdown) {
                            break 'run;
                        }
                    }
                    Err(_) => break,
                }
            }

            match pending.pop_front() {
                Some(PendingItem::Message(entry)) => {
                    let tokens = tokenize(&entry.markup);
                    let root = sink.append_line(entry.style);
                    renderer::render(&tokens, sink.as_mut(), root, &cfg).await;
                    stats.rendered_total += 1;
                    if !settle.is_zero() {
                        sleep(settle).await;
                    }
                }
                Some(PendingItem::FlushMarker(done)) => {
                    let _ = done.send(());
                }
                None => match rx.recv().await {
                    Some(cmd) => {
                        if apply(cmd, &mut pending, sink.as_mut(), &mut stats, &mut shutdown) {
                            break 'run;
                        }
                    }
                    None => break 'run,
                },
            }
        }

        if let Some(done) = shutdown {
            let _ = done.send(());
        }
        log::debug!(
            "output queue terminated: rendered={} cleared={}",
            stats.rendered_total,
            stats.cleared_total
        );
    });

    handle
}

/// Apply one control command. Returns true when the task should stop.
fn apply(
    cmd: QueueCommand,
    pending: &mut VecDeque<PendingItem>,
    sink: &mut dyn RenderSink,
    stats: &mut QueueStats,
    shutdown: &mut Option<oneshot::Sender<()>>,
) -> bool {
    match cmd {
        QueueCommand::Enqueue(entry) => {
            pending.push_back(PendingItem::Message(entry));
            false
        }
        QueueCommand::Clear => {
            // Discarded messages count as flushed for any waiting marker.
            for item in pending.drain(..) {
                if let PendingItem::FlushMarker(done) = item {
                    let _ = done.send(());
                }
            }
            sink.clear();
            stats.cleared_total += 1;
            false
        }
        QueueCommand::Flush(done) => {
            pending.push_back(PendingItem::FlushMarker(done));
            false
        }
        QueueCommand::Snapshot(resp) => {
            let queued = pending
                .iter()
                .filter(|i| matches!(i, PendingItem::Message(_)))
                .count();
            let _ = resp.send(QueueStats {
                queued,
                ..stats.clone()
            });
            false
        }
        QueueCommand::Shutdown(done) => {
            *shutdown = Some(done);
            true
        }
    }
}
