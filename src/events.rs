//! Progress and audit events emitted while sealing or opening a vault.
//!
//! The crypto layer never talks to a logger directly.  Every call takes an
//! `&dyn EventSink` and reports each step through it; the caller decides
//! where events go (tracing, the SQLite audit log, a channel feeding a UI,
//! or nowhere).
//!
//! Sinks must not block and must not fail the operation that emits into
//! them, so `emit` has no return value.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// Category of a vault event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Warning,
    Error,
    Success,
    /// Low-level crypto step (salt, nonce, derivation, tag check).
    CryptoDetail,
}

impl EventKind {
    /// Stable lowercase name, used by the audit log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::CryptoDetail => "crypto",
        }
    }

    /// Parse a name produced by [`EventKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "success" => Some(Self::Success),
            "crypto" => Some(Self::CryptoDetail),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event.  Never carries passphrases, key bytes, or plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEvent {
    pub kind: EventKind,
    pub message: String,
}

impl VaultEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Receiver of vault events.
pub trait EventSink {
    fn emit(&self, event: &VaultEvent);
}

/// Shorthand used throughout the crypto and vault modules.
pub(crate) fn emit(sink: &dyn EventSink, kind: EventKind, message: impl Into<String>) {
    sink.emit(&VaultEvent::new(kind, message));
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: &VaultEvent) {
        (**self).emit(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&self, event: &VaultEvent) {
        (**self).emit(event);
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &VaultEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &VaultEvent) {
        let msg = event.message.as_str();
        match event.kind {
            EventKind::Error => tracing::error!(kind = %event.kind, "{msg}"),
            EventKind::Warning => tracing::warn!(kind = %event.kind, "{msg}"),
            EventKind::Info | EventKind::Success => tracing::info!(kind = %event.kind, "{msg}"),
            EventKind::CryptoDetail => tracing::debug!(kind = %event.kind, "{msg}"),
        }
    }
}

/// Sends events over an unbounded channel.
///
/// `Sender::send` on an unbounded channel never blocks; if the receiver is
/// gone the event is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<VaultEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<VaultEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &VaultEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<VaultEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<VaultEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Only the messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &VaultEvent) {
        // A poisoned lock only loses the event.
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Forwards every event to each inner sink, in order.
#[derive(Default)]
pub struct Fanout<'a> {
    sinks: Vec<&'a dyn EventSink>,
}

impl<'a> Fanout<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: &'a dyn EventSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EventSink for Fanout<'_> {
    fn emit(&self, event: &VaultEvent) {
        for sink in &self.sinks {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn kind_names_roundtrip() {
        for kind in [
            EventKind::Info,
            EventKind::Warning,
            EventKind::Error,
            EventKind::Success,
            EventKind::CryptoDetail,
        ] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("bogus"), None);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        emit(&sink, EventKind::Info, "one");
        emit(&sink, EventKind::Success, "two");

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], VaultEvent::new(EventKind::Info, "one"));
        assert_eq!(events[1].kind, EventKind::Success);
    }

    #[test]
    fn channel_sink_delivers_events() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);
        emit(&sink, EventKind::CryptoDetail, "salt generated");

        let got = rx.recv().unwrap();
        assert_eq!(got.kind, EventKind::CryptoDetail);
        assert_eq!(got.message, "salt generated");
    }

    #[test]
    fn channel_sink_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let sink = ChannelSink::new(tx);
        // Must not panic or block.
        emit(&sink, EventKind::Error, "nobody listening");
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let a = RecordingSink::new();
        let b = RecordingSink::new();
        let fan = Fanout::new().with(&a).with(&b).with(&NullSink);

        emit(&fan, EventKind::Warning, "legacy format");

        assert_eq!(a.messages(), vec!["legacy format".to_string()]);
        assert_eq!(b.messages(), vec!["legacy format".to_string()]);
    }
}
