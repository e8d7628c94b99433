//! Connection Registry
//!
//! The in-memory mapping from live connections to display names; the single
//! source of truth for "who is present." Entries are kept in insertion order
//! so user lists and broadcasts are deterministic within a single fanout.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use super::protocol::ServerEvent;

/// Process-unique identifier for one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next connection identifier.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Handle to one connection's outbound message queue.
///
/// Sends are fire-and-forget: closed channels are skipped silently, and no
/// delivery confirmation is awaited.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl Outbound {
    pub fn new(tx: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self { tx }
    }

    /// Create a paired outbound handle and receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Whether the receiving side of the queue is still attached.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Queue an event for delivery; a no-op if the channel is closed.
    pub fn send(&self, event: &ServerEvent) {
        if self.is_open() {
            let _ = self.tx.send(event.clone());
        }
    }
}

/// One registry entry: a live connection paired with its chosen display name.
#[derive(Debug)]
struct Session {
    conn: ConnectionId,
    username: String,
    outbound: Outbound,
}

/// Ordered mapping of all current sessions, keyed by connection.
///
/// Invariant: the registry holds exactly one entry per logged-in open
/// connection. Mutated only by the dispatcher.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: Vec<Session>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry for `conn`.
    ///
    /// A repeated login overwrites the display name in place: no duplicate
    /// entry, and the original insertion position is kept.
    pub fn register(&mut self, conn: ConnectionId, username: String, outbound: Outbound) {
        match self.sessions.iter_mut().find(|s| s.conn == conn) {
            Some(session) => {
                session.username = username;
                session.outbound = outbound;
            }
            None => self.sessions.push(Session {
                conn,
                username,
                outbound,
            }),
        }
    }

    /// The display name registered for `conn`, if any.
    pub fn lookup(&self, conn: ConnectionId) -> Option<&str> {
        self.sessions
            .iter()
            .find(|s| s.conn == conn)
            .map(|s| s.username.as_str())
    }

    /// Delete the entry for `conn`; a no-op if absent.
    pub fn remove(&mut self, conn: ConnectionId) {
        self.sessions.retain(|s| s.conn != conn);
    }

    /// Number of currently registered connections.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of all display names, in insertion order.
    pub fn usernames(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.username.clone()).collect()
    }

    /// Snapshot of all connections and their outbound handles.
    ///
    /// Broadcasts iterate this copy rather than the live session list, so a
    /// mutation triggered mid-fanout cannot invalidate the iteration.
    pub fn snapshot(&self) -> Vec<(ConnectionId, Outbound)> {
        self.sessions
            .iter()
            .map(|s| (s.conn, s.outbound.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound() -> Outbound {
        Outbound::channel().0
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = Registry::new();
        let conn = ConnectionId::next();

        assert_eq!(registry.lookup(conn), None);
        registry.register(conn, "alice".into(), outbound());
        assert_eq!(registry.lookup(conn), Some("alice"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn re_register_overwrites_in_place() {
        let mut registry = Registry::new();
        let first = ConnectionId::next();
        let second = ConnectionId::next();

        registry.register(first, "alice".into(), outbound());
        registry.register(second, "bob".into(), outbound());
        registry.register(first, "alicia".into(), outbound());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(first), Some("alicia"));
        // Insertion position is preserved on overwrite.
        assert_eq!(registry.usernames(), vec!["alicia", "bob"]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut registry = Registry::new();
        let conn = ConnectionId::next();

        registry.remove(conn);
        assert!(registry.is_empty());

        registry.register(conn, "alice".into(), outbound());
        registry.remove(conn);
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(conn), None);
    }

    #[test]
    fn duplicate_names_across_connections_are_permitted() {
        let mut registry = Registry::new();
        registry.register(ConnectionId::next(), "alice".into(), outbound());
        registry.register(ConnectionId::next(), "alice".into(), outbound());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.usernames(), vec!["alice", "alice"]);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut registry = Registry::new();
        let a = ConnectionId::next();
        let b = ConnectionId::next();
        let c = ConnectionId::next();

        registry.register(a, "a".into(), outbound());
        registry.register(b, "b".into(), outbound());
        registry.register(c, "c".into(), outbound());
        registry.remove(b);

        let conns: Vec<ConnectionId> = registry.snapshot().into_iter().map(|(id, _)| id).collect();
        assert_eq!(conns, vec![a, c]);
    }

    #[test]
    fn outbound_reports_closed_after_receiver_drop() {
        let (outbound, rx) = Outbound::channel();
        assert!(outbound.is_open());
        drop(rx);
        assert!(!outbound.is_open());
    }
}
