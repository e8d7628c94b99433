//! Broadcast Dispatcher
//!
//! Interprets inbound events, mutates the registry, and fans out server
//! events to the relevant subset of connections.

use chrono::Utc;
use parking_lot::Mutex;

use super::protocol::{self, ClientEvent, ServerEvent, UserEntry, ANONYMOUS};
use super::registry::{ConnectionId, Outbound, Registry};

/// Event dispatcher over a single shared registry.
///
/// The registry mutex is held for the whole handling of one inbound event,
/// so registry reads, writes, and all resulting sends for that event happen
/// without interleaving from other connections. Sends are unbounded queue
/// pushes and never block under the lock.
pub struct Dispatcher {
    registry: Mutex<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Mutex::new(registry),
        }
    }

    /// Number of currently logged-in connections.
    pub fn connected(&self) -> usize {
        self.registry.lock().len()
    }

    /// Parse and handle one inbound text frame.
    ///
    /// Malformed frames are logged and dropped; the connection stays open.
    pub fn handle_frame(&self, conn: ConnectionId, outbound: &Outbound, text: &str) {
        match protocol::parse_client_event(text) {
            Ok(event) => self.handle_event(conn, outbound, event),
            Err(err) => {
                tracing::debug!(%conn, error = %err, "dropping malformed frame");
            }
        }
    }

    /// Handle one parsed inbound event.
    pub fn handle_event(&self, conn: ConnectionId, outbound: &Outbound, event: ClientEvent) {
        match event {
            ClientEvent::Login { username } => {
                let mut registry = self.registry.lock();
                registry.register(conn, username.clone(), outbound.clone());

                outbound.send(&ServerEvent::System {
                    message: format!("Welcome, {username}!"),
                    user_count: registry.len(),
                });
                broadcast(
                    &registry,
                    &ServerEvent::System {
                        message: format!("{username} joined the chat"),
                        user_count: registry.len(),
                    },
                    conn,
                );
                broadcast_user_list(&registry);

                tracing::info!(%conn, username = %username, "user logged in");
            }

            ClientEvent::Message { message } => {
                let registry = self.registry.lock();
                broadcast_to_all(
                    &registry,
                    &ServerEvent::Chat {
                        username: display_name(&registry, conn),
                        message,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                );
            }

            ClientEvent::GetUsers => {
                let registry = self.registry.lock();
                outbound.send(&user_list(&registry));
            }

            ClientEvent::Activity { username } => {
                tracing::debug!(%conn, username = %username, "activity");
            }

            ClientEvent::VideoCall { action } => {
                let registry = self.registry.lock();
                let event = ServerEvent::VideoCall {
                    action,
                    username: display_name(&registry, conn),
                };
                broadcast(&registry, &event, conn);
            }

            ClientEvent::ScreenShare { action } => {
                let registry = self.registry.lock();
                let event = ServerEvent::ScreenShare {
                    action,
                    username: display_name(&registry, conn),
                };
                broadcast(&registry, &event, conn);
            }

            ClientEvent::Unknown => {}
        }
    }

    /// Handle a connection close or transport error.
    ///
    /// A connection that never logged in leaves no trace. Otherwise the
    /// departure is announced before the entry is removed, with the count
    /// computed as pre-removal size minus one.
    pub fn handle_close(&self, conn: ConnectionId) {
        let mut registry = self.registry.lock();
        let Some(username) = registry.lookup(conn).map(str::to_owned) else {
            return;
        };

        let remaining = registry.len() - 1;
        broadcast_to_all(
            &registry,
            &ServerEvent::System {
                message: format!("{username} left the chat"),
                user_count: remaining,
            },
        );
        registry.remove(conn);
        broadcast_user_list(&registry);

        tracing::info!(%conn, username = %username, "user disconnected");
    }
}

fn display_name(registry: &Registry, conn: ConnectionId) -> String {
    registry.lookup(conn).unwrap_or(ANONYMOUS).to_owned()
}

fn user_list(registry: &Registry) -> ServerEvent {
    ServerEvent::UserList {
        users: registry
            .usernames()
            .into_iter()
            .map(|username| UserEntry { username })
            .collect(),
        count: registry.len(),
    }
}

/// Send to every tracked connection whose channel is open.
fn broadcast_to_all(registry: &Registry, event: &ServerEvent) {
    for (_, outbound) in registry.snapshot() {
        outbound.send(event);
    }
}

/// Send to every tracked open connection except `exclude`.
fn broadcast(registry: &Registry, event: &ServerEvent, exclude: ConnectionId) {
    for (conn, outbound) in registry.snapshot() {
        if conn != exclude {
            outbound.send(event);
        }
    }
}

/// Send a fresh user-list snapshot to every tracked open connection.
fn broadcast_user_list(registry: &Registry) {
    let event = user_list(registry);
    broadcast_to_all(registry, &event);
}
