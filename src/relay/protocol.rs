//! Relay Protocol Types
//!
//! Inbound and outbound message formats. Both directions are tagged unions
//! discriminated by a `type` field, carried as JSON text frames.

use serde::{Deserialize, Serialize};

/// Default display name for connections that have not logged in.
pub const ANONYMOUS: &str = "Anonymous";

/// Protocol-level parse failure.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] serde_json::Error),
}

/// Inbound client event.
///
/// Unrecognized `type` tags map to [`ClientEvent::Unknown`] so that new or
/// bogus event kinds degrade to a no-op instead of an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    Login { username: String },
    Message { message: String },
    GetUsers,
    Activity { username: String },
    VideoCall { action: String },
    ScreenShare { action: String },
    #[serde(other)]
    Unknown,
}

/// Outbound server event. Constructed, serialized, sent, discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    System {
        message: String,
        user_count: usize,
    },
    Chat {
        username: String,
        message: String,
        timestamp: String,
    },
    UserList {
        users: Vec<UserEntry>,
        count: usize,
    },
    VideoCall {
        action: String,
        username: String,
    },
    ScreenShare {
        action: String,
        username: String,
    },
}

/// One entry of a `userList` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEntry {
    pub username: String,
}

/// Parse one inbound text frame.
pub fn parse_client_event(text: &str) -> Result<ClientEvent, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_every_recognized_event_kind() {
        assert_eq!(
            parse_client_event(r#"{"type":"login","username":"alice"}"#).unwrap(),
            ClientEvent::Login {
                username: "alice".into()
            }
        );
        assert_eq!(
            parse_client_event(r#"{"type":"message","message":"hi"}"#).unwrap(),
            ClientEvent::Message {
                message: "hi".into()
            }
        );
        assert_eq!(
            parse_client_event(r#"{"type":"getUsers"}"#).unwrap(),
            ClientEvent::GetUsers
        );
        assert_eq!(
            parse_client_event(r#"{"type":"activity","username":"alice"}"#).unwrap(),
            ClientEvent::Activity {
                username: "alice".into()
            }
        );
        assert_eq!(
            parse_client_event(r#"{"type":"videoCall","action":"start"}"#).unwrap(),
            ClientEvent::VideoCall {
                action: "start".into()
            }
        );
        assert_eq!(
            parse_client_event(r#"{"type":"screenShare","action":"stop"}"#).unwrap(),
            ClientEvent::ScreenShare {
                action: "stop".into()
            }
        );
    }

    #[test]
    fn unknown_tag_maps_to_unknown_variant() {
        assert_eq!(
            parse_client_event(r#"{"type":"typing","username":"alice"}"#).unwrap(),
            ClientEvent::Unknown
        );
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(parse_client_event("not json").is_err());
        assert!(parse_client_event(r#"{"no":"type"}"#).is_err());
        // Missing required field for a recognized kind.
        assert!(parse_client_event(r#"{"type":"login"}"#).is_err());
    }

    #[test]
    fn empty_username_is_accepted() {
        assert_eq!(
            parse_client_event(r#"{"type":"login","username":""}"#).unwrap(),
            ClientEvent::Login { username: "".into() }
        );
    }

    #[test]
    fn server_events_serialize_with_camel_case_fields() {
        let system = ServerEvent::System {
            message: "Welcome, alice!".into(),
            user_count: 3,
        };
        assert_eq!(
            serde_json::to_value(&system).unwrap(),
            json!({"type": "system", "message": "Welcome, alice!", "userCount": 3})
        );

        let list = ServerEvent::UserList {
            users: vec![UserEntry {
                username: "alice".into(),
            }],
            count: 1,
        };
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"type": "userList", "users": [{"username": "alice"}], "count": 1})
        );

        let share = ServerEvent::ScreenShare {
            action: "start".into(),
            username: "alice".into(),
        };
        assert_eq!(
            serde_json::to_value(&share).unwrap(),
            json!({"type": "screenShare", "action": "start", "username": "alice"})
        );
    }

    #[test]
    fn chat_event_carries_timestamp_field() {
        let chat = ServerEvent::Chat {
            username: ANONYMOUS.into(),
            message: "hello".into(),
            timestamp: "2026-01-01T00:00:00+00:00".into(),
        };
        assert_eq!(
            serde_json::to_value(&chat).unwrap(),
            json!({
                "type": "chat",
                "username": "Anonymous",
                "message": "hello",
                "timestamp": "2026-01-01T00:00:00+00:00"
            })
        );
    }
}
