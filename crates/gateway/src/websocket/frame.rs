//! Chat WebSocket frame protocol.
//!
//! Inbound and outbound frames are discriminated unions with one payload
//! schema per type; the hub never emits an untyped payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelhub_chat::{ChatMessageView, ChatUserInfo};

/// Frames received from clients: `{"type": ..., ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Send a chat message.
    Message {
        #[serde(default)]
        content: String,
        #[serde(rename = "replyTo")]
        reply_to: Option<Uuid>,
        #[serde(rename = "videoId")]
        video_id: Option<Uuid>,
    },
    /// Ephemeral typing indicator.
    Typing,
    /// Application-level liveness probe; answered with `pong`.
    Ping,
}

/// Frames sent to clients: `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    Message(ChatMessageView),
    Typing(UserEvent),
    Pong,
    OnlineCount(OnlineCount),
    UserJoin(UserEvent),
    UserLeave(UserLeave),
    Error(ErrorMessage),
    History(History),
    MessageDeleted(MessageDeleted),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineCount {
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvent {
    pub user: ChatUserInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeave {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub messages: Vec<ChatMessageView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDeleted {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_message_frame_parses_wire_field_names() {
        let reply_to = Uuid::new_v4();
        let json = format!(r#"{{"type":"message","content":"hi","replyTo":"{reply_to}"}}"#);

        let frame: ClientFrame = serde_json::from_str(&json).unwrap();
        match frame {
            ClientFrame::Message {
                content,
                reply_to: parsed_reply,
                video_id,
            } => {
                assert_eq!(content, "hi");
                assert_eq!(parsed_reply, Some(reply_to));
                assert_eq!(video_id, None);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn inbound_typing_and_ping_have_no_payload() {
        assert!(matches!(
            serde_json::from_str::<ClientFrame>(r#"{"type":"typing"}"#).unwrap(),
            ClientFrame::Typing
        ));
        assert!(matches!(
            serde_json::from_str::<ClientFrame>(r#"{"type":"ping"}"#).unwrap(),
            ClientFrame::Ping
        ));
    }

    #[test]
    fn unknown_inbound_type_is_rejected() {
        assert!(serde_json::from_str::<ClientFrame>(r#"{"type":"shutdown"}"#).is_err());
        assert!(serde_json::from_str::<ClientFrame>("not json").is_err());
    }

    #[test]
    fn outbound_frames_are_tagged_with_type_and_data() {
        let json = serde_json::to_value(ServerFrame::OnlineCount(OnlineCount { count: 3 })).unwrap();
        assert_eq!(json["type"], "online_count");
        assert_eq!(json["data"]["count"], 3);

        let json = serde_json::to_value(ServerFrame::MessageDeleted(MessageDeleted {
            id: Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(json["type"], "message_deleted");
        assert_eq!(json["data"]["id"], Uuid::nil().to_string());

        let json = serde_json::to_value(ServerFrame::Error(ErrorMessage {
            message: "you are banned from chat".to_string(),
        }))
        .unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["data"]["message"], "you are banned from chat");
    }

    #[test]
    fn pong_frame_has_no_data_key() {
        let json = serde_json::to_value(ServerFrame::Pong).unwrap();
        assert_eq!(json["type"], "pong");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn user_leave_uses_camel_case_user_id() {
        let user_id = Uuid::new_v4();
        let json = serde_json::to_value(ServerFrame::UserLeave(UserLeave { user_id })).unwrap();
        assert_eq!(json["type"], "user_leave");
        assert_eq!(json["data"]["userId"], user_id.to_string());
    }
}
