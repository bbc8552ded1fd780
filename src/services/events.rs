use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use crate::models::{ConnectionId, ConnectionRole, Move, SessionId};

/// Notifications for rendering layers. The core only produces them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    RoleAssigned {
        session_id: SessionId,
        connection: ConnectionId,
        role: ConnectionRole,
    },
    MoveApplied {
        session_id: SessionId,
        #[serde(rename = "move")]
        mv: Move,
        /// FEN after the move
        board: String,
    },
    GameEnded {
        session_id: SessionId,
        result: String,
    },
}

pub trait EventSink: Send {
    fn emit(&self, event: SessionEvent);
}

/// Logs each event as JSON at debug level
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SessionEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => debug!("Session event: {}", json),
            Err(e) => debug!("Session event {:?} (not serializable: {})", event, e),
        }
    }
}

/// Forwards events over a channel; a dropped receiver is ignored
pub struct ChannelSink {
    sender: Sender<SessionEvent>,
}

impl ChannelSink {
    pub fn new(sender: Sender<SessionEvent>) -> Self {
        ChannelSink { sender }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use uuid::Uuid;

    fn ended() -> SessionEvent {
        SessionEvent::GameEnded {
            session_id: Uuid::new_v4(),
            result: "Draw by agreement".to_string(),
        }
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);
        let event = ended();
        sink.emit(event.clone());
        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn channel_sink_ignores_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelSink::new(tx).emit(ended());
    }

    #[test]
    fn sinks_are_sendable_across_threads() {
        let (tx, rx) = mpsc::channel();
        let sink: Box<dyn EventSink> = Box::new(ChannelSink::new(tx));
        std::thread::spawn(move || sink.emit(ended())).join().unwrap();
        assert!(matches!(rx.try_recv().unwrap(), SessionEvent::GameEnded { .. }));
    }
}
