use actix::{Message, Recipient};

use crate::models::{ConnectionId, SessionSummary};

/// Sent from the session manager to a connection actor
#[derive(Message, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
pub enum Outbound {
    /// Queue one line for the peer
    Line(String),
    /// Flush what is queued, then close the socket
    Close,
}

/// A new connection wants a role
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: ConnectionId,
    /// Peer address, used as the display name
    pub peer: String,
    pub outbound: Recipient<Outbound>,
}

/// One complete line received from a connection, terminator stripped.
/// Bytes are passed through untouched; they may not be UTF-8.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct Inbound {
    pub id: ConnectionId,
    pub line: Vec<u8>,
}

/// The connection is gone (EOF, read or write failure)
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: ConnectionId,
}

/// Snapshot of every live session
#[derive(Message, Debug)]
#[rtype(result = "Vec<SessionSummary>")]
pub struct ListSessions;
