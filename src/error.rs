//! Error types.
//!
//! `IllegalMoveError` and `ProtocolError` are recovered locally and reported
//! to the offending connection as an `ERROR:<reason>` line; their `Display`
//! text is that reason. `ConnectionError` ends one connection.
//! `PersistenceError` and `IdentityError` come from collaborators and are
//! logged without undoing the in-memory game.

use thiserror::Error;

use crate::models::{Color, GameStatus, Piece, PieceKind, Position};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("game is already over ({0})")]
    GameOver(GameStatus),

    #[error("not your turn, {0} to move")]
    NotYourTurn(Color),

    #[error("no piece at {0}")]
    NoPieceAt(Position),

    #[error("expected {expected} at {at}, found {found}")]
    PieceMismatch {
        at: Position,
        expected: Piece,
        found: Piece,
    },

    #[error("{from}->{to} is not a legal move")]
    IllegalDestination { from: Position, to: Position },

    #[error("cannot promote to {0}")]
    BadPromotion(PieceKind),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unknown piece code: {0}")]
    UnknownPiece(String),

    #[error("square out of bounds: {0}")]
    OutOfBounds(String),

    #[error("spectators cannot move")]
    SpectatorMove,

    #[error("only players can send {0}")]
    SpectatorCommand(String),

    #[error("{0} is sent by the server only")]
    ServerOnly(String),

    #[error("cannot move {0}'s pieces")]
    NotYourPieces(Color),

    #[error("game has not started")]
    NotStarted,
}

/// Why a client message was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store rejected game {session_id}: {message}")]
    Rejected { session_id: String, message: String },
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("empty display name")]
    EmptyName,

    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}
