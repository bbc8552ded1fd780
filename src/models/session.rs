use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::models::{Color, GameState};

pub type ConnectionId = Uuid;
pub type SessionId = Uuid;

/// Role assigned to a connection when it arrives. Fixed for the life of the
/// connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionRole {
    PlayerWhite,
    PlayerBlack,
    Spectator,
}

impl ConnectionRole {
    pub fn player(color: Color) -> Self {
        match color {
            Color::White => ConnectionRole::PlayerWhite,
            Color::Black => ConnectionRole::PlayerBlack,
        }
    }

    /// Seat color, `None` for spectators
    pub fn color(self) -> Option<Color> {
        match self {
            ConnectionRole::PlayerWhite => Some(Color::White),
            ConnectionRole::PlayerBlack => Some(Color::Black),
            ConnectionRole::Spectator => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    WaitingForPlayers,
    InProgress,
    Completed,
}

/// A player's seat in a session
#[derive(Clone, Debug)]
pub struct Seat {
    pub connection: ConnectionId,
    pub display_name: String,
    /// Durable id, resolved when the session pairs up
    pub player_id: Option<String>,
}

/// Two player seats, any number of spectators, and the game they share
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub white: Option<Seat>,
    pub black: Option<Seat>,
    pub spectators: BTreeSet<ConnectionId>,
    /// Applied moves in wire notation, oldest first
    pub history: Vec<String>,
    pub status: SessionStatus,
    pub game: Option<GameState>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            white: None,
            black: None,
            spectators: BTreeSet::new(),
            history: Vec::new(),
            status: SessionStatus::WaitingForPlayers,
            game: None,
        }
    }

    pub fn seat(&self, color: Color) -> Option<&Seat> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    fn seat_slot(&mut self, color: Color) -> &mut Option<Seat> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Seat a connection in the first free player slot, white before black
    pub fn take_seat(&mut self, connection: ConnectionId, display_name: String) -> Option<Color> {
        let color = if self.white.is_none() {
            Color::White
        } else if self.black.is_none() {
            Color::Black
        } else {
            return None;
        };
        *self.seat_slot(color) = Some(Seat {
            connection,
            display_name,
            player_id: None,
        });
        Some(color)
    }

    /// Free whatever role `connection` held
    pub fn vacate(&mut self, connection: ConnectionId) {
        for color in Color::ALL {
            let slot = self.seat_slot(color);
            if slot.as_ref().map(|seat| seat.connection) == Some(connection) {
                *slot = None;
            }
        }
        self.spectators.remove(&connection);
    }

    pub fn is_full(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.white.is_none() && self.black.is_none() && self.spectators.is_empty()
    }

    pub fn role_of(&self, connection: ConnectionId) -> Option<ConnectionRole> {
        for color in Color::ALL {
            if self.seat(color).map(|seat| seat.connection) == Some(connection) {
                return Some(ConnectionRole::player(color));
            }
        }
        self.spectators
            .contains(&connection)
            .then_some(ConnectionRole::Spectator)
    }

    /// Every connection attached to the session, players first
    pub fn members(&self) -> Vec<ConnectionId> {
        self.white
            .iter()
            .chain(self.black.iter())
            .map(|seat| seat.connection)
            .chain(self.spectators.iter().copied())
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            status: self.status,
            white_player: self.white.as_ref().and_then(|seat| seat.player_id.clone()),
            black_player: self.black.as_ref().and_then(|seat| seat.player_id.clone()),
            spectators: self.spectators.len(),
            moves_played: self.history.len(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of a session for introspection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub status: SessionStatus,
    pub white_player: Option<String>,
    pub black_player: Option<String>,
    pub spectators: usize,
    pub moves_played: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_fill_white_then_black() {
        let mut session = Session::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(session.take_seat(a, "a".into()), Some(Color::White));
        assert_eq!(session.take_seat(b, "b".into()), Some(Color::Black));
        assert_eq!(session.take_seat(c, "c".into()), None);
        assert!(session.is_full());
        assert_eq!(session.role_of(b), Some(ConnectionRole::PlayerBlack));
        assert_eq!(session.role_of(c), None);
    }

    #[test]
    fn vacated_white_seat_is_refilled_first() {
        let mut session = Session::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        session.take_seat(a, "a".into());
        session.take_seat(b, "b".into());
        session.vacate(a);
        assert!(!session.is_full());
        assert_eq!(session.take_seat(c, "c".into()), Some(Color::White));
    }

    #[test]
    fn members_lists_players_then_spectators() {
        let mut session = Session::new();
        let (a, b, s) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        session.take_seat(a, "a".into());
        session.take_seat(b, "b".into());
        session.spectators.insert(s);
        assert_eq!(session.members(), vec![a, b, s]);
        assert_eq!(session.role_of(s), Some(ConnectionRole::Spectator));
        session.vacate(s);
        assert_eq!(session.summary().spectators, 0);
    }
}
