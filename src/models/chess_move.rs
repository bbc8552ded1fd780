use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::piece::{Piece, PieceKind};
use crate::models::position::Position;

/// Extra board effects beyond moving one piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialMove {
    None,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion(PieceKind),
}

/// A validated transition, produced by `GameState::apply_move`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub special: SpecialMove,
}

impl Move {
    pub fn promotion(&self) -> Option<PieceKind> {
        match self.special {
            SpecialMove::Promotion(kind) => Some(kind),
            _ => None,
        }
    }

    /// The request that reproduces this move
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            piece: self.piece,
            from: self.from,
            to: self.to,
            promotion: self.promotion(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.request())
    }
}

/// A move as proposed by a client, not yet validated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(piece: Piece, from: Position, to: Position) -> Self {
        MoveRequest {
            piece,
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }
}

/// Wire notation, `wp#(6,4)->(4,4)` with an optional `=q` suffix
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}->{}", self.piece.code(), self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.code())?;
        }
        Ok(())
    }
}
