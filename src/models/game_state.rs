use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::IllegalMoveError;
use crate::game::movegen::{self, build_move};
use crate::game::rules::{is_checkmate, is_stalemate, make_move_on};
use crate::game::utils::has_insufficient_material;
use crate::models::{Board, Color, Move, MoveRequest, PieceKind, Position, SpecialMove};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Checkmate,
    Stalemate,
    Resigned,
    Drawn,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Resigned => "resigned",
            GameStatus::Drawn => "drawn",
        };
        f.write_str(text)
    }
}

/// Which castles are still available. A right is lost for good once the king
/// or that wing's rook moves, or the rook is captured on its home square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color, kingside: bool, queenside: bool) {
        let (k, q) = match color {
            Color::White => (&mut self.white_kingside, &mut self.white_queenside),
            Color::Black => (&mut self.black_kingside, &mut self.black_queenside),
        };
        *k &= !kingside;
        *q &= !queenside;
    }

    /// Drop rights touched by a move leaving or landing on `square`
    fn touch(&mut self, square: Position) {
        for color in Color::ALL {
            if square.row() != color.back_rank() {
                continue;
            }
            match square.col() {
                0 => self.revoke(color, false, true),
                4 => self.revoke(color, true, true),
                7 => self.revoke(color, true, false),
                _ => {}
            }
        }
    }

    fn fen(&self) -> String {
        let mut fen = String::new();
        for (flag, c) in [
            (self.white_kingside, 'K'),
            (self.white_queenside, 'Q'),
            (self.black_kingside, 'k'),
            (self.black_queenside, 'q'),
        ] {
            if flag {
                fen.push(c);
            }
        }
        if fen.is_empty() {
            fen.push('-');
        }
        fen
    }
}

/// One game: the board plus everything needed to decide legality and
/// termination. Mutated only through `apply_move`, `resign`, `declare_draw`
/// and `forfeit`; frozen once the status is terminal.
#[derive(Clone, Debug)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    move_number: u32,
    status: GameStatus,
    result_text: Option<String>,
    winner: Option<Color>,
    castling: CastlingRights,
    en_passant: Option<Position>,
    halfmove_clock: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard initial position, white to move
    pub fn new() -> Self {
        Self::from_parts(
            Board::initial_standard_setup(),
            Color::White,
            CastlingRights::all(),
            None,
        )
    }

    /// Arbitrary position, used to set up studies and tests
    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Position>,
    ) -> Self {
        GameState {
            board,
            side_to_move,
            move_number: 1,
            status: GameStatus::InProgress,
            result_text: None,
            winner: None,
            castling,
            en_passant,
            halfmove_clock: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn result_text(&self) -> Option<&str> {
        self.result_text.as_deref()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Position> {
        self.en_passant
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Legal destinations for the piece on `from`
    pub fn legal_moves(&self, from: Position) -> BTreeSet<Position> {
        movegen::legal_moves(self, from)
    }

    /// Every legal `(from, to)` for the side to move
    pub fn all_legal_moves(&self) -> Vec<(Position, Position)> {
        movegen::all_legal_moves(self, self.side_to_move)
    }

    /// Validate `request` against the current position and play it
    pub fn apply_move(&mut self, request: MoveRequest) -> Result<Move, IllegalMoveError> {
        if self.is_over() {
            return Err(IllegalMoveError::GameOver(self.status));
        }
        if request.piece.color != self.side_to_move {
            return Err(IllegalMoveError::NotYourTurn(self.side_to_move));
        }
        match self.board.get(request.from) {
            None => return Err(IllegalMoveError::NoPieceAt(request.from)),
            Some(found) if found != request.piece => {
                return Err(IllegalMoveError::PieceMismatch {
                    at: request.from,
                    expected: request.piece,
                    found,
                })
            }
            Some(_) => {}
        }
        if let Some(kind) = request.promotion {
            if !kind.is_promotion_target() {
                return Err(IllegalMoveError::BadPromotion(kind));
            }
        }
        if !self.legal_moves(request.from).contains(&request.to) {
            return Err(IllegalMoveError::IllegalDestination {
                from: request.from,
                to: request.to,
            });
        }

        let mv = build_move(self, request.piece, request.from, request.to, request.promotion);
        if let Some(kind) = request.promotion {
            if !matches!(mv.special, SpecialMove::Promotion(_)) {
                return Err(IllegalMoveError::BadPromotion(kind));
            }
        }

        make_move_on(&mut self.board, &mv);
        self.update_bookkeeping(&mv);
        self.refresh_status();
        Ok(mv)
    }

    /// `color` gives up. No-op once the game is over.
    pub fn resign(&mut self, color: Color) {
        self.concede(color, "resignation");
    }

    /// `color` lost its connection mid-game. No-op once the game is over.
    pub fn forfeit(&mut self, color: Color) {
        self.concede(color, "forfeit");
    }

    /// End the game drawn. No-op once the game is over.
    pub fn declare_draw(&mut self) {
        if self.is_over() {
            return;
        }
        self.finish(GameStatus::Drawn, None, "Draw by agreement".to_string());
    }

    /// Full FEN of the current position
    pub fn fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map(Position::algebraic)
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.board.placement_fen(),
            side,
            self.castling.fen(),
            en_passant,
            self.halfmove_clock,
            self.move_number
        )
    }

    fn concede(&mut self, loser: Color, reason: &str) {
        if self.is_over() {
            return;
        }
        let winner = loser.opponent();
        self.finish(
            GameStatus::Resigned,
            Some(winner),
            format!("{} wins by {}", winner, reason),
        );
    }

    fn finish(&mut self, status: GameStatus, winner: Option<Color>, text: String) {
        self.status = status;
        self.winner = winner;
        self.result_text = Some(text);
    }

    fn update_bookkeeping(&mut self, mv: &Move) {
        self.castling.touch(mv.from);
        self.castling.touch(mv.to);

        self.en_passant = None;
        if mv.piece.kind == PieceKind::Pawn {
            let distance = mv.to.row() as i32 - mv.from.row() as i32;
            if distance.abs() == 2 {
                self.en_passant = Position::new(mv.from.row() as i32 + distance / 2, mv.from.col() as i32);
            }
        }

        if mv.piece.kind == PieceKind::Pawn || mv.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if mv.piece.color == Color::Black {
            self.move_number += 1;
        }
        self.side_to_move = mv.piece.color.opponent();
    }

    fn refresh_status(&mut self) {
        let to_move = self.side_to_move;
        if is_checkmate(self, to_move) {
            let winner = to_move.opponent();
            self.finish(
                GameStatus::Checkmate,
                Some(winner),
                format!("{} wins by checkmate", winner),
            );
        } else if is_stalemate(self, to_move) {
            self.finish(GameStatus::Stalemate, None, "Draw by stalemate".to_string());
        } else if has_insufficient_material(&self.board) {
            self.finish(
                GameStatus::Drawn,
                None,
                "Draw by insufficient material".to_string(),
            );
        }
    }
}
