use crate::game::movegen::{has_legal_move, is_square_attacked};
use crate::models::{Board, Color, GameState, Move, Piece, Position, SpecialMove};

/// True iff some piece of the other color attacks `color`'s king
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.opponent()),
        None => false,
    }
}

pub fn is_checkmate(state: &GameState, color: Color) -> bool {
    is_in_check(state.board(), color) && !has_legal_move(state, color)
}

pub fn is_stalemate(state: &GameState, color: Color) -> bool {
    !is_in_check(state.board(), color) && !has_legal_move(state, color)
}

/// Play `mv` on `board`: captures, castling rook co-movement, en passant
/// pawn removal and promotion substitution. No legality checks.
pub fn make_move_on(board: &mut Board, mv: &Move) {
    board.set(mv.from, None);

    match mv.special {
        SpecialMove::EnPassant => {
            if let Some(victim) = Position::new(mv.from.row() as i32, mv.to.col() as i32) {
                board.set(victim, None);
            }
            board.set(mv.to, Some(mv.piece));
        }
        SpecialMove::Promotion(kind) => {
            board.set(mv.to, Some(Piece::new(kind, mv.piece.color)));
        }
        SpecialMove::CastleKingside | SpecialMove::CastleQueenside => {
            board.set(mv.to, Some(mv.piece));
            let row = mv.from.row() as i32;
            let (rook_from, rook_to) = if mv.special == SpecialMove::CastleKingside {
                (7, 5)
            } else {
                (0, 3)
            };
            if let (Some(from), Some(to)) = (Position::new(row, rook_from), Position::new(row, rook_to)) {
                let rook = board.set(from, None);
                board.set(to, rook);
            }
        }
        SpecialMove::None => {
            board.set(mv.to, Some(mv.piece));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CastlingRights, PieceKind};

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn start_position_is_quiet() {
        let state = GameState::new();
        assert!(!is_in_check(state.board(), Color::White));
        assert!(!is_checkmate(&state, Color::White));
        assert!(!is_stalemate(&state, Color::Black));
    }

    #[test]
    fn back_rank_mate() {
        let mut board = Board::empty();
        board.set(pos(0, 6), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set(pos(1, 5), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        board.set(pos(1, 6), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        board.set(pos(1, 7), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        board.set(pos(0, 0), Some(Piece::new(PieceKind::Rook, Color::White)));
        board.set(pos(7, 4), Some(Piece::new(PieceKind::King, Color::White)));
        let state = GameState::from_parts(board, Color::Black, CastlingRights::none(), None);
        assert!(is_in_check(state.board(), Color::Black));
        assert!(is_checkmate(&state, Color::Black));
        assert!(!is_stalemate(&state, Color::Black));
    }

    #[test]
    fn cornered_king_stalemate() {
        let mut board = Board::empty();
        board.set(pos(0, 7), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set(pos(2, 6), Some(Piece::new(PieceKind::Queen, Color::White)));
        board.set(pos(7, 0), Some(Piece::new(PieceKind::King, Color::White)));
        let state = GameState::from_parts(board, Color::Black, CastlingRights::none(), None);
        assert!(!is_in_check(state.board(), Color::Black));
        assert!(is_stalemate(&state, Color::Black));
        assert!(!is_checkmate(&state, Color::Black));
    }

    #[test]
    fn castling_moves_the_rook() {
        let mut board = Board::empty();
        let king = Piece::new(PieceKind::King, Color::White);
        let rook = Piece::new(PieceKind::Rook, Color::White);
        board.set(pos(7, 4), Some(king));
        board.set(pos(7, 0), Some(rook));
        let mv = Move {
            from: pos(7, 4),
            to: pos(7, 2),
            piece: king,
            captured: None,
            special: SpecialMove::CastleQueenside,
        };
        make_move_on(&mut board, &mv);
        assert_eq!(board.get(pos(7, 2)), Some(king));
        assert_eq!(board.get(pos(7, 3)), Some(rook));
        assert!(board.is_empty(pos(7, 0)));
        assert!(board.is_empty(pos(7, 4)));
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut board = Board::empty();
        let white = Piece::new(PieceKind::Pawn, Color::White);
        let black = Piece::new(PieceKind::Pawn, Color::Black);
        board.set(pos(3, 4), Some(white));
        board.set(pos(3, 5), Some(black));
        let mv = Move {
            from: pos(3, 4),
            to: pos(2, 5),
            piece: white,
            captured: Some(black),
            special: SpecialMove::EnPassant,
        };
        make_move_on(&mut board, &mv);
        assert_eq!(board.get(pos(2, 5)), Some(white));
        assert!(board.is_empty(pos(3, 5)));
    }
}
