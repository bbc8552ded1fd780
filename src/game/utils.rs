use crate::models::{Board, Color, PieceKind};

/// Check if the board has insufficient material for checkmate
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut minors = [0u32; 2];
    // Square color of the last bishop seen per side
    let mut bishop_on_light = [None; 2];

    for (pos, piece) in board.pieces() {
        let side = match piece.color {
            Color::White => 0,
            Color::Black => 1,
        };
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            PieceKind::Knight => minors[side] += 1,
            PieceKind::Bishop => {
                minors[side] += 1;
                bishop_on_light[side] = Some(pos.is_light());
            }
        }
    }

    match (minors[0], minors[1]) {
        // King vs King, King and minor vs King
        (0, 0) | (1, 0) | (0, 1) => true,
        // King and Bishop vs King and Bishop, bishops on the same color
        (1, 1) => matches!(
            (bishop_on_light[0], bishop_on_light[1]),
            (Some(a), Some(b)) if a == b
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Piece, Position};

    fn board_with(pieces: &[((i32, i32), PieceKind, Color)]) -> Board {
        let mut board = Board::empty();
        board.set(Position::new(7, 4).unwrap(), Some(Piece::new(PieceKind::King, Color::White)));
        board.set(Position::new(0, 4).unwrap(), Some(Piece::new(PieceKind::King, Color::Black)));
        for &((row, col), kind, color) in pieces {
            board.set(Position::new(row, col).unwrap(), Some(Piece::new(kind, color)));
        }
        board
    }

    #[test]
    fn bare_kings() {
        assert!(has_insufficient_material(&board_with(&[])));
    }

    #[test]
    fn single_minor_piece() {
        assert!(has_insufficient_material(&board_with(&[((4, 4), PieceKind::Knight, Color::White)])));
        assert!(has_insufficient_material(&board_with(&[((4, 4), PieceKind::Bishop, Color::Black)])));
    }

    #[test]
    fn bishops_on_same_and_opposite_colors() {
        // (4,4) and (2,2) are both light, (2,3) is dark
        assert!(has_insufficient_material(&board_with(&[
            ((4, 4), PieceKind::Bishop, Color::White),
            ((2, 2), PieceKind::Bishop, Color::Black),
        ])));
        assert!(!has_insufficient_material(&board_with(&[
            ((4, 4), PieceKind::Bishop, Color::White),
            ((2, 3), PieceKind::Bishop, Color::Black),
        ])));
    }

    #[test]
    fn heavy_pieces_or_pawns_can_mate() {
        assert!(!has_insufficient_material(&board_with(&[((4, 4), PieceKind::Rook, Color::White)])));
        assert!(!has_insufficient_material(&board_with(&[((4, 4), PieceKind::Pawn, Color::Black)])));
        assert!(!has_insufficient_material(&Board::initial_standard_setup()));
    }

    #[test]
    fn two_knights_are_not_flagged() {
        assert!(!has_insufficient_material(&board_with(&[
            ((4, 4), PieceKind::Knight, Color::White),
            ((4, 5), PieceKind::Knight, Color::White),
        ])));
    }
}
