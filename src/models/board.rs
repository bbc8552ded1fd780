use crate::models::piece::{Color, Piece, PieceKind};
use crate::models::position::{Position, BOARD_SIZE};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8x8 grid of optional pieces. Pure data: lookup and placement only.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Board::default()
    }

    /// Standard starting position, white on rows 6 and 7
    pub fn initial_standard_setup() -> Self {
        let mut board = Board::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.squares[0][col] = Some(Piece::new(*kind, Color::Black));
            board.squares[1][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.squares[6][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.squares[7][col] = Some(Piece::new(*kind, Color::White));
        }
        board
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row() as usize][pos.col() as usize]
    }

    /// Place (or clear, with `None`) a square, returning what was there
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[pos.row() as usize][pos.col() as usize], piece)
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Every occupied square with its piece
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    /// Piece-placement field of a FEN string
    pub fn placement_fen(&self) -> String {
        let mut fen = String::new();
        for row in 0..BOARD_SIZE {
            let mut gap = 0;
            for col in 0..BOARD_SIZE {
                match self.squares[row as usize][col as usize] {
                    Some(piece) => {
                        if gap > 0 {
                            fen.push_str(&gap.to_string());
                            gap = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                fen.push_str(&gap.to_string());
            }
            if row + 1 < BOARD_SIZE {
                fen.push('/');
            }
        }
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn standard_setup() {
        let board = Board::initial_standard_setup();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.get(pos(7, 4)), Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(board.get(pos(0, 3)), Some(Piece::new(PieceKind::Queen, Color::Black)));
        assert_eq!(board.get(pos(6, 0)), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert!(board.is_empty(pos(4, 4)));
        assert_eq!(board.find_king(Color::Black), Some(pos(0, 4)));
    }

    #[test]
    fn set_returns_previous() {
        let mut board = Board::empty();
        let rook = Piece::new(PieceKind::Rook, Color::White);
        assert_eq!(board.set(pos(3, 3), Some(rook)), None);
        assert_eq!(board.set(pos(3, 3), None), Some(rook));
        assert!(board.is_empty(pos(3, 3)));
    }

    #[test]
    fn placement_fen_of_start() {
        assert_eq!(
            Board::initial_standard_setup().placement_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(Board::empty().placement_fen(), "8/8/8/8/8/8/8/8");
    }
}
