use serde::{Deserialize, Serialize};
use std::fmt;

/// The two sides in a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta a pawn of this color advances by
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this color's rooks and king at the start
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Upper-case tag used by role announcements and termination tags
    pub fn tag(self) -> &'static str {
        match self {
            Color::White => "WHITE",
            Color::Black => "BLACK",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Color> {
        match tag {
            "WHITE" => Some(Color::White),
            "BLACK" => Some(Color::Black),
            _ => None,
        }
    }

    fn code(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Kinds a pawn may promote to
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_code(code: char) -> Option<PieceKind> {
        match code.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Rook => "rook",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

/// A colored chess piece. Plain value, never mutated in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Two-character wire tag: color then kind, e.g. `wp`, `bn`
    pub fn code(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.color.code());
        code.push(self.kind.code());
        code
    }

    pub fn from_code(code: &str) -> Option<Piece> {
        let mut chars = code.chars();
        let color = match chars.next()? {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return None,
        };
        let kind = match chars.next()? {
            c if c.is_ascii_lowercase() => PieceKind::from_code(c)?,
            _ => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Piece::new(kind, color))
    }

    /// FEN letter: upper case for white, lower case for black
    pub fn fen_char(self) -> char {
        match self.color {
            Color::White => self.kind.code().to_ascii_uppercase(),
            Color::Black => self.kind.code(),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_codes() {
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        assert_eq!(knight.code(), "bn");
        assert_eq!(Piece::from_code("wp"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_eq!(Piece::from_code("bk"), Some(Piece::new(PieceKind::King, Color::Black)));
    }

    #[test]
    fn rejects_bad_codes() {
        assert_eq!(Piece::from_code("xp"), None);
        assert_eq!(Piece::from_code("wz"), None);
        assert_eq!(Piece::from_code("wP"), None);
        assert_eq!(Piece::from_code("wpp"), None);
        assert_eq!(Piece::from_code("w"), None);
    }

    #[test]
    fn opponent_flips() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }
}
