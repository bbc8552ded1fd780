use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board
pub const BOARD_SIZE: u8 = 8;

/// A square on the board. Row 0 is Black's back rank, column 0 is the a-file.
///
/// Fields are private so a `Position` can only be built through the
/// bounds-checked constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Option<Position> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    /// The square `dr` rows and `dc` columns away, if still on the board
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        Position::new(self.row as i32 + dr as i32, self.col as i32 + dc as i32)
    }

    /// All 64 squares in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }

    /// Algebraic name of the square, e.g. `e2` for (6,4)
    pub fn algebraic(self) -> String {
        let file = (b'a' + self.col) as char;
        let rank = BOARD_SIZE - self.row;
        format!("{}{}", file, rank)
    }

    /// True for the light squares (a8, b7, ...)
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = String;

    fn try_from((row, col): (u8, u8)) -> Result<Self, Self::Error> {
        Position::new(row as i32, col as i32).ok_or_else(|| format!("({},{}) is off the board", row, col))
    }
}

impl From<Position> for (u8, u8) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_enforced() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(7, 7).is_some());
        assert!(Position::new(8, 0).is_none());
        assert!(Position::new(0, -1).is_none());
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = Position::new(0, 0).unwrap();
        assert_eq!(corner.offset(1, 1), Position::new(1, 1));
        assert_eq!(corner.offset(-1, 0), None);
    }

    #[test]
    fn algebraic_names() {
        assert_eq!(Position::new(6, 4).unwrap().algebraic(), "e2");
        assert_eq!(Position::new(0, 0).unwrap().algebraic(), "a8");
        assert_eq!(Position::new(7, 7).unwrap().algebraic(), "h1");
    }

    #[test]
    fn deserialization_checks_bounds() {
        let pos: Position = serde_json::from_str("[6,4]").unwrap();
        assert_eq!(pos, Position::new(6, 4).unwrap());
        assert!(serde_json::from_str::<Position>("[9,4]").is_err());
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[6,4]");
    }

    #[test]
    fn all_squares() {
        assert_eq!(Position::all().count(), 64);
    }
}
