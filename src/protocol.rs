//! Line-oriented wire protocol.
//!
//! Every message is one UTF-8 line:
//!
//! ```text
//! PLAYER:WHITE | PLAYER:BLACK | SPECTATOR:NONE      role announcement (server)
//! wp#(6,4)->(4,4)[=q]                               move (both directions)
//! CHECKMATE[:W] | STALEMATE | RESIGNATION[:W] | DRAW termination tag, W = winner
//! MOVES:(r,c)                                        legal-move query (client)
//! MOVES:(r,c)->(r,c),(r,c)                           legal-move reply (server)
//! ERROR:<reason>                                     rejection (server)
//! ```

use std::fmt;

use crate::error::ProtocolError;
use crate::models::{Color, ConnectionRole, MoveRequest, Piece, PieceKind, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationTag {
    Checkmate,
    Resignation,
    Draw,
    Stalemate,
}

impl TerminationTag {
    pub fn keyword(self) -> &'static str {
        match self {
            TerminationTag::Checkmate => "CHECKMATE",
            TerminationTag::Resignation => "RESIGNATION",
            TerminationTag::Draw => "DRAW",
            TerminationTag::Stalemate => "STALEMATE",
        }
    }

    fn from_keyword(keyword: &str) -> Option<TerminationTag> {
        match keyword {
            "CHECKMATE" => Some(TerminationTag::Checkmate),
            "RESIGNATION" => Some(TerminationTag::Resignation),
            "DRAW" => Some(TerminationTag::Draw),
            "STALEMATE" => Some(TerminationTag::Stalemate),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireMessage {
    Role(ConnectionRole),
    Move(MoveRequest),
    Termination {
        tag: TerminationTag,
        winner: Option<Color>,
    },
    MovesQuery(Position),
    MovesReply {
        from: Position,
        destinations: Vec<Position>,
    },
    Error(String),
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireMessage::Role(ConnectionRole::PlayerWhite) => f.write_str("PLAYER:WHITE"),
            WireMessage::Role(ConnectionRole::PlayerBlack) => f.write_str("PLAYER:BLACK"),
            WireMessage::Role(ConnectionRole::Spectator) => f.write_str("SPECTATOR:NONE"),
            WireMessage::Move(request) => write!(f, "{}", request),
            WireMessage::Termination { tag, winner } => {
                f.write_str(tag.keyword())?;
                if let Some(color) = winner {
                    write!(f, ":{}", color.tag())?;
                }
                Ok(())
            }
            WireMessage::MovesQuery(from) => write!(f, "MOVES:{}", from),
            WireMessage::MovesReply { from, destinations } => {
                write!(f, "MOVES:{}->", from)?;
                for (i, to) in destinations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", to)?;
                }
                Ok(())
            }
            WireMessage::Error(reason) => write!(f, "ERROR:{}", reason),
        }
    }
}

/// Encode a message as a line, without the terminator
pub fn encode(message: &WireMessage) -> String {
    message.to_string()
}

/// Decode one line. Surrounding whitespace, including a trailing `\r`, is
/// ignored.
pub fn decode(line: &str) -> Result<WireMessage, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Malformed("empty line".to_string()));
    }

    if let Some(rest) = line.strip_prefix("PLAYER:") {
        return match Color::from_tag(rest) {
            Some(Color::White) => Ok(WireMessage::Role(ConnectionRole::PlayerWhite)),
            Some(Color::Black) => Ok(WireMessage::Role(ConnectionRole::PlayerBlack)),
            None => Err(ProtocolError::Malformed(line.to_string())),
        };
    }
    if line == "SPECTATOR:NONE" {
        return Ok(WireMessage::Role(ConnectionRole::Spectator));
    }
    if let Some(rest) = line.strip_prefix("ERROR:") {
        return Ok(WireMessage::Error(rest.to_string()));
    }
    if let Some(rest) = line.strip_prefix("MOVES:") {
        return decode_moves(rest);
    }

    let (keyword, qualifier) = match line.split_once(':') {
        Some((keyword, qualifier)) => (keyword, Some(qualifier)),
        None => (line, None),
    };
    if let Some(tag) = TerminationTag::from_keyword(keyword) {
        let winner = match qualifier {
            None => None,
            Some(q) => Some(Color::from_tag(q).ok_or_else(|| ProtocolError::Malformed(line.to_string()))?),
        };
        return Ok(WireMessage::Termination { tag, winner });
    }

    decode_move(line).map(WireMessage::Move)
}

fn decode_move(line: &str) -> Result<MoveRequest, ProtocolError> {
    let (code, squares) = line
        .split_once('#')
        .ok_or_else(|| ProtocolError::Malformed(line.to_string()))?;
    let piece = Piece::from_code(code).ok_or_else(|| ProtocolError::UnknownPiece(code.to_string()))?;

    let (squares, promotion) = match squares.split_once('=') {
        Some((squares, suffix)) => {
            let mut chars = suffix.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) => PieceKind::from_code(c),
                _ => None,
            };
            let kind = kind.ok_or_else(|| ProtocolError::UnknownPiece(suffix.to_string()))?;
            (squares, Some(kind))
        }
        None => (squares, None),
    };

    let (from, to) = squares
        .split_once("->")
        .ok_or_else(|| ProtocolError::Malformed(line.to_string()))?;
    let mut request = MoveRequest::new(piece, parse_square(from)?, parse_square(to)?);
    request.promotion = promotion;
    Ok(request)
}

fn decode_moves(rest: &str) -> Result<WireMessage, ProtocolError> {
    match rest.split_once("->") {
        None => Ok(WireMessage::MovesQuery(parse_square(rest)?)),
        Some((from, list)) => {
            let from = parse_square(from)?;
            let mut destinations = Vec::new();
            let mut remaining = list.trim();
            while !remaining.is_empty() {
                let end = remaining
                    .find(')')
                    .ok_or_else(|| ProtocolError::Malformed(list.to_string()))?;
                destinations.push(parse_square(&remaining[..=end])?);
                remaining = remaining[end + 1..].trim_start_matches(',').trim_start();
            }
            Ok(WireMessage::MovesReply { from, destinations })
        }
    }
}

/// Parse `(row,col)`, rejecting anything off the board
pub fn parse_square(text: &str) -> Result<Position, ProtocolError> {
    let text = text.trim();
    let inner = text
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ProtocolError::Malformed(text.to_string()))?;
    let (row, col) = inner
        .split_once(',')
        .ok_or_else(|| ProtocolError::Malformed(text.to_string()))?;
    let row: i32 = row
        .trim()
        .parse()
        .map_err(|_| ProtocolError::Malformed(text.to_string()))?;
    let col: i32 = col
        .trim()
        .parse()
        .map_err(|_| ProtocolError::Malformed(text.to_string()))?;
    Position::new(row, col).ok_or_else(|| ProtocolError::OutOfBounds(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameState;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn decodes_move_notation() {
        let msg = decode("wp#(6,4)->(4,4)").unwrap();
        let expected = MoveRequest::new(Piece::from_code("wp").unwrap(), pos(6, 4), pos(4, 4));
        assert_eq!(msg, WireMessage::Move(expected));
    }

    #[test]
    fn applied_move_survives_the_wire() {
        let mut game = GameState::new();
        let mv = game
            .apply_move(MoveRequest::new(Piece::from_code("wn").unwrap(), pos(7, 1), pos(5, 2)))
            .unwrap();
        let line = encode(&WireMessage::Move(mv.request()));
        assert_eq!(line, "wn#(7,1)->(5,2)");
        match decode(&line).unwrap() {
            WireMessage::Move(request) => {
                assert_eq!(request.from, mv.from);
                assert_eq!(request.to, mv.to);
                assert_eq!(request.piece, mv.piece);
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn promotion_suffix() {
        let msg = decode("wp#(1,4)->(0,4)=n").unwrap();
        match msg {
            WireMessage::Move(request) => assert_eq!(request.promotion, Some(PieceKind::Knight)),
            other => panic!("expected a move, got {other:?}"),
        }
        assert!(matches!(decode("wp#(1,4)->(0,4)=x"), Err(ProtocolError::UnknownPiece(_))));
    }

    #[test]
    fn roles_and_tags() {
        assert_eq!(decode("PLAYER:WHITE").unwrap(), WireMessage::Role(ConnectionRole::PlayerWhite));
        assert_eq!(decode("SPECTATOR:NONE").unwrap(), WireMessage::Role(ConnectionRole::Spectator));
        assert_eq!(
            decode("CHECKMATE:BLACK").unwrap(),
            WireMessage::Termination {
                tag: TerminationTag::Checkmate,
                winner: Some(Color::Black)
            }
        );
        assert_eq!(
            decode("DRAW\r").unwrap(),
            WireMessage::Termination {
                tag: TerminationTag::Draw,
                winner: None
            }
        );
        assert_eq!(
            encode(&WireMessage::Termination {
                tag: TerminationTag::Resignation,
                winner: Some(Color::White)
            }),
            "RESIGNATION:WHITE"
        );
        assert!(decode("CHECKMATE:PURPLE").is_err());
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(decode(""), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode("hello"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode("xx#(6,4)->(4,4)"), Err(ProtocolError::UnknownPiece(_))));
        assert!(matches!(decode("wp#(6,4)-(4,4)"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode("wp#(6,4)->(8,4)"), Err(ProtocolError::OutOfBounds(_))));
        assert!(matches!(decode("wp#(6,x)->(4,4)"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn moves_query_and_reply() {
        assert_eq!(decode("MOVES:(6,4)").unwrap(), WireMessage::MovesQuery(pos(6, 4)));
        let reply = WireMessage::MovesReply {
            from: pos(6, 4),
            destinations: vec![pos(4, 4), pos(5, 4)],
        };
        let line = encode(&reply);
        assert_eq!(line, "MOVES:(6,4)->(4,4),(5,4)");
        assert_eq!(decode(&line).unwrap(), reply);

        let empty = WireMessage::MovesReply {
            from: pos(7, 0),
            destinations: vec![],
        };
        assert_eq!(encode(&empty), "MOVES:(7,0)->");
        assert_eq!(decode("MOVES:(7,0)->").unwrap(), empty);
    }

    #[test]
    fn error_lines() {
        assert_eq!(
            decode("ERROR:not your turn").unwrap(),
            WireMessage::Error("not your turn".to_string())
        );
    }
}
