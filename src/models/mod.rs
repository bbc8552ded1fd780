pub mod board;
pub mod chess_move;
pub mod game_state;
pub mod messages;
pub mod piece;
pub mod position;
pub mod session;

// Re-export important types
pub use board::*;
pub use chess_move::*;
pub use game_state::*;
pub use messages::*;
pub use piece::*;
pub use position::*;
pub use session::*;
