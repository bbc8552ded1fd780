pub mod handler;
pub mod listener;

pub use handler::ChessConnection;
pub use listener::ChessListener;
