//! Networked two-player chess.
//!
//! Clients connect over TCP and exchange newline-terminated text lines. The
//! first two connections of a session play white and black, later ones
//! spectate. The server validates every move against full chess rules and
//! relays accepted moves to the rest of the session.

pub mod config;
pub mod connection;
pub mod error;
pub mod game;
pub mod models;
pub mod protocol;
pub mod services;
pub mod session;

pub use config::ServerConfig;
pub use connection::ChessListener;
pub use session::SessionManager;
