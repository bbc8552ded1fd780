//! Collaborators the core calls out to. Implementations are handed to the
//! session manager when it is built.

pub mod events;
pub mod identity;
pub mod persistence;

pub use events::{ChannelSink, EventSink, LogSink, SessionEvent};
pub use identity::{IdentityProvider, MemoryIdentities};
pub use persistence::{CompletedGame, GameStore, JsonFileStore, MemoryStore};
