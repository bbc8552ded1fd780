use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PersistenceError;
use crate::models::SessionId;

/// Everything archived about a finished game
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletedGame {
    pub session_id: SessionId,
    pub moves: Vec<String>,
    pub white_player: String,
    pub black_player: String,
    pub result: String,
}

/// Long-term storage for completed games. Saving the same session twice must
/// leave exactly one record.
pub trait GameStore: Send + Sync {
    fn save_completed_game(&self, game: &CompletedGame) -> Result<(), PersistenceError>;
}

/// Keeps games in memory, keyed by session id
#[derive(Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<SessionId, CompletedGame>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &SessionId) -> Option<CompletedGame> {
        self.games
            .lock()
            .ok()
            .and_then(|games| games.get(session_id).cloned())
    }

    pub fn all(&self) -> Vec<CompletedGame> {
        self.games
            .lock()
            .map(|games| games.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl GameStore for MemoryStore {
    fn save_completed_game(&self, game: &CompletedGame) -> Result<(), PersistenceError> {
        let mut games = self.games.lock().map_err(|e| PersistenceError::Rejected {
            session_id: game.session_id.to_string(),
            message: e.to_string(),
        })?;
        games.insert(game.session_id, game.clone());
        Ok(())
    }
}

/// Writes one pretty-printed JSON file per game into a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(format!("{}.json", session_id))
    }

    pub fn load(&self, session_id: &SessionId) -> Result<CompletedGame, PersistenceError> {
        let text = fs::read_to_string(self.path_for(session_id))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl GameStore for JsonFileStore {
    fn save_completed_game(&self, game: &CompletedGame) -> Result<(), PersistenceError> {
        let path = self.path_for(&game.session_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(game)?)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!("Archived game {} to {}", game.session_id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample() -> CompletedGame {
        CompletedGame {
            session_id: Uuid::new_v4(),
            moves: vec!["wp#(6,4)->(4,4)".to_string(), "bp#(1,4)->(3,4)".to_string()],
            white_player: "alice".to_string(),
            black_player: "bob".to_string(),
            result: "Black wins by resignation".to_string(),
        }
    }

    #[test]
    fn memory_store_overwrites_on_retry() {
        let store = MemoryStore::new();
        let game = sample();
        store.save_completed_game(&game).unwrap();
        store.save_completed_game(&game).unwrap();
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.get(&game.session_id), Some(game));
    }

    #[test]
    fn json_store_round_trips_and_is_idempotent() {
        let dir = std::env::temp_dir().join(format!("chess-archive-{}", Uuid::new_v4()));
        let store = JsonFileStore::new(&dir).unwrap();
        let game = sample();
        store.save_completed_game(&game).unwrap();
        store.save_completed_game(&game).unwrap();

        assert_eq!(store.load(&game.session_id).unwrap(), game);
        let files = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(files, 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = std::env::temp_dir().join(format!("chess-archive-{}", Uuid::new_v4()));
        let store = JsonFileStore::new(&dir).unwrap();
        let game = sample();
        // a directory in the way makes the final rename fail
        fs::create_dir_all(store.path_for(&game.session_id)).unwrap();

        assert!(store.save_completed_game(&game).is_err());
        let tmp = store.path_for(&game.session_id).with_extension("json.tmp");
        assert!(!tmp.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
