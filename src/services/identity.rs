use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::IdentityError;

/// Maps display names to durable player ids
pub trait IdentityProvider: Send + Sync {
    fn resolve_or_create_player_id(&self, display_name: &str) -> Result<String, IdentityError>;
}

/// Mints a uuid per new display name and remembers it for the process lifetime
#[derive(Default)]
pub struct MemoryIdentities {
    ids: Mutex<HashMap<String, String>>,
}

impl MemoryIdentities {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for MemoryIdentities {
    fn resolve_or_create_player_id(&self, display_name: &str) -> Result<String, IdentityError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        let mut ids = self
            .ids
            .lock()
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        let id = ids
            .entry(name.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string());
        Ok(id.clone())
    }
}
