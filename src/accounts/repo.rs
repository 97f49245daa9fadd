use std::{collections::BTreeMap, sync::Arc};

use anyhow::Context;
use tracing::{debug, warn};

use crate::accounts::{policy::normalize_email, repo_types::UserRecord};
use crate::storage::SlotStorage;

pub const USERS_SLOT: &str = "users_by_email";

pub type UserMap = BTreeMap<String, UserRecord>;

/// The user map, read and written as one blob.
#[derive(Clone)]
pub struct UserStore {
    slots: Arc<dyn SlotStorage>,
}

impl UserStore {
    pub fn new(slots: Arc<dyn SlotStorage>) -> Self {
        Self { slots }
    }

    /// Loads the whole map. Unreadable or corrupt data yields an empty map.
    pub fn load(&self) -> UserMap {
        let raw = match self.slots.get_item(USERS_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return UserMap::new(),
            Err(e) => {
                warn!(error = %e, "reading users failed; using empty store");
                return UserMap::new();
            }
        };
        match serde_json::from_str::<UserMap>(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "stored users are corrupt; using empty store");
                UserMap::new()
            }
        }
    }

    pub fn save(&self, map: &UserMap) -> anyhow::Result<()> {
        let raw = serde_json::to_string(map).context("serialize users")?;
        self.slots.set_item(USERS_SLOT, &raw)?;
        debug!(count = map.len(), "users saved");
        Ok(())
    }

    pub fn get(&self, email: &str) -> Option<UserRecord> {
        self.load().remove(&normalize_email(email))
    }

    pub fn exists(&self, email: &str) -> bool {
        self.load().contains_key(&normalize_email(email))
    }

    pub fn put(&self, email: &str, record: UserRecord) -> anyhow::Result<()> {
        let mut map = self.load();
        map.insert(normalize_email(email), record);
        self.save(&map)
    }

    pub fn delete(&self, email: &str) -> anyhow::Result<()> {
        let mut map = self.load();
        if map.remove(&normalize_email(email)).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }

    /// Sorted keys.
    pub fn list(&self) -> Vec<String> {
        self.load().into_keys().collect()
    }

    /// Moves a record from `old_email` to `record.email` in a single write.
    pub fn replace(&self, old_email: &str, record: UserRecord) -> anyhow::Result<()> {
        let mut map = self.load();
        map.remove(&normalize_email(old_email));
        map.insert(normalize_email(&record.email), record);
        self.save(&map)
    }
}
