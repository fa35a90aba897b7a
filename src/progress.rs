//! Level unlock progress
//!
//! The UI layer owns a [`ProgressStore`]; the run engine never touches it.
//! On the web the record is a single JSON object in LocalStorage, keyed by
//! level id, e.g. `{"level1":true,"level2":false}`.

use std::collections::BTreeMap;

use crate::levels::{BUILTIN_LEVELS, next_level};

/// Key-value record of which levels are unlocked
pub trait ProgressStore {
    fn get(&self, level: &str) -> bool;
    fn set(&mut self, level: &str, unlocked: bool);

    /// Unlock the level after `completed`, returning its id
    fn unlock_next(&mut self, completed: &str) -> Option<&'static str> {
        let next = next_level(completed)?;
        if !self.get(next) {
            log::info!("Unlocked {} after completing {}", next, completed);
        }
        self.set(next, true);
        Some(next)
    }
}

/// Progress as a plain map; the first level is always open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryProgress {
    levels: BTreeMap<String, bool>,
}

impl Default for MemoryProgress {
    fn default() -> Self {
        let mut levels: BTreeMap<String, bool> =
            BUILTIN_LEVELS.iter().map(|id| (id.to_string(), false)).collect();
        levels.insert(BUILTIN_LEVELS[0].to_string(), true);
        Self { levels }
    }
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let mut progress = Self::default();
        let stored: BTreeMap<String, bool> = serde_json::from_str(json)?;
        progress.levels.extend(stored);
        Ok(progress)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&self.levels)?)
    }

    /// Unlocked level ids in play order
    pub fn unlocked(&self) -> Vec<&str> {
        BUILTIN_LEVELS
            .iter()
            .copied()
            .filter(|id| self.get(id))
            .collect()
    }
}

impl ProgressStore for MemoryProgress {
    fn get(&self, level: &str) -> bool {
        self.levels.get(level).copied().unwrap_or(false)
    }

    fn set(&mut self, level: &str, unlocked: bool) {
        self.levels.insert(level.to_string(), unlocked);
    }
}

/// LocalStorage-backed progress (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageProgress {
    cache: MemoryProgress,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageProgress {
    const STORAGE_KEY: &'static str = "syntax_saga_progress";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load progress, writing the default record if none exists
    pub fn load() -> Self {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match MemoryProgress::from_json(&json) {
                    Ok(cache) => {
                        log::info!("Loaded progress ({} unlocked)", cache.unlocked().len());
                        return Self { cache };
                    }
                    Err(err) => log::warn!("Stored progress unreadable, resetting: {}", err),
                }
            }
        }

        log::info!("No progress found, starting fresh");
        let fresh = Self {
            cache: MemoryProgress::default(),
        };
        fresh.save();
        fresh
    }

    fn save(&self) {
        if let Some(storage) = Self::storage() {
            if let Ok(json) = self.cache.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressStore for LocalStorageProgress {
    fn get(&self, level: &str) -> bool {
        self.cache.get(level)
    }

    fn set(&mut self, level: &str, unlocked: bool) {
        self.cache.set(level, unlocked);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_level_open_by_default() {
        let progress = MemoryProgress::new();
        assert!(progress.get("level1"));
        assert!(!progress.get("level2"));
        assert!(!progress.get("nonexistent"));
        assert_eq!(progress.unlocked(), vec!["level1"]);
    }

    #[test]
    fn test_unlock_next_chain() {
        let mut progress = MemoryProgress::new();
        assert_eq!(progress.unlock_next("level1"), Some("level2"));
        assert_eq!(progress.unlock_next("level2"), Some("level3"));
        assert_eq!(progress.unlock_next("level4"), None);
        assert_eq!(progress.unlocked(), vec!["level1", "level2", "level3"]);
    }

    #[test]
    fn test_json_record() {
        let progress = MemoryProgress::from_json(r#"{"level2":true}"#).unwrap();
        assert!(progress.get("level1"));
        assert!(progress.get("level2"));

        let json = progress.to_json().unwrap();
        let again = MemoryProgress::from_json(&json).unwrap();
        assert_eq!(again, progress);

        assert!(MemoryProgress::from_json("[1,2]").is_err());
    }
}
