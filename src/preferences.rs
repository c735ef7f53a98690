//! Display preferences persisted next to the session

use crate::storage::{keys, KeyValueStore, StorageResult};

/// Dashboard colour theme (`darkMode` entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Read the stored theme; missing or unreadable values mean light
    pub fn load(store: &dyn KeyValueStore) -> Theme {
        match store.get(keys::DARK_MODE) {
            Ok(Some(value)) if value.trim() == "true" => Theme::Dark,
            Ok(_) => Theme::Light,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read theme preference");
                Theme::Light
            }
        }
    }

    pub fn save(self, store: &dyn KeyValueStore) -> StorageResult<()> {
        store.set(keys::DARK_MODE, if self.is_dark() { "true" } else { "false" })
    }

    /// Flip the stored theme and return the new one
    pub fn toggle(store: &dyn KeyValueStore) -> StorageResult<Theme> {
        let next = match Theme::load(store) {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        next.save(store)?;
        tracing::debug!(theme = ?next, "Theme toggled");
        Ok(next)
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// CSS class applied to the page shell
    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_missing_is_light() {
        assert_eq!(Theme::load(&MemoryStore::new()), Theme::Light);
    }

    #[test]
    fn test_garbage_is_light() {
        let store = MemoryStore::with_entries([(keys::DARK_MODE, "yes please")]);
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::new();
        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Dark);
        assert_eq!(store.get(keys::DARK_MODE).unwrap().as_deref(), Some("true"));

        assert_eq!(Theme::toggle(&store).unwrap(), Theme::Light);
        assert_eq!(store.get(keys::DARK_MODE).unwrap().as_deref(), Some("false"));
    }
}
