//! State owned by the host application that the engine only borrows: a key-value preference
//! store and a slot for handing a freshly chosen image to the next session.

use std::collections::HashMap;

use crate::partition::ImageSource;

/// Preference key for the sound toggle.
pub const SOUND_ENABLED_KEY: &str = "puzzle.sound_enabled";

/// A persistent boolean preference store, e.g. backed by local storage.
pub trait PreferenceStore {
    /// The stored flag for `key`, if any.
    fn get_flag(&self, key: &str) -> Option<bool>;
    /// Store a flag under `key`.
    fn set_flag(&mut self, key: &str, value: bool);
}

/// A [`PreferenceStore`] that forgets everything when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    flags: HashMap<String, bool>,
}

impl PreferenceStore for MemoryPreferences {
    fn get_flag(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_owned(), value);
    }
}

/// Whether sounds are on. Defaults to on when never set.
pub fn sound_enabled(store: &dyn PreferenceStore) -> bool {
    store.get_flag(SOUND_ENABLED_KEY).unwrap_or(true)
}

/// Flip the sound toggle and return the new value.
pub fn toggle_sound(store: &mut dyn PreferenceStore) -> bool {
    let enabled = !sound_enabled(store);
    store.set_flag(SOUND_ENABLED_KEY, enabled);
    enabled
}

/// Holds an image picked on one screen until the game screen starts a session with it.
#[derive(Debug, Default)]
pub struct PendingImageSlot {
    image: Option<ImageSource>,
}

impl PendingImageSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image, replacing any previous one.
    pub fn set(&mut self, image: ImageSource) {
        self.image = Some(image);
    }

    /// The stored image, if any.
    pub fn get(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }

    /// Remove and return the stored image.
    pub fn take(&mut self) -> Option<ImageSource> {
        self.image.take()
    }

    /// Discard the stored image.
    pub fn clear(&mut self) {
        self.image = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_defaults_on_and_toggles() {
        let mut store = MemoryPreferences::default();
        assert!(sound_enabled(&store));
        assert!(!toggle_sound(&mut store));
        assert!(!sound_enabled(&store));
        assert_eq!(store.get_flag(SOUND_ENABLED_KEY), Some(false));
        assert!(toggle_sound(&mut store));
    }

    #[test]
    fn slot_hands_over_once() {
        let mut slot = PendingImageSlot::new();
        assert!(slot.get().is_none());
        slot.set(ImageSource::Registered("first".into()));
        slot.set(ImageSource::Registered("second".into()));
        assert!(matches!(slot.get(), Some(ImageSource::Registered(id)) if id == "second"));
        assert!(slot.take().is_some());
        assert!(slot.take().is_none());

        slot.set(ImageSource::Encoded(vec![1, 2, 3]));
        slot.clear();
        assert!(slot.get().is_none());
    }
}
