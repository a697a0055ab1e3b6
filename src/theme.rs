//! Light/dark theme preference: persistence, resolution and application.

use crate::storage::PreferenceBackend;
use crate::types::Preference;
use tokio::sync::watch;
use tracing::{debug, warn};

pub const THEME_KEY: &str = "theme";

// ============================================
// Theme Store
// ============================================

/// Persisted preference plus the ambient (system) light/dark signal.
pub struct ThemeStore<B> {
    backend: B,
    ambient: watch::Sender<Preference>,
}

impl<B: PreferenceBackend> ThemeStore<B> {
    /// `ambient` is the system signal at startup; `None` falls back to the
    /// default preference.
    pub fn new(backend: B, ambient: Option<Preference>) -> Self {
        let (ambient, _) = watch::channel(ambient.unwrap_or_default());
        Self { backend, ambient }
    }

    /// Explicit preference, if one was saved. Unreadable or unparseable
    /// storage counts as absent.
    pub fn load(&self) -> Option<Preference> {
        match self.backend.get(THEME_KEY) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(pref) => Some(pref),
                Err(err) => {
                    debug!("ignoring stored theme: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                debug!("theme storage unavailable: {err}");
                None
            }
        }
    }

    pub fn save(&self, preference: Preference) {
        if let Err(err) = self.backend.set(THEME_KEY, preference.as_str()) {
            warn!("failed to persist theme preference: {err}");
        }
    }

    /// Forget the explicit preference so the ambient signal governs again.
    pub fn clear(&self) {
        if let Err(err) = self.backend.remove(THEME_KEY) {
            warn!("failed to clear theme preference: {err}");
        }
    }

    pub fn ambient_signal(&self) -> Preference {
        *self.ambient.borrow()
    }

    /// Receiver that observes future ambient transitions only.
    pub fn subscribe_ambient_change(&self) -> watch::Receiver<Preference> {
        self.ambient.subscribe()
    }

    /// Called by the platform layer when the system signal is (re)read.
    /// Returns `true` only on an actual transition.
    pub fn report_ambient(&self, preference: Preference) -> bool {
        self.ambient.send_if_modified(|current| {
            if *current == preference {
                false
            } else {
                *current = preference;
                true
            }
        })
    }
}

// ============================================
// Presentation
// ============================================

/// Attributes the shell puts on its root node for the applied theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeAttributes {
    pub class: &'static str,
    pub data_theme: &'static str,
    /// Describes what toggling will do next.
    pub toggle_label: &'static str,
}

impl ThemeAttributes {
    pub fn for_preference(preference: Preference) -> Self {
        match preference {
            Preference::Light => Self {
                class: "light-theme",
                data_theme: "light",
                toggle_label: "Switch to dark theme",
            },
            Preference::Dark => Self {
                class: "dark-theme",
                data_theme: "dark",
                toggle_label: "Switch to light theme",
            },
        }
    }
}

pub fn palette_css(preference: Preference) -> &'static str {
    match preference {
        Preference::Dark => DARK_THEME,
        Preference::Light => LIGHT_THEME,
    }
}

// ============================================
// Theme Controller
// ============================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(usize);

type ThemeListener = Box<dyn Fn(Preference)>;

pub struct ThemeController<B> {
    store: ThemeStore<B>,
    applied: Preference,
    attributes: ThemeAttributes,
    listeners: Vec<(ListenerId, ThemeListener)>,
    next_listener: usize,
    ambient_changes: Option<watch::Receiver<Preference>>,
}

impl<B: PreferenceBackend> ThemeController<B> {
    pub fn new(store: ThemeStore<B>) -> Self {
        let applied = Preference::default();
        Self {
            store,
            applied,
            attributes: ThemeAttributes::for_preference(applied),
            listeners: Vec::new(),
            next_listener: 0,
            ambient_changes: None,
        }
    }

    /// Apply the persisted preference, else the ambient signal, and start
    /// following ambient transitions.
    pub fn initialize(&mut self) {
        let resolved = self
            .store
            .load()
            .unwrap_or_else(|| self.store.ambient_signal());
        self.apply(resolved);
        self.ambient_changes = Some(self.store.subscribe_ambient_change());
    }

    /// Handle a pending ambient transition, if any. The new signal is
    /// applied only while no explicit preference is stored.
    pub fn sync_ambient(&mut self) -> bool {
        let Some(changes) = self.ambient_changes.as_mut() else {
            return false;
        };
        if !changes.has_changed().unwrap_or(false) {
            return false;
        }
        let ambient = *changes.borrow_and_update();
        if self.store.load().is_some() {
            debug!("ambient theme changed to {ambient}; explicit preference wins");
            return false;
        }
        self.apply(ambient);
        true
    }

    /// Record a fresh platform reading of the system scheme and follow it
    /// when it is a transition and nothing explicit is stored.
    pub fn observe_ambient(&mut self, preference: Preference) -> bool {
        self.store.report_ambient(preference);
        self.sync_ambient()
    }

    pub fn toggle(&mut self) -> Preference {
        let next = self.applied.opposite();
        self.store.save(next);
        self.apply(next);
        next
    }

    /// Set presentation attributes and notify every listener, even when the
    /// preference is unchanged.
    pub fn apply(&mut self, preference: Preference) {
        self.applied = preference;
        self.attributes = ThemeAttributes::for_preference(preference);
        debug!("theme applied: {preference}");
        for (_, listener) in &self.listeners {
            listener(preference);
        }
    }

    pub fn current(&self) -> Preference {
        self.applied
    }

    pub fn attributes(&self) -> &ThemeAttributes {
        &self.attributes
    }

    pub fn store(&self) -> &ThemeStore<B> {
        &self.store
    }

    pub fn subscribe(&mut self, listener: impl Fn(Preference) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #0f172a;
    --color-bg-secondary: #1e293b;
    --color-surface: #1e293b;
    --color-surface-hover: #334155;
    --color-text-primary: #f1f5f9;
    --color-text-secondary: #94a3b8;
    --color-border: #334155;
    --color-primary: #2563eb;
    --color-primary-hover: #1d4ed8;
    --color-chat-user-bg: #2563eb;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #374151;
    --color-chat-assistant-text: #f1f5f9;
    --color-link: #60a5fa;
    --color-focus-ring: rgba(37, 99, 235, 0.2);
    --color-welcome-bg: #1e3a5f;
    --color-welcome-border: #2563eb;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-surface); border-right-color: var(--color-border); }
.chat-input { background: var(--color-surface); color: var(--color-text-primary); border-color: var(--color-border); }
.chat-input:focus { border-color: var(--color-primary); box-shadow: 0 0 0 3px var(--color-focus-ring); }
.source-link { color: var(--color-link); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #f8fafc;
    --color-bg-secondary: #ffffff;
    --color-surface: #ffffff;
    --color-surface-hover: #f1f5f9;
    --color-text-primary: #0f172a;
    --color-text-secondary: #475569;
    --color-border: #e2e8f0;
    --color-primary: #2563eb;
    --color-primary-hover: #1d4ed8;
    --color-chat-user-bg: #2563eb;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #f1f5f9;
    --color-chat-assistant-text: #0f172a;
    --color-link: #1d4ed8;
    --color-focus-ring: rgba(37, 99, 235, 0.15);
    --color-welcome-bg: #eff6ff;
    --color-welcome-border: #bfdbfe;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.sidebar { background: var(--color-surface); border-right-color: var(--color-border); }
.chat-input { background: var(--color-surface); color: var(--color-text-primary); border-color: var(--color-border); }
.chat-input:focus { border-color: var(--color-primary); box-shadow: 0 0 0 3px var(--color-focus-ring); }
.source-link { color: var(--color-link); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, StorageError};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct BrokenBackend;

    impl PreferenceBackend for BrokenBackend {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn unreadable_storage_loads_as_absent() {
        let store = ThemeStore::new(BrokenBackend, Some(Preference::Light));
        assert_eq!(store.load(), None);
        store.save(Preference::Dark);
        store.clear();
    }

    #[test]
    fn garbage_in_storage_loads_as_absent() {
        let backend = MemoryBackend::new();
        backend.set(THEME_KEY, "octane").unwrap();
        let store = ThemeStore::new(backend, None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn report_ambient_fires_only_on_transition() {
        let store = ThemeStore::new(MemoryBackend::new(), Some(Preference::Dark));
        assert!(!store.report_ambient(Preference::Dark));
        assert!(store.report_ambient(Preference::Light));
        assert!(!store.report_ambient(Preference::Light));
        assert_eq!(store.ambient_signal(), Preference::Light);
    }

    #[test]
    fn broken_storage_still_toggles() {
        let store = ThemeStore::new(BrokenBackend, Some(Preference::Dark));
        let mut controller = ThemeController::new(store);
        controller.initialize();
        assert_eq!(controller.toggle(), Preference::Light);
        assert_eq!(controller.current(), Preference::Light);
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let mut controller =
            ThemeController::new(ThemeStore::new(MemoryBackend::new(), None));
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let id = controller.subscribe(move |_| *counter.borrow_mut() += 1);
        controller.apply(Preference::Light);
        controller.unsubscribe(id);
        controller.apply(Preference::Dark);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn labels_describe_next_state() {
        assert_eq!(
            ThemeAttributes::for_preference(Preference::Light).toggle_label,
            "Switch to dark theme"
        );
        assert_eq!(
            ThemeAttributes::for_preference(Preference::Dark).toggle_label,
            "Switch to light theme"
        );
    }

    #[test]
    fn sync_without_initialize_is_noop() {
        let mut controller =
            ThemeController::new(ThemeStore::new(MemoryBackend::new(), None));
        controller.store().report_ambient(Preference::Light);
        assert!(!controller.sync_ambient());
    }
}
