//! Integration tests for theme preference resolution and persistence

use coursechat::config::Config;
use coursechat::storage::{FileBackend, MemoryBackend, PreferenceBackend};
use coursechat::theme::{THEME_KEY, ThemeAttributes, ThemeController, ThemeStore};
use coursechat::types::Preference;
use std::cell::RefCell;
use std::rc::Rc;

fn controller_with(
    stored: Option<Preference>,
    ambient: Preference,
) -> ThemeController<MemoryBackend> {
    let backend = MemoryBackend::new();
    if let Some(pref) = stored {
        backend.set(THEME_KEY, pref.as_str()).unwrap();
    }
    ThemeController::new(ThemeStore::new(backend, Some(ambient)))
}

fn recorder<B: PreferenceBackend>(
    controller: &mut ThemeController<B>,
) -> Rc<RefCell<Vec<Preference>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.subscribe(move |pref| sink.borrow_mut().push(pref));
    seen
}

mod resolution_tests {
    use super::*;

    #[test]
    fn test_persisted_preference_beats_ambient() {
        let mut controller = controller_with(Some(Preference::Light), Preference::Dark);
        controller.initialize();
        assert_eq!(controller.current(), Preference::Light);
    }

    #[test]
    fn test_ambient_used_when_nothing_persisted() {
        for ambient in [Preference::Light, Preference::Dark] {
            let mut controller = controller_with(None, ambient);
            controller.initialize();
            assert_eq!(controller.current(), ambient);
        }
    }

    #[test]
    fn test_missing_ambient_falls_back_to_default() {
        let mut controller = ThemeController::new(ThemeStore::new(MemoryBackend::new(), None));
        controller.initialize();
        assert_eq!(controller.current(), Preference::Dark);
    }

    #[test]
    fn test_initialize_applies_and_notifies() {
        let mut controller = controller_with(None, Preference::Light);
        let seen = recorder(&mut controller);
        controller.initialize();
        assert_eq!(*seen.borrow(), vec![Preference::Light]);
        assert_eq!(
            controller.attributes(),
            &ThemeAttributes::for_preference(Preference::Light)
        );
    }
}

mod toggle_tests {
    use super::*;

    #[test]
    fn test_toggle_persists_applies_and_notifies() {
        let mut controller = controller_with(None, Preference::Dark);
        controller.initialize();
        let seen = recorder(&mut controller);

        assert_eq!(controller.toggle(), Preference::Light);

        assert_eq!(controller.current(), Preference::Light);
        assert_eq!(controller.store().load(), Some(Preference::Light));
        assert_eq!(controller.attributes().class, "light-theme");
        assert_eq!(controller.attributes().data_theme, "light");
        assert_eq!(controller.attributes().toggle_label, "Switch to dark theme");
        assert_eq!(*seen.borrow(), vec![Preference::Light]);
    }

    #[test]
    fn test_apply_twice_is_idempotent_but_notifies_each_time() {
        let mut controller = controller_with(None, Preference::Dark);
        let seen = recorder(&mut controller);

        controller.apply(Preference::Light);
        let first = controller.attributes().clone();
        controller.apply(Preference::Light);

        assert_eq!(controller.attributes(), &first);
        assert_eq!(*seen.borrow(), vec![Preference::Light, Preference::Light]);
    }
}

mod ambient_tests {
    use super::*;

    #[test]
    fn test_ambient_change_applies_without_explicit_choice() {
        let mut controller = controller_with(None, Preference::Dark);
        controller.initialize();

        assert!(controller.store().report_ambient(Preference::Light));
        assert!(controller.sync_ambient());
        assert_eq!(controller.current(), Preference::Light);

        // Nothing new to observe.
        assert!(!controller.sync_ambient());
    }

    #[test]
    fn test_ambient_change_ignored_after_toggle() {
        let mut controller = controller_with(None, Preference::Dark);
        controller.initialize();
        controller.toggle();

        controller.store().report_ambient(Preference::Light);
        controller.store().report_ambient(Preference::Dark);
        assert!(!controller.sync_ambient());
        assert_eq!(controller.current(), Preference::Light);
    }

    #[test]
    fn test_clearing_preference_returns_control_to_ambient() {
        let mut controller = controller_with(Some(Preference::Light), Preference::Light);
        controller.initialize();
        controller.store().clear();

        controller.store().report_ambient(Preference::Dark);
        assert!(controller.sync_ambient());
        assert_eq!(controller.current(), Preference::Dark);
    }

    #[test]
    fn test_platform_reading_overrides_configured_seed() {
        let seed = Config::default().system_theme;
        let mut controller = ThemeController::new(ThemeStore::new(MemoryBackend::new(), Some(seed)));
        controller.initialize();
        let seen = recorder(&mut controller);

        // First reading from the platform, then a live change back.
        assert!(controller.observe_ambient(Preference::from_prefers_dark(false)));
        assert_eq!(controller.current(), Preference::Light);
        assert_eq!(controller.store().ambient_signal(), Preference::Light);

        assert!(!controller.observe_ambient(Preference::from_prefers_dark(false)));
        assert!(controller.observe_ambient(Preference::from_prefers_dark(true)));
        assert_eq!(controller.current(), Preference::Dark);
        assert_eq!(*seen.borrow(), vec![Preference::Light, Preference::Dark]);
    }

    #[test]
    fn test_platform_reading_ignored_after_toggle() {
        let mut controller = controller_with(None, Config::default().system_theme);
        controller.initialize();
        let chosen = controller.toggle();

        assert!(!controller.observe_ambient(chosen));
        assert!(!controller.observe_ambient(chosen.opposite()));
        assert_eq!(controller.current(), chosen);
        assert_eq!(controller.store().ambient_signal(), chosen.opposite());
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_toggle_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = ThemeController::new(ThemeStore::new(
            FileBackend::new(dir.path()),
            Some(Preference::Dark),
        ));
        first.initialize();
        first.toggle();
        drop(first);

        let mut second = ThemeController::new(ThemeStore::new(
            FileBackend::new(dir.path()),
            Some(Preference::Dark),
        ));
        second.initialize();
        assert_eq!(second.current(), Preference::Light);
    }
}
