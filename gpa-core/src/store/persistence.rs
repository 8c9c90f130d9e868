//! Snapshot persistence on top of a [`KeyValueStore`].
//!
//! Two independent entries are kept:
//!
//! | Key                           | Value |
//! |-------------------------------|-------|
//! | `gpa_calc_save_pref_vanilla`  | JSON boolean, whether snapshots are kept |
//! | `gpa_calc_state_vanilla_v1`   | JSON object shaped like [`AppState`], only while the preference is on |
//!
//! Reads never fail: a missing, unreadable or malformed entry falls back to
//! defaults and the fault is logged.  Write failures are logged and dropped.

use serde_json::{Map, Value};

use super::key_value::{KeyValueStore, StoreError};
use crate::AppState;

pub const STATE_KEY: &str = "gpa_calc_state_vanilla_v1";
pub const SAVE_PREF_KEY: &str = "gpa_calc_save_pref_vanilla";

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether snapshots are kept. Defaults to `true` when absent or unreadable.
    pub fn load_preference(&self) -> bool {
        match self.store.get(SAVE_PREF_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, raw = %raw, "ignoring unreadable save preference");
                true
            }),
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read save preference");
                true
            }
        }
    }

    /// Loads the stored snapshot, shallow-merged over defaults.
    ///
    /// With `pref_enabled` off the snapshot is ignored and defaults are
    /// returned with `save_settings_enabled` off.
    pub fn load_state(
        &self,
        pref_enabled: bool,
    ) -> AppState {
        if !pref_enabled {
            return AppState {
                save_settings_enabled: false,
                ..AppState::default()
            };
        }

        let raw = match self.store.get(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return AppState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved state; using defaults");
                return AppState::default();
            }
        };

        match merge_snapshot(&raw) {
            Ok(state) => AppState {
                save_settings_enabled: true,
                ..state
            },
            Err(e) => {
                tracing::warn!(error = %e, "saved state is malformed; using defaults");
                AppState::default()
            }
        }
    }

    /// [`load_state`](Self::load_state) driven by the stored preference.
    pub fn load(&self) -> AppState {
        self.load_state(self.load_preference())
    }

    /// Writes the preference, then writes or forgets the snapshot.
    pub fn save_state(
        &mut self,
        state: &AppState,
    ) {
        if let Err(e) = self.try_save(state) {
            tracing::warn!(error = %e, "failed to save state");
        }
    }

    fn try_save(
        &mut self,
        state: &AppState,
    ) -> Result<(), StoreError> {
        let pref = if state.save_settings_enabled { "true" } else { "false" };
        self.store.set(SAVE_PREF_KEY, pref)?;

        if state.save_settings_enabled {
            let json = serde_json::to_string(state)
                .map_err(|e| StoreError::Backend(format!("serialize state: {e}")))?;
            self.store.set(STATE_KEY, &json)
        } else {
            self.store.remove(STATE_KEY)
        }
    }

    /// Wipes every entry, preference included.
    pub fn clear_all(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear storage");
        }
    }
}

/// Overlays the stored object on the default state key by key.
///
/// Keys absent from the snapshot (or stored as `null`) keep their defaults,
/// so snapshots written before a field existed still load. A key whose value
/// does not fit its field also keeps its default; the rest still load.
fn merge_snapshot(raw: &str) -> Result<AppState, serde_json::Error> {
    let stored: Map<String, Value> = serde_json::from_str(raw)?;
    let defaults = match serde_json::to_value(AppState::default())? {
        Value::Object(defaults) => defaults,
        _ => Map::new(),
    };
    let stored: Vec<(String, Value)> = stored.into_iter().filter(|(_, value)| !value.is_null()).collect();

    if let Ok(state) = serde_json::from_value(overlay(&defaults, stored.clone())) {
        return Ok(state);
    }

    let usable = stored.into_iter().filter(|(key, value)| {
        let fits = serde_json::from_value::<AppState>(overlay(
            &defaults,
            [(key.clone(), value.clone())],
        ))
        .is_ok();
        if !fits {
            tracing::warn!(key = %key, value = %value, "dropping unusable saved field");
        }
        fits
    });
    serde_json::from_value(overlay(&defaults, usable))
}

fn overlay(
    defaults: &Map<String, Value>,
    entries: impl IntoIterator<Item = (String, Value)>,
) -> Value {
    let mut merged = defaults.clone();
    merged.extend(entries);
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{GradeComponents, Language, Module, Theme};

    #[derive(Default)]
    struct MapStore {
        entries: BTreeMap<String, String>,
    }

    impl KeyValueStore for MapStore {
        fn get(
            &self,
            key: &str,
        ) -> Result<Option<String>, StoreError> {
            Ok(self.entries.get(key).cloned())
        }
        fn set(
            &mut self,
            key: &str,
            value: &str,
        ) -> Result<(), StoreError> {
            self.entries.insert(key.to_string(), value.to_string());
            Ok(())
        }
        fn remove(
            &mut self,
            key: &str,
        ) -> Result<(), StoreError> {
            self.entries.remove(key);
            Ok(())
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            self.entries.clear();
            Ok(())
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(
            &self,
            _key: &str,
        ) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io("disk on fire".into()))
        }
        fn set(
            &mut self,
            _key: &str,
            _value: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".into()))
        }
        fn remove(
            &mut self,
            _key: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".into()))
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Io("disk on fire".into()))
        }
    }

    fn persistence_with(entries: &[(&str, &str)]) -> Persistence {
        let mut store = MapStore::default();
        for (key, value) in entries {
            store.entries.insert(key.to_string(), value.to_string());
        }
        Persistence::new(Box::new(store))
    }

    fn populated_state() -> AppState {
        AppState {
            language: Language::Fr,
            theme: Theme::Dark,
            calculation_method_id: "complex-25-25-50".into(),
            required_credits_for_debt: 45,
            modules: vec![Module {
                id: "1700000000000".into(),
                name: "Analyse".into(),
                coeff: dec!(3),
                credits: dec!(6),
                grade: dec!(13.25),
                components: Some(GradeComponents {
                    td_grade: "12".into(),
                    tp_grade: "15".into(),
                    exam_grade: "13".into(),
                    td_enabled: true,
                    tp_enabled: true,
                    exam_enabled: true,
                }),
            }],
            s1_avg_text: "11.5".into(),
            s1_credits_text: "30".into(),
            ..AppState::default()
        }
    }

    // =========================================================================
    // preference tests
    // =========================================================================

    #[test]
    fn preference_defaults_to_enabled() {
        assert!(persistence_with(&[]).load_preference());
    }

    #[test]
    fn preference_reads_stored_false() {
        let persistence = persistence_with(&[(SAVE_PREF_KEY, "false")]);

        assert!(!persistence.load_preference());
    }

    #[test]
    fn unreadable_preference_defaults_to_enabled() {
        let persistence = persistence_with(&[(SAVE_PREF_KEY, "maybe")]);

        assert!(persistence.load_preference());
    }

    // =========================================================================
    // load tests
    // =========================================================================

    #[test]
    fn missing_snapshot_loads_defaults() {
        let state = persistence_with(&[]).load_state(true);

        assert_eq!(state, AppState::default());
    }

    #[test]
    fn malformed_snapshot_loads_defaults() {
        let persistence = persistence_with(&[(STATE_KEY, "{not json")]);

        assert_eq!(persistence.load_state(true), AppState::default());
    }

    #[test]
    fn non_object_snapshot_loads_defaults() {
        let persistence = persistence_with(&[(STATE_KEY, "[1,2,3]")]);

        assert_eq!(persistence.load_state(true), AppState::default());
    }

    #[test]
    fn partial_snapshot_keeps_defaults_for_missing_keys() {
        let persistence = persistence_with(&[(STATE_KEY, r#"{"language":"en","s2AvgText":"9"}"#)]);

        let state = persistence.load_state(true);

        assert_eq!(state.language, Language::En);
        assert_eq!(state.s2_avg_text, "9");
        assert_eq!(state.calculation_method_id, "simple-0.6");
        assert_eq!(state.required_credits_for_debt, 30);
    }

    #[test]
    fn null_fields_keep_their_defaults() {
        let persistence = persistence_with(&[(STATE_KEY, r#"{"theme":null,"language":"fr"}"#)]);

        let state = persistence.load_state(true);

        assert_eq!(state.theme, Theme::Automatic);
        assert_eq!(state.language, Language::Fr);
    }

    #[test]
    fn unusable_field_keeps_only_its_own_default() {
        let persistence = persistence_with(&[(
            STATE_KEY,
            r#"{"theme":"sepia","language":"fr","modules":[{"id":"1","name":"Algebra","coeff":2,"credits":4,"grade":12.5}]}"#,
        )]);

        let state = persistence.load_state(true);

        assert_eq!(state.theme, Theme::Automatic);
        assert_eq!(state.language, Language::Fr);
        assert_eq!(state.modules.len(), 1);
        assert_eq!(state.modules[0].grade, dec!(12.5));
    }

    #[test]
    fn several_unusable_fields_are_each_dropped() {
        let persistence = persistence_with(&[(
            STATE_KEY,
            r#"{"requiredCreditsForDebt":"lots","language":42,"s1AvgText":"13","theme":"dark"}"#,
        )]);

        let state = persistence.load_state(true);

        assert_eq!(state.required_credits_for_debt, AppState::default().required_credits_for_debt);
        assert_eq!(state.language, Language::default());
        assert_eq!(state.s1_avg_text, "13");
        assert_eq!(state.theme, Theme::Dark);
    }

    #[test]
    fn loaded_snapshot_is_always_marked_enabled() {
        let persistence =
            persistence_with(&[(STATE_KEY, r#"{"saveSettingsEnabled":false,"language":"en"}"#)]);

        let state = persistence.load_state(true);

        assert!(state.save_settings_enabled);
        assert_eq!(state.language, Language::En);
    }

    #[test]
    fn disabled_preference_ignores_snapshot() {
        let mut persistence = persistence_with(&[]);
        persistence.save_state(&populated_state());

        let state = persistence.load_state(false);

        assert_eq!(
            state,
            AppState {
                save_settings_enabled: false,
                ..AppState::default()
            }
        );
    }

    #[test]
    fn read_failure_loads_defaults() {
        let persistence = Persistence::new(Box::new(BrokenStore));

        assert!(persistence.load_preference());
        assert_eq!(persistence.load(), AppState::default());
    }

    // =========================================================================
    // save tests
    // =========================================================================

    #[test]
    fn save_then_load_round_trips() {
        let mut persistence = persistence_with(&[]);
        let state = populated_state();

        persistence.save_state(&state);

        assert_eq!(persistence.load(), state);
    }

    #[test]
    fn disabling_persistence_forgets_snapshot_but_keeps_preference() {
        let mut persistence = persistence_with(&[]);
        persistence.save_state(&populated_state());

        persistence.save_state(&AppState {
            save_settings_enabled: false,
            ..populated_state()
        });

        assert!(!persistence.load_preference());
        assert_eq!(persistence.store.get(STATE_KEY).unwrap(), None);
        assert_eq!(persistence.load(), AppState {
            save_settings_enabled: false,
            ..AppState::default()
        });
    }

    #[test]
    fn write_failure_is_swallowed() {
        let mut persistence = Persistence::new(Box::new(BrokenStore));

        persistence.save_state(&populated_state());
        persistence.clear_all();
    }

    #[test]
    fn clear_all_removes_preference_and_snapshot() {
        let mut persistence = persistence_with(&[]);
        persistence.save_state(&AppState {
            save_settings_enabled: false,
            ..populated_state()
        });

        persistence.clear_all();

        assert!(persistence.load_preference());
        assert_eq!(persistence.load(), AppState::default());
    }
}
