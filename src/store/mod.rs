pub mod permalink;
mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use tracing::warn;

use crate::core::{self, FireTargets, PlanField, PlanInput};

/// Key the serialized plan is persisted under.
pub const STORAGE_KEY: &str = "fire_data";

/// Owns the session's single plan record. Targets are recomputed only
/// when a mutation actually changes the input, and every change is
/// persisted fire-and-forget: a storage failure is logged and never
/// surfaces to the caller.
#[derive(Debug)]
pub struct PlanStore<S: Storage> {
    storage: S,
    data: PlanInput,
    targets: FireTargets,
}

impl<S: Storage> PlanStore<S> {
    /// Resolves initial state with precedence: permalink query string,
    /// then persisted storage, then built-in defaults.
    pub fn open(storage: S, query: Option<&str>) -> Self {
        let data = match query {
            Some(query) => permalink::decode(query),
            None => load_persisted(&storage).unwrap_or_default(),
        };

        let mut store = Self {
            storage,
            data,
            targets: core::fire_targets(&data),
        };
        store.persist();
        store
    }

    pub fn data(&self) -> &PlanInput {
        &self.data
    }

    pub fn targets(&self) -> &FireTargets {
        &self.targets
    }

    /// Copy of the current plan for callers that compute outside the
    /// store (reports must not observe later mutations).
    pub fn snapshot(&self) -> PlanInput {
        self.data
    }

    /// Applies a single field edit. No-op edits skip recomputation and
    /// persistence.
    pub fn set(&mut self, field: PlanField, value: f64) {
        let before = self.data;
        self.data.apply(field, value);
        if self.data != before {
            self.targets = core::fire_targets(&self.data);
            self.persist();
        }
    }

    /// Replaces the whole record, renormalizing it first.
    pub fn replace(&mut self, input: PlanInput) {
        let input = input.normalized();
        if self.data != input {
            self.data = input;
            self.targets = core::fire_targets(&self.data);
            self.persist();
        }
    }

    /// Restores built-in defaults and clears persisted state.
    pub fn reset(&mut self) {
        self.data = PlanInput::default();
        self.targets = core::fire_targets(&self.data);
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            warn!(error = %e, "failed to clear persisted plan");
        }
    }

    /// Current plan as a shareable query string.
    pub fn permalink(&self) -> String {
        permalink::encode(&self.data)
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.data) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(error = %e, "failed to serialize plan");
                return;
            }
        };
        if let Err(e) = self.storage.set(STORAGE_KEY, &serialized) {
            warn!(error = %e, "failed to persist plan");
        }
    }
}

fn load_persisted<S: Storage>(storage: &S) -> Option<PlanInput> {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "failed to read persisted plan, using defaults");
            return None;
        }
    };
    match serde_json::from_str::<PlanInput>(&raw) {
        Ok(plan) => Some(plan.normalized()),
        Err(e) => {
            warn!(error = %e, "persisted plan is malformed, using defaults");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage wrapper counting writes, to observe persistence and
    /// memoization behavior.
    #[derive(Debug, Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        writes: u32,
        removes: u32,
    }

    impl Storage for CountingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes += 1;
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.removes += 1;
            self.inner.remove(key)
        }
    }

    #[test]
    fn open_starts_from_defaults_with_empty_storage() {
        let store = PlanStore::open(MemoryStorage::new(), None);
        assert_eq!(*store.data(), PlanInput::default());
        assert_eq!(store.targets().traditional, 800_000.0 * 25.0);
    }

    #[test]
    fn open_prefers_persisted_state_over_defaults() {
        let mut plan = PlanInput::default();
        plan.apply(PlanField::AnnualExpenses, 600_000.0);

        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, &serde_json::to_string(&plan).expect("plan must serialize"))
            .expect("write must succeed");

        let store = PlanStore::open(storage, None);
        assert_eq!(store.data().annual_expenses, 600_000.0);
        assert_eq!(store.targets().traditional, 15_000_000.0);
    }

    #[test]
    fn open_prefers_permalink_over_persisted_state() {
        let mut plan = PlanInput::default();
        plan.apply(PlanField::AnnualExpenses, 600_000.0);

        let mut storage = MemoryStorage::new();
        storage
            .set(STORAGE_KEY, &serde_json::to_string(&plan).expect("plan must serialize"))
            .expect("write must succeed");

        let store = PlanStore::open(storage, Some("exp=400000"));
        assert_eq!(store.data().annual_expenses, 400_000.0);
    }

    #[test]
    fn open_ignores_malformed_persisted_state() {
        let mut storage = MemoryStorage::new();
        storage.set(STORAGE_KEY, "{broken").expect("write must succeed");

        let store = PlanStore::open(storage, None);
        assert_eq!(*store.data(), PlanInput::default());
    }

    #[test]
    fn set_recomputes_targets_and_persists() {
        let mut store = PlanStore::open(CountingStorage::default(), None);
        let writes_after_open = store.storage.writes;

        store.set(PlanField::AnnualExpenses, 1_000_000.0);
        assert_eq!(store.targets().traditional, 25_000_000.0);
        assert_eq!(store.storage.writes, writes_after_open + 1);

        let persisted = store
            .storage
            .get(STORAGE_KEY)
            .expect("read must succeed")
            .expect("plan must be persisted");
        let restored: PlanInput =
            serde_json::from_str(&persisted).expect("persisted plan must parse");
        assert_eq!(restored.annual_expenses, 1_000_000.0);
    }

    #[test]
    fn set_skips_recomputation_for_no_op_edits() {
        let mut store = PlanStore::open(CountingStorage::default(), None);
        let writes_after_open = store.storage.writes;

        store.set(PlanField::AnnualExpenses, 800_000.0);
        store.set(PlanField::AnnualIncome, f64::NAN);
        assert_eq!(store.storage.writes, writes_after_open);
    }

    #[test]
    fn reset_restores_defaults_and_clears_storage() {
        let mut store = PlanStore::open(CountingStorage::default(), None);
        store.set(PlanField::AnnualExpenses, 1_000_000.0);

        store.reset();
        assert_eq!(*store.data(), PlanInput::default());
        assert_eq!(store.storage.removes, 1);
        assert!(
            store
                .storage
                .get(STORAGE_KEY)
                .expect("read must succeed")
                .is_none()
        );
    }

    #[test]
    fn replace_normalizes_incoming_records() {
        let mut store = PlanStore::open(MemoryStorage::new(), None);
        let mut incoming = PlanInput::default();
        incoming.current_corpus = -10.0;
        incoming.years_to_retire = 99;

        store.replace(incoming);
        assert_eq!(store.data().current_corpus, 0.0);
        assert_eq!(store.data().years_to_retire, 50);
    }

    #[test]
    fn permalink_round_trips_through_open() {
        let mut store = PlanStore::open(MemoryStorage::new(), None);
        store.set(PlanField::AnnualIncome, 2_000_000.0);
        store.set(PlanField::CurrentAge, 35.0);

        let restored = PlanStore::open(MemoryStorage::new(), Some(&store.permalink()));
        assert_eq!(*restored.data(), *store.data());
    }

    #[test]
    fn persistence_round_trips_across_sessions() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = PlanStore::open(storage.clone(), None);
            store.set(PlanField::TargetCorpus, 60_000_000.0);
            // MemoryStorage clones do not share state; copy it back out
            storage = store.storage;
        }

        let reopened = PlanStore::open(storage, None);
        assert_eq!(reopened.data().target_corpus, 60_000_000.0);
    }
}
