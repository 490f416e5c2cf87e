use crate::errors::StoreError;
use crate::models::{
    Activity, AppSettings, CompletedWorkout, DataCounts, HeartRateEntry, Meal, Profile,
    ScheduledWorkout, SleepEntry,
};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::error;

pub mod keys {
    pub const ACTIVITIES: &str = "activities";
    pub const MEALS: &str = "meals";
    pub const SLEEP: &str = "sleepData";
    pub const HEART_RATE: &str = "heartRateData";
    pub const SCHEDULED_WORKOUTS: &str = "scheduledWorkouts";
    pub const COMPLETED_WORKOUTS: &str = "completedWorkouts";
    pub const PROFILE: &str = "profile";
    pub const SETTINGS: &str = "appSettings";
    pub const DARK_MODE: &str = "darkMode";
}

/// String-keyed persistent storage holding one JSON document per key.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Keeps every key in its own `<key>.json` file so a bad write to one key
/// never touches another.
///
/// Access is blocking `std::fs`; async callers go through
/// [`AppState::with_repo`](crate::state::AppState::with_repo). The directory
/// must already exist.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Typed access to every persisted collection and singleton.
///
/// Collections are always read and written whole: a mutation loads the full
/// array, changes it in memory and saves it back. Unreadable values load as
/// empty (or default) and are logged rather than returned as errors.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_value(key).unwrap_or_default()
    }

    pub fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        self.save_value(key, &items)
    }

    pub fn load_singleton<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_value(key).unwrap_or_default()
    }

    pub fn save_singleton<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.save_value(key, value)
    }

    pub fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.store.remove_item(key)
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get_item(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("failed to parse stored {key}: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                error!("failed to read stored {key}: {err}");
                None
            }
        }
    }

    fn save_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let payload = serde_json::to_string(value)?;
        self.store.set_item(key, &payload)
    }

    pub fn load_activities(&self) -> Vec<Activity> {
        self.load_collection(keys::ACTIVITIES)
    }

    pub fn save_activities(&self, activities: &[Activity]) -> Result<(), StoreError> {
        self.save_collection(keys::ACTIVITIES, activities)
    }

    pub fn load_meals(&self) -> Vec<Meal> {
        self.load_collection(keys::MEALS)
    }

    pub fn save_meals(&self, meals: &[Meal]) -> Result<(), StoreError> {
        self.save_collection(keys::MEALS, meals)
    }

    pub fn load_sleep(&self) -> Vec<SleepEntry> {
        self.load_collection(keys::SLEEP)
    }

    pub fn save_sleep(&self, entries: &[SleepEntry]) -> Result<(), StoreError> {
        self.save_collection(keys::SLEEP, entries)
    }

    pub fn load_heart_rate(&self) -> Vec<HeartRateEntry> {
        self.load_collection(keys::HEART_RATE)
    }

    pub fn save_heart_rate(&self, entries: &[HeartRateEntry]) -> Result<(), StoreError> {
        self.save_collection(keys::HEART_RATE, entries)
    }

    pub fn load_scheduled_workouts(&self) -> Vec<ScheduledWorkout> {
        self.load_collection(keys::SCHEDULED_WORKOUTS)
    }

    pub fn save_scheduled_workouts(&self, workouts: &[ScheduledWorkout]) -> Result<(), StoreError> {
        self.save_collection(keys::SCHEDULED_WORKOUTS, workouts)
    }

    pub fn load_completed_workouts(&self) -> Vec<CompletedWorkout> {
        self.load_collection(keys::COMPLETED_WORKOUTS)
    }

    pub fn save_completed_workouts(&self, workouts: &[CompletedWorkout]) -> Result<(), StoreError> {
        self.save_collection(keys::COMPLETED_WORKOUTS, workouts)
    }

    pub fn load_profile(&self) -> Profile {
        self.load_singleton(keys::PROFILE)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.save_singleton(keys::PROFILE, profile)
    }

    pub fn load_settings(&self) -> AppSettings {
        self.load_singleton(keys::SETTINGS)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.save_singleton(keys::SETTINGS, settings)
    }

    /// The theme flag defaults to dark when it has never been written.
    pub fn load_dark_mode(&self) -> bool {
        self.load_value(keys::DARK_MODE).unwrap_or(true)
    }

    pub fn save_dark_mode(&self, dark_mode: bool) -> Result<(), StoreError> {
        self.save_value(keys::DARK_MODE, &dark_mode)
    }

    /// Stored settings with the live theme flag folded in.
    pub fn load_effective_settings(&self) -> AppSettings {
        AppSettings {
            dark_mode: self.load_dark_mode(),
            ..self.load_settings()
        }
    }

    pub fn data_counts(&self) -> DataCounts {
        let profile_fields = serde_json::to_value(self.load_profile())
            .ok()
            .and_then(|value| value.as_object().map(|fields| fields.len()))
            .unwrap_or(0);

        DataCounts {
            activities: self.load_activities().len(),
            meals: self.load_meals().len(),
            sleep_data: self.load_sleep().len(),
            heart_rate_data: self.load_heart_rate().len(),
            profile: profile_fields,
            scheduled_workouts: self.load_scheduled_workouts().len(),
        }
    }
}
