//! Onboarding repository over a `KeyValueStore`.
//!
//! # Invariants
//! - Every key is `namespace + suffix`; suffixes are fixed (see `StoreKey`).
//! - The activity log stays newest-first and never exceeds `activity_cap`.
//! - Employee list and task-set map written together go through one
//!   `set_many` call.

use crate::config::{CoreConfig, DEFAULT_NAMESPACE};
use crate::model::activity::{push_bounded, Activity, DEFAULT_ACTIVITY_LOG_CAP};
use crate::model::employee::Employee;
use crate::model::session::{Session, Theme};
use crate::model::task::TaskSetMap;
use crate::store::{KeyValueStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from onboarding repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store transport failure.
    Store(StoreError),
    /// Persisted value under `key` is not valid JSON for its record type.
    InvalidData {
        key: String,
        source: serde_json::Error,
    },
    /// Value could not be encoded for `key`.
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData { key, source } => {
                write!(f, "invalid persisted data under `{key}`: {source}")
            }
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidData { source, .. } => Some(source),
            Self::Encode { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Fixed key suffixes of the store layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Employees,
    Tasks,
    User,
    ActivityLog,
    Theme,
}

impl StoreKey {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Tasks => "tasks",
            Self::User => "user",
            Self::ActivityLog => "activity_log",
            Self::Theme => "theme",
        }
    }
}

/// Typed onboarding persistence over any `KeyValueStore`.
pub struct OnboardingRepository<S: KeyValueStore> {
    store: S,
    namespace: String,
    activity_cap: usize,
}

impl<S: KeyValueStore> OnboardingRepository<S> {
    /// Uses the default namespace and activity cap.
    pub fn new(store: S) -> Self {
        Self {
            store,
            namespace: DEFAULT_NAMESPACE.to_string(),
            activity_cap: DEFAULT_ACTIVITY_LOG_CAP,
        }
    }

    /// Uses namespace and activity cap from `config`.
    pub fn from_config(store: S, config: &CoreConfig) -> Self {
        Self {
            store,
            namespace: config.store.namespace.clone(),
            activity_cap: config.activity.log_cap.max(1),
        }
    }

    pub fn activity_cap(&self) -> usize {
        self.activity_cap
    }

    /// Full store key for `key` in this repository's namespace.
    pub fn key(&self, key: StoreKey) -> String {
        format!("{}{}", self.namespace, key.suffix())
    }

    pub fn load_employees(&self) -> RepoResult<Vec<Employee>> {
        Ok(self.read(StoreKey::Employees)?.unwrap_or_default())
    }

    pub fn load_task_sets(&self) -> RepoResult<TaskSetMap> {
        Ok(self.read(StoreKey::Tasks)?.unwrap_or_default())
    }

    pub fn save_task_sets(&self, task_sets: &TaskSetMap) -> RepoResult<()> {
        self.write(StoreKey::Tasks, task_sets)
    }

    /// Writes the employee list and the task-set map as one store batch.
    pub fn save_roster(&self, employees: &[Employee], task_sets: &TaskSetMap) -> RepoResult<()> {
        let employees_key = self.key(StoreKey::Employees);
        let tasks_key = self.key(StoreKey::Tasks);
        let employees_json = encode(&employees_key, employees)?;
        let tasks_json = encode(&tasks_key, task_sets)?;

        self.store.set_many(&[
            (employees_key.as_str(), employees_json.as_str()),
            (tasks_key.as_str(), tasks_json.as_str()),
        ])?;
        Ok(())
    }

    pub fn load_session(&self) -> RepoResult<Option<Session>> {
        self.read(StoreKey::User)
    }

    pub fn save_session(&self, session: &Session) -> RepoResult<()> {
        self.write(StoreKey::User, session)
    }

    pub fn clear_session(&self) -> RepoResult<()> {
        self.store.remove(&self.key(StoreKey::User))?;
        Ok(())
    }

    /// Activity log, newest first.
    pub fn load_activity(&self) -> RepoResult<Vec<Activity>> {
        Ok(self.read(StoreKey::ActivityLog)?.unwrap_or_default())
    }

    /// Prepends `entry` and persists the log truncated to the cap.
    pub fn append_activity(&self, entry: Activity) -> RepoResult<()> {
        let mut log = self.load_activity()?;
        push_bounded(&mut log, entry, self.activity_cap);
        self.write(StoreKey::ActivityLog, &log)
    }

    pub fn load_theme(&self) -> RepoResult<Theme> {
        Ok(self.read(StoreKey::Theme)?.unwrap_or_default())
    }

    pub fn save_theme(&self, theme: Theme) -> RepoResult<()> {
        self.write(StoreKey::Theme, &theme)
    }

    fn read<T: DeserializeOwned>(&self, key: StoreKey) -> RepoResult<Option<T>> {
        let full_key = self.key(key);
        match self.store.get(&full_key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| RepoError::InvalidData {
                    key: full_key,
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> RepoResult<()> {
        let full_key = self.key(key);
        let json = encode(&full_key, value)?;
        self.store.set(&full_key, &json)?;
        Ok(())
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|source| RepoError::Encode {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn absent_keys_read_as_defaults() {
        let repo = OnboardingRepository::new(MemoryStore::new());
        assert!(repo.load_employees().unwrap().is_empty());
        assert!(repo.load_task_sets().unwrap().is_empty());
        assert!(repo.load_session().unwrap().is_none());
        assert!(repo.load_activity().unwrap().is_empty());
        assert_eq!(repo.load_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn keys_carry_namespace_prefix() {
        let store = MemoryStore::new();
        let repo = OnboardingRepository::new(&store);
        repo.save_theme(Theme::Dark).unwrap();

        assert_eq!(store.keys(), vec!["onboarding_theme".to_string()]);
        assert_eq!(
            store.get("onboarding_theme").unwrap().as_deref(),
            Some("\"dark\"")
        );
    }

    #[test]
    fn corrupt_json_is_reported_with_key() {
        let store = MemoryStore::new();
        store.set("onboarding_employees", "{not json").unwrap();
        let repo = OnboardingRepository::new(&store);

        match repo.load_employees().unwrap_err() {
            RepoError::InvalidData { key, .. } => assert_eq!(key, "onboarding_employees"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn config_overrides_namespace_and_cap() {
        let mut config = CoreConfig::default();
        config.store.namespace = "tab2_".to_string();
        config.activity.log_cap = 5;
        let store = MemoryStore::new();
        let repo = OnboardingRepository::from_config(&store, &config);

        assert_eq!(repo.key(StoreKey::ActivityLog), "tab2_activity_log");
        assert_eq!(repo.activity_cap(), 5);
    }
}
