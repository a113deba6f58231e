use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult};
use crate::store::StoreConnection;
use crate::types::Keyspace;

/// Number of logical databases a default server exposes.
const DEFAULT_DATABASE_COUNT: u32 = 16;

/// An in-memory multi-database store for testing.
#[derive(Clone)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

enum MockValue {
    String(Vec<u8>),
    Hash(HashMap<String, Vec<u8>>),
}

type Database = HashMap<String, MockValue>;

struct MockState {
    databases: BTreeMap<u32, Database>,
    database_count: u32,
    selected: u32,
    /// Every database switch, in order.
    selects: Vec<u32>,
    /// Number of delete commands issued.
    delete_calls: usize,
    /// Number of fields that actually existed when deleted.
    deleted_fields: u64,
    /// If set, all operations will fail with this error.
    fail_with: Option<String>,
    fail_keyspace: Option<String>,
    fail_select: HashSet<u32>,
    fail_delete: HashSet<u32>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            databases: BTreeMap::new(),
            database_count: DEFAULT_DATABASE_COUNT,
            selected: 0,
            selects: Vec::new(),
            delete_calls: 0,
            deleted_fields: 0,
            fail_with: None,
            fail_keyspace: None,
            fail_select: HashSet::new(),
            fail_delete: HashSet::new(),
        }
    }
}

impl MockState {
    fn check_failure(&self) -> StoreResult<()> {
        match self.fail_with {
            Some(ref error) => Err(StoreError::Connection(error.clone())),
            None => Ok(()),
        }
    }

    fn active(&self) -> Option<&Database> {
        self.databases.get(&self.selected)
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a mock store where every operation fails.
    pub fn failing(error_message: impl Into<String>) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().fail_with = Some(error_message.into());
        store
    }

    /// Make keyspace introspection fail.
    pub fn fail_keyspace(&self, error_message: impl Into<String>) {
        self.state.lock().unwrap().fail_keyspace = Some(error_message.into());
    }

    /// Make selecting `db` fail.
    pub fn fail_select(&self, db: u32) {
        self.state.lock().unwrap().fail_select.insert(db);
    }

    /// Make field deletion fail while `db` is selected.
    pub fn fail_delete(&self, db: u32) {
        self.state.lock().unwrap().fail_delete.insert(db);
    }

    /// Remove all injected failures.
    pub fn heal(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_with = None;
        state.fail_keyspace = None;
        state.fail_select.clear();
        state.fail_delete.clear();
    }

    /// Set a hash field in `db`, creating the hash if needed.
    pub fn set_field(&self, db: u32, key: &str, field: &str, value: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .databases
            .entry(db)
            .or_default()
            .entry(key.to_string())
            .or_insert_with(|| MockValue::Hash(HashMap::new()));

        match entry {
            MockValue::Hash(fields) => {
                fields.insert(field.to_string(), value.into());
            }
            MockValue::String(_) => {
                let mut fields = HashMap::new();
                fields.insert(field.to_string(), value.into());
                *entry = MockValue::Hash(fields);
            }
        }
    }

    /// Store a plain string value in `db`.
    pub fn set_string(&self, db: u32, key: &str, value: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state
            .databases
            .entry(db)
            .or_default()
            .insert(key.to_string(), MockValue::String(value.into()));
    }

    /// Read a hash field from `db`.
    pub fn field(&self, db: u32, key: &str, field: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap();
        match state.databases.get(&db)?.get(key)? {
            MockValue::Hash(fields) => fields.get(field).cloned(),
            MockValue::String(_) => None,
        }
    }

    /// Names of all fields in the hash at `key` in `db`, sorted.
    pub fn field_names(&self, db: u32, key: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = match state.databases.get(&db).and_then(|d| d.get(key)) {
            Some(MockValue::Hash(fields)) => fields.keys().cloned().collect(),
            _ => vec![],
        };
        names.sort();
        names
    }

    /// Currently selected database.
    pub fn selected(&self) -> u32 {
        self.state.lock().unwrap().selected
    }

    /// Every database switch issued so far.
    pub fn selects(&self) -> Vec<u32> {
        self.state.lock().unwrap().selects.clone()
    }

    /// Number of delete commands issued.
    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    /// Number of fields removed across all delete commands.
    pub fn deleted_fields(&self) -> u64 {
        self.state.lock().unwrap().deleted_fields
    }

    /// Reset the recorded command counters.
    pub fn clear_counters(&self) {
        let mut state = self.state.lock().unwrap();
        state.selects.clear();
        state.delete_calls = 0;
        state.deleted_fields = 0;
    }
}

impl StoreConnection for MockStore {
    fn select_database(&self, db: u32) -> impl Future<Output = StoreResult<()>> + Send {
        let state = self.state.clone();
        async move {
            let mut state = state.lock().unwrap();
            state.check_failure()?;

            if state.fail_select.contains(&db) {
                return Err(StoreError::Connection(format!("select {} refused", db)));
            }
            if db >= state.database_count {
                return Err(StoreError::Command("ERR DB index is out of range".into()));
            }

            state.selected = db;
            state.selects.push(db);
            Ok(())
        }
    }

    fn exists(&self, key: &str) -> impl Future<Output = StoreResult<bool>> + Send {
        let state = self.state.clone();
        let key = key.to_string();
        async move {
            let state = state.lock().unwrap();
            state.check_failure()?;

            Ok(state.active().map_or(false, |db| db.contains_key(&key)))
        }
    }

    fn get_all_fields(
        &self,
        key: &str,
    ) -> impl Future<Output = StoreResult<HashMap<String, Vec<u8>>>> + Send {
        let state = self.state.clone();
        let key = key.to_string();
        async move {
            let state = state.lock().unwrap();
            state.check_failure()?;

            match state.active().and_then(|db| db.get(&key)) {
                Some(MockValue::Hash(fields)) => Ok(fields.clone()),
                Some(MockValue::String(_)) => Err(StoreError::Command(
                    "WRONGTYPE Operation against a key holding the wrong kind of value".into(),
                )),
                None => Ok(HashMap::new()),
            }
        }
    }

    fn delete_fields(
        &self,
        key: &str,
        fields: &[String],
    ) -> impl Future<Output = StoreResult<u64>> + Send {
        let state = self.state.clone();
        let key = key.to_string();
        let fields = fields.to_vec();
        async move {
            let mut state = state.lock().unwrap();
            state.check_failure()?;

            let selected = state.selected;
            if state.fail_delete.contains(&selected) {
                return Err(StoreError::Connection(format!(
                    "delete in db {} refused",
                    selected
                )));
            }

            state.delete_calls += 1;

            let mut removed = 0;
            if let Some(db) = state.databases.get_mut(&selected) {
                match db.get_mut(&key) {
                    Some(MockValue::Hash(hash)) => {
                        for field in &fields {
                            if hash.remove(field).is_some() {
                                removed += 1;
                            }
                        }
                        // Emptied hashes disappear, as on a real server
                        if hash.is_empty() {
                            db.remove(&key);
                        }
                    }
                    Some(MockValue::String(_)) => {
                        return Err(StoreError::Command(
                            "WRONGTYPE Operation against a key holding the wrong kind of value"
                                .into(),
                        ));
                    }
                    None => {}
                }
                if db.is_empty() {
                    state.databases.remove(&selected);
                }
            }

            state.deleted_fields += removed;
            Ok(removed)
        }
    }

    fn list_keyspace_info(&self) -> impl Future<Output = StoreResult<Keyspace>> + Send {
        let state = self.state.clone();
        async move {
            let state = state.lock().unwrap();
            state.check_failure()?;

            if let Some(ref error) = state.fail_keyspace {
                return Err(StoreError::Command(error.clone()));
            }

            Ok(state
                .databases
                .iter()
                .filter(|(_, keys)| !keys.is_empty())
                .map(|(db, keys)| (*db, keys.len() as i64))
                .collect())
        }
    }
}
