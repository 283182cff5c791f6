//! In-memory data and auth services for local runs and tests.
//!
//! [`MemoryDataService`] behaves like the hosted API for the queries the site
//! issues: it assigns `id` and `created_at`, defaults `read` to `false` on
//! contact messages, and records every mutation so tests can assert on the
//! exact calls made. Bearer tokens are accepted without checks, but a table
//! can be closed to anonymous reads the way row-level security closes
//! `contact_messages`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use super::{AuthError, AuthService, AuthSession, DataService, Filter, RemoteError, Select, Table};

/// A write issued against [`MemoryDataService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Insert {
        table: Table,
        row: Value,
    },
    Update {
        table: Table,
        filters: Vec<Filter>,
        patch: Value,
    },
    Delete {
        table: Table,
        filters: Vec<Filter>,
    },
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Value>>,
    mutations: Vec<Mutation>,
    failing: HashSet<Table>,
    anonymous_unreadable: HashSet<Table>,
}

/// In-process stand-in for the remote data API.
#[derive(Clone, Default)]
pub struct MemoryDataService {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDataService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store rows directly, filling in server-side defaults. Not recorded as
    /// mutations.
    #[must_use]
    pub fn with_rows(self, table: Table, rows: impl IntoIterator<Item = Value>) -> Self {
        {
            let mut state = self.lock();
            let stored = state.tables.entry(table).or_default();
            for row in rows {
                stored.push(with_defaults(table, row));
            }
        }
        self
    }

    /// Current contents of `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    /// Every mutation issued so far, oldest first.
    #[must_use]
    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    /// Make every request touching `table` fail with a 503.
    pub fn fail_table(&self, table: Table) {
        self.lock().failing.insert(table);
    }

    /// Undo [`fail_table`](Self::fail_table).
    pub fn restore_table(&self, table: Table) {
        self.lock().failing.remove(&table);
    }

    /// Reject reads of `table` without a bearer token, including inserts
    /// that ask for the stored row back.
    pub fn deny_anonymous_reads(&self, table: Table) {
        self.lock().anonymous_unreadable.insert(table);
    }

    fn check_read(
        state: &MemoryState,
        table: Table,
        bearer: Option<&str>,
    ) -> Result<(), RemoteError> {
        if bearer.is_none() && state.anonymous_unreadable.contains(&table) {
            return Err(RemoteError::Api {
                status: 401,
                message: format!("permission denied for table {table}"),
            });
        }
        Ok(())
    }

    fn check(state: &MemoryState, table: Table) -> Result<(), RemoteError> {
        if state.failing.contains(&table) {
            return Err(RemoteError::Api {
                status: 503,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }

    /// Record and store an inserted row, returning it with server defaults.
    fn store(state: &mut MemoryState, table: Table, row: Value) -> Value {
        state.mutations.push(Mutation::Insert {
            table,
            row: row.clone(),
        });
        let stored = with_defaults(table, row);
        state.tables.entry(table).or_default().push(stored.clone());
        stored
    }
}

/// Fill in the columns the remote store assigns on insert.
fn with_defaults(table: Table, row: Value) -> Value {
    let mut object = match row {
        Value::Object(object) => object,
        _ => Map::new(),
    };

    object
        .entry("id")
        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
    if table.has_created_at() {
        object.entry("created_at").or_insert_with(|| {
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
        });
    }
    if table == Table::ContactMessages {
        object.entry("read").or_insert(Value::Bool(false));
    }

    Value::Object(object)
}

fn matches_all(filters: &[Filter], row: &Value) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

#[async_trait]
impl DataService for MemoryDataService {
    async fn select(
        &self,
        query: &Select,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let state = self.lock();
        Self::check(&state, query.table)?;
        Self::check_read(&state, query.table, bearer)?;

        let mut rows: Vec<Value> = state
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(&query.filters, row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| order.compare(a, b));
        }

        Ok(rows)
    }

    async fn insert(
        &self,
        table: Table,
        row: Value,
        bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut state = self.lock();
        Self::check(&state, table)?;
        Self::check_read(&state, table, bearer)?;
        Ok(vec![Self::store(&mut state, table, row)])
    }

    async fn insert_without_return(
        &self,
        table: Table,
        row: Value,
        _bearer: Option<&str>,
    ) -> Result<(), RemoteError> {
        let mut state = self.lock();
        Self::check(&state, table)?;
        Self::store(&mut state, table, row);
        Ok(())
    }

    async fn update(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
        _bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut state = self.lock();
        Self::check(&state, table)?;

        state.mutations.push(Mutation::Update {
            table,
            filters: filters.to_vec(),
            patch: patch.clone(),
        });

        let mut updated = Vec::new();
        if let (Some(rows), Value::Object(patch)) = (state.tables.get_mut(&table), &patch) {
            for row in rows.iter_mut().filter(|row| matches_all(filters, row)) {
                if let Value::Object(object) = row {
                    for (key, value) in patch {
                        object.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }

        Ok(updated)
    }

    async fn delete(
        &self,
        table: Table,
        filters: &[Filter],
        _bearer: Option<&str>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut state = self.lock();
        Self::check(&state, table)?;

        state.mutations.push(Mutation::Delete {
            table,
            filters: filters.to_vec(),
        });

        let Some(rows) = state.tables.get_mut(&table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|row| matches_all(filters, row));
        *rows = kept;

        Ok(removed)
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}

// =============================================================================
// MemoryAuth
// =============================================================================

#[derive(Default)]
struct AuthState {
    users: HashMap<String, SecretString>,
    /// refresh token -> email
    refresh_tokens: HashMap<String, String>,
    revoked: HashSet<String>,
}

/// In-process stand-in for the auth API with a fixed set of accounts.
#[derive(Clone)]
pub struct MemoryAuth {
    state: Arc<Mutex<AuthState>>,
    token_ttl: Duration,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            token_ttl: Duration::hours(1),
        }
    }
}

impl MemoryAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account.
    #[must_use]
    pub fn with_user(self, email: &str, password: &str) -> Self {
        self.lock()
            .users
            .insert(email.to_lowercase(), SecretString::from(password.to_string()));
        self
    }

    /// Lifetime of issued access tokens.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Whether `access_token` has been revoked by [`sign_out`](AuthService::sign_out).
    #[must_use]
    pub fn is_revoked(&self, access_token: &str) -> bool {
        self.lock().revoked.contains(access_token)
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(&self, state: &mut AuthState, email: &str) -> AuthSession {
        let refresh_token = uuid::Uuid::new_v4().to_string();
        state
            .refresh_tokens
            .insert(refresh_token.clone(), email.to_string());

        AuthSession {
            access_token: uuid::Uuid::new_v4().to_string(),
            refresh_token,
            expires_at: (Utc::now() + self.token_ttl).timestamp(),
            email: email.to_string(),
        }
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let email = email.trim().to_lowercase();
        let mut state = self.lock();
        let valid = state
            .users
            .get(&email)
            .is_some_and(|stored| stored.expose_secret() == password.expose_secret());
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.issue(&mut state, &email))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let mut state = self.lock();
        // Refresh tokens are single use.
        let email = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(AuthError::SessionExpired)?;
        Ok(self.issue(&mut state, &email))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.lock().revoked.insert(access_token.to_string());
        Ok(())
    }
}
