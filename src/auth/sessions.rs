//! Session Store
//! Mission: Fixed-capacity table of live sessions with sliding-window expiry

use crate::auth::error::AuthError;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_LIMIT: usize = 100;
pub const SESSION_TIMEOUT_SECS: i64 = 3600;

/// A server-issued session. Copies handed to callers are snapshots; the
/// authoritative entry lives inside the store.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub username: String,
    pub created_at: i64,
    pub last_access: i64,
}

struct Slot {
    session: Session,
    valid: bool,
}

struct Table {
    slots: Vec<Slot>,
    // Indices of invalidated slots, reused before the table grows.
    free: Vec<usize>,
}

/// Shared session table. Every operation takes the one lock, so no two
/// requests ever observe or mutate overlapping entries concurrently.
///
/// Capacity is hard: once `capacity` sessions are live, logins fail with
/// `SessionLimit` until expiry or logout frees a slot. Freed slots go on a
/// free list and are recycled, so a long-running process never exhausts the
/// table through churn alone.
pub struct SessionStore {
    inner: Mutex<Table>,
    capacity: usize,
    timeout_secs: i64,
}

impl SessionStore {
    pub fn new(capacity: usize, timeout_secs: i64) -> Self {
        Self {
            inner: Mutex::new(Table {
                slots: Vec::with_capacity(capacity),
                free: Vec::new(),
            }),
            capacity,
            timeout_secs,
        }
    }

    /// Allocate a fresh session for `username`.
    pub fn create(&self, username: &str) -> Result<Session, AuthError> {
        let mut table = self.inner.lock();

        let now = now_ts();
        let session = Session {
            session_id: Self::fresh_id(&table),
            username: username.to_string(),
            created_at: now,
            last_access: now,
        };

        let slot = Slot {
            session: session.clone(),
            valid: true,
        };

        if let Some(idx) = table.free.pop() {
            table.slots[idx] = slot;
        } else if table.slots.len() < self.capacity {
            table.slots.push(slot);
        } else {
            return Err(AuthError::SessionLimit);
        }

        debug!("Session created for {}", username);
        Ok(session)
    }

    /// Look up a session id, enforce the sliding-window expiry, and touch
    /// `last_access` on success. An expired entry is invalidated in place,
    /// so the next lookup with the same id reports `SessionNotFound`.
    pub fn validate(&self, session_id: &str) -> Result<Session, AuthError> {
        let mut table = self.inner.lock();
        let timeout = self.timeout_secs;

        let idx = match Self::find_valid(&table, session_id) {
            Some(idx) => idx,
            None => return Err(AuthError::SessionNotFound),
        };

        let now = now_ts();
        if now - table.slots[idx].session.last_access > timeout {
            table.slots[idx].valid = false;
            table.free.push(idx);
            return Err(AuthError::SessionExpired);
        }

        table.slots[idx].session.last_access = now;
        Ok(table.slots[idx].session.clone())
    }

    /// Mark a session invalid. Calling again with the same id reports
    /// `SessionNotFound`.
    pub fn invalidate(&self, session_id: &str) -> Result<(), AuthError> {
        let mut table = self.inner.lock();

        let idx = match Self::find_valid(&table, session_id) {
            Some(idx) => idx,
            None => return Err(AuthError::SessionNotFound),
        };

        table.slots[idx].valid = false;
        table.free.push(idx);
        Ok(())
    }

    pub fn live_count(&self) -> usize {
        self.inner.lock().slots.iter().filter(|s| s.valid).count()
    }

    fn find_valid(table: &Table, session_id: &str) -> Option<usize> {
        table
            .slots
            .iter()
            .position(|s| s.valid && s.session.session_id == session_id)
    }

    // Fresh ids must not collide with any currently valid id. Uuid v4 makes
    // a collision vanishingly unlikely, but the table contract demands the
    // check regardless.
    fn fresh_id(table: &Table) -> String {
        loop {
            let id = format!("sess_{}", Uuid::new_v4().simple());
            if Self::find_valid(table, &id).is_none() {
                return id;
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SESSION_LIMIT, SESSION_TIMEOUT_SECS)
    }
}

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}
