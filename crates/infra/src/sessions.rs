//! Session-scoped ledgers.
//!
//! Each session owns exactly one [`Ledger`]. The registry hands out cheap
//! [`SessionHandle`]s; every ledger operation runs under that ledger's mutex, so
//! validation, mutation and audit append are observed as one step even when
//! several request handlers share the registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use stockroom_core::{LedgerError, SessionId};
use stockroom_inventory::{AuditEntry, Ledger, RemoveOutcome, Snapshot};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// A previous holder panicked while holding the lock.
    #[error("session state poisoned")]
    Poisoned,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Handle to one session's ledger.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    ledger: Arc<Mutex<Ledger>>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with_ledger<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> Result<T, SessionError> {
        let mut ledger = self.ledger.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&mut ledger))
    }

    pub fn add(&self, name: &str, amount: i64) -> Result<i64, SessionError> {
        self.with_ledger(|l| l.add(name, amount))?
            .map_err(SessionError::from)
    }

    pub fn remove(&self, name: &str, amount: i64) -> Result<RemoveOutcome, SessionError> {
        self.with_ledger(|l| l.remove(name, amount))?
            .map_err(SessionError::from)
    }

    pub fn remove_all(&self, name: &str) -> Result<i64, SessionError> {
        self.with_ledger(|l| l.remove_all(name))?
            .map_err(SessionError::from)
    }

    pub fn snapshot(&self) -> Result<Snapshot, SessionError> {
        self.with_ledger(|l| l.snapshot())
    }

    /// Newest-first audit entries, copied out so the lock is released on return.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>, SessionError> {
        self.with_ledger(|l| l.history(limit).cloned().collect())
    }
}

/// In-memory registry of open sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Ledger>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session with an empty ledger.
    pub fn open(&self) -> Result<SessionHandle, SessionError> {
        let id = SessionId::new();
        let ledger = Arc::new(Mutex::new(Ledger::empty(id)));

        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.insert(id, ledger.clone());
        tracing::info!(session = %id, "session opened");

        Ok(SessionHandle { id, ledger })
    }

    pub fn get(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        let sessions = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        sessions
            .get(&id)
            .map(|ledger| SessionHandle {
                id,
                ledger: ledger.clone(),
            })
            .ok_or(SessionError::UnknownSession(id))
    }

    /// Close a session, discarding its ledger. Outstanding handles keep working
    /// on the detached ledger until dropped.
    pub fn close(&self, id: SessionId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        match sessions.remove(&id) {
            Some(_) => {
                tracing::info!(session = %id, "session closed");
                Ok(())
            }
            None => Err(SessionError::UnknownSession(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.open().unwrap();
        let b = registry.open().unwrap();

        a.add("widget", 3).unwrap();

        assert_eq!(a.snapshot().unwrap().total_units(), 3);
        assert!(b.snapshot().unwrap().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn get_returns_the_same_ledger() {
        let registry = SessionRegistry::new();
        let opened = registry.open().unwrap();
        opened.add("bolt", 2).unwrap();

        let fetched = registry.get(opened.id()).unwrap();
        assert_eq!(fetched.remove("bolt", 1).unwrap().quantity, 1);
        assert_eq!(opened.history(None).unwrap().len(), 2);
    }

    #[test]
    fn unknown_and_closed_sessions_are_reported() {
        let registry = SessionRegistry::new();
        let missing = SessionId::new();
        assert_eq!(
            registry.get(missing).unwrap_err(),
            SessionError::UnknownSession(missing)
        );

        let handle = registry.open().unwrap();
        registry.close(handle.id()).unwrap();
        assert!(matches!(
            registry.get(handle.id()),
            Err(SessionError::UnknownSession(_))
        ));
        assert!(registry.close(handle.id()).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn ledger_errors_pass_through() {
        let registry = SessionRegistry::new();
        let handle = registry.open().unwrap();
        handle.add("widget", 2).unwrap();

        let err = handle.remove("widget", 5).unwrap_err();
        assert_eq!(
            err,
            SessionError::Ledger(LedgerError::insufficient_stock("widget", 2, 5))
        );
    }

    #[test]
    fn concurrent_writers_keep_counts_and_audit_consistent() {
        let registry = Arc::new(SessionRegistry::new());
        let id = registry.open().unwrap().id();

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let handle = registry.get(id).unwrap();
                    for _ in 0..50 {
                        handle.add("widget", 2).unwrap();
                        let _ = handle.remove("widget", 1);
                    }
                })
            })
            .collect();

        for w in workers {
            w.join().unwrap();
        }

        let handle = registry.get(id).unwrap();
        let history = handle.history(None).unwrap();
        assert_eq!(handle.snapshot().unwrap().quantity_of("widget"), Some(400));
        assert_eq!(history.len(), 800);

        // Sequences are dense and newest-first.
        let sequences: Vec<u64> = history.iter().map(|e| e.sequence).collect();
        let expected: Vec<u64> = (1..=800).rev().collect();
        assert_eq!(sequences, expected);
    }
}
