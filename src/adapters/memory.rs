//! In-memory state store and unit of work.
//!
//! A simple, thread-safe backing for unit tests and embedded use without
//! database dependencies. Documents are JSON values addressed by
//! collection and identifier.

use crate::error::UnitOfWorkError;
use crate::ports::{UnitOfWork, UnitOfWorkFactory, UnitOfWorkResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

type DocumentKey = (String, String);
type Documents = BTreeMap<DocumentKey, Value>;

fn key(collection: &str, id: &str) -> DocumentKey {
    (collection.to_owned(), id.to_owned())
}

fn poisoned(detail: &str) -> UnitOfWorkError {
    UnitOfWorkError::backend(std::io::Error::other(detail.to_owned()))
}

/// Thread-safe in-memory document store.
///
/// Shared by cloning; all clones observe the same documents. Suitable for
/// unit tests only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    documents: Arc<RwLock<Documents>>,
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a document directly, outside any unit of work.
    ///
    /// Intended for seeding and assertions; dispatch-path reads go through
    /// [`InMemoryUnitOfWork::fetch`].
    #[must_use]
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.documents
            .read()
            .ok()
            .and_then(|guard| guard.get(&key(collection, id)).cloned())
    }

    /// Inserts a document directly, outside any unit of work.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the store's lock is poisoned.
    pub fn insert(&self, collection: &str, id: &str, document: Value) -> UnitOfWorkResult<()> {
        let mut guard = self
            .documents
            .write()
            .map_err(|_| poisoned("state store lock poisoned"))?;
        guard.insert(key(collection, id), document);
        Ok(())
    }

    /// Returns a point-in-time copy of every document.
    ///
    /// Supports state-equality assertions: a rolled-back dispatch leaves
    /// consecutive snapshots equal.
    #[must_use]
    pub fn snapshot(&self) -> Documents {
        self.documents
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unit of work over an [`InMemoryStateStore`].
///
/// Writes are staged in a private overlay and only reach the shared store
/// on [`UnitOfWork::commit`], applied atomically under the store's write
/// lock. Reads observe the overlay first (read-your-writes). Dropping the
/// scope without committing discards the overlay, so abandoned dispatches
/// leak nothing.
#[derive(Debug)]
pub struct InMemoryUnitOfWork {
    documents: Arc<RwLock<Documents>>,
    staged: BTreeMap<DocumentKey, Option<Value>>,
    completed: bool,
}

impl InMemoryUnitOfWork {
    const fn guard_open(&self) -> UnitOfWorkResult<()> {
        if self.completed {
            Err(UnitOfWorkError::Completed)
        } else {
            Ok(())
        }
    }

    /// Reads a document through the scope's overlay.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Completed`] after commit or rollback, or
    /// a backend error if the store's lock is poisoned.
    pub fn fetch(&self, collection: &str, id: &str) -> UnitOfWorkResult<Option<Value>> {
        self.guard_open()?;
        let document_key = key(collection, id);
        if let Some(staged) = self.staged.get(&document_key) {
            return Ok(staged.clone());
        }
        let guard = self
            .documents
            .read()
            .map_err(|_| poisoned("state store lock poisoned"))?;
        Ok(guard.get(&document_key).cloned())
    }

    /// Returns `true` if a document exists, observing the overlay.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Self::fetch`].
    pub fn exists(&self, collection: &str, id: &str) -> UnitOfWorkResult<bool> {
        self.fetch(collection, id).map(|document| document.is_some())
    }

    /// Stages a document write.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Completed`] after commit or rollback.
    pub fn stage(&mut self, collection: &str, id: &str, document: Value) -> UnitOfWorkResult<()> {
        self.guard_open()?;
        self.staged.insert(key(collection, id), Some(document));
        Ok(())
    }

    /// Stages a document removal.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Completed`] after commit or rollback.
    pub fn stage_removal(&mut self, collection: &str, id: &str) -> UnitOfWorkResult<()> {
        self.guard_open()?;
        self.staged.insert(key(collection, id), None);
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(&mut self) -> UnitOfWorkResult<()> {
        self.guard_open()?;
        self.completed = true;
        let staged = std::mem::take(&mut self.staged);
        let mut guard = self
            .documents
            .write()
            .map_err(|_| poisoned("state store lock poisoned"))?;
        for (document_key, entry) in staged {
            match entry {
                Some(document) => {
                    guard.insert(document_key, document);
                }
                None => {
                    guard.remove(&document_key);
                }
            }
        }
        Ok(())
    }

    async fn rollback(&mut self) -> UnitOfWorkResult<()> {
        self.guard_open()?;
        self.completed = true;
        self.staged.clear();
        Ok(())
    }
}

/// Factory producing fresh [`InMemoryUnitOfWork`] scopes over a shared
/// store.
#[derive(Debug, Clone)]
pub struct InMemoryUnitOfWorkFactory {
    store: InMemoryStateStore,
}

impl InMemoryUnitOfWorkFactory {
    /// Creates a factory over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStateStore) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &InMemoryStateStore {
        &self.store
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryUnitOfWorkFactory {
    type Uow = InMemoryUnitOfWork;

    async fn begin(&self) -> UnitOfWorkResult<Self::Uow> {
        Ok(InMemoryUnitOfWork {
            documents: Arc::clone(&self.store.documents),
            staged: BTreeMap::new(),
            completed: false,
        })
    }
}
