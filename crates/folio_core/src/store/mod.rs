//! Record store client contracts and implementations.
//!
//! # Responsibility
//! - Define the read-all / insert-one contract against a hosted table store.
//! - Collapse every failure into one fetch kind and one write kind.
//!
//! # Invariants
//! - `fetch_all` takes no filter, sort or pagination parameters.
//! - No implementation retries or imposes its own timeout.

use crate::model::record::{Collection, Record};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod rest;

pub use memory::MemoryRecordStore;
pub use rest::RestRecordStore;

pub type FetchResult<T> = Result<T, FetchError>;
pub type WriteResult<T> = Result<T, WriteError>;

/// Underlying cause of a store failure.
///
/// Callers treat every cause the same way; the variants exist for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    /// Connection, TLS or request construction failure.
    Transport(String),
    /// Store answered with a non-success status.
    Status { status: u16, body: String },
    /// Response body was not a JSON array of objects.
    Decode(String),
    /// Store refused the call without reaching the network.
    Unavailable(String),
}

impl Display for StoreFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { status, body } => write!(f, "http status {status}: {body}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreFailure {}

/// Read-all failure for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub collection: Collection,
    pub cause: StoreFailure,
}

impl FetchError {
    pub fn new(collection: &Collection, cause: StoreFailure) -> Self {
        Self {
            collection: collection.clone(),
            cause,
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch from `{}` failed: {}", self.collection, self.cause)
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

/// Insert failure for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    pub collection: Collection,
    pub cause: StoreFailure,
}

impl WriteError {
    pub fn new(collection: &Collection, cause: StoreFailure) -> Self {
        Self {
            collection: collection.clone(),
            cause,
        }
    }
}

impl Display for WriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "insert into `{}` failed: {}", self.collection, self.cause)
    }
}

impl Error for WriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.cause)
    }
}

/// Hosted table-store client.
///
/// Calls run on the caller's task; the UI event loop is single-threaded, so
/// futures are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Returns every row of `collection` in store order.
    async fn fetch_all(&self, collection: &Collection) -> FetchResult<Vec<Record>>;

    /// Inserts exactly one row into `collection`.
    async fn insert(&self, collection: &Collection, row: &Map<String, Value>) -> WriteResult<()>;
}

impl<S: RecordStore> RecordStore for &S {
    async fn fetch_all(&self, collection: &Collection) -> FetchResult<Vec<Record>> {
        (**self).fetch_all(collection).await
    }

    async fn insert(&self, collection: &Collection, row: &Map<String, Value>) -> WriteResult<()> {
        (**self).insert(collection, row).await
    }
}

impl<S: RecordStore> RecordStore for Arc<S> {
    async fn fetch_all(&self, collection: &Collection) -> FetchResult<Vec<Record>> {
        self.as_ref().fetch_all(collection).await
    }

    async fn insert(&self, collection: &Collection, row: &Map<String, Value>) -> WriteResult<()> {
        self.as_ref().insert(collection, row).await
    }
}
