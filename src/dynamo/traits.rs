//! NoteStore trait definition
//!
//! Abstract interface over the managed table. `DynamoClient` is the real
//! implementation; an in-memory mock stands in for it in tests.

use crate::notes::{CreateNoteRequest, Note, UpdateNoteRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the storage layer.
///
/// `Request` wraps whatever the SDK reports (missing credentials, table not
/// found, access denied, ...); the other variants are raised locally before
/// any remote call is made.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table requires sort key '{0}'; provide a user id")]
    MissingSortKey(String),
    #[error("at least one of title or content must be provided for update")]
    EmptyUpdate,
    #[error("{0}")]
    Request(String),
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Write a new note; an existing item with the same key is overwritten
    async fn create(&self, req: CreateNoteRequest) -> Result<Note, StoreError>;

    /// Fetch a single note by key
    async fn get(&self, id: &str, user_id: Option<&str>) -> Result<Option<Note>, StoreError>;

    /// Scan all notes, restricted to one sort-key value when the table has
    /// a sort key and a user id is given
    async fn list(&self, user_id: Option<&str>) -> Result<Vec<Note>, StoreError>;

    /// Mutate title and/or content in place, returning the stored item
    async fn update(
        &self,
        id: &str,
        req: UpdateNoteRequest,
        user_id: Option<&str>,
    ) -> Result<Note, StoreError>;

    /// Remove a note by key
    async fn delete(&self, id: &str, user_id: Option<&str>) -> Result<(), StoreError>;

    /// Partition key attribute name in use
    fn key_name(&self) -> &str;

    /// Sort key attribute name, when the table has one
    fn sort_key_name(&self) -> Option<&str>;
}
