//! In-memory mock implementation of NoteStore for testing.
//!
//! Mirrors DynamoDB's item semantics where they are observable: puts
//! overwrite, deletes are idempotent, and updates upsert the key.

use super::traits::{NoteStore, StoreError};
use crate::notes::{now_iso, CreateNoteRequest, Note, UpdateNoteRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

type ItemKey = (String, Option<String>);

/// In-memory NoteStore keyed by (id, sort key value).
pub struct MockNoteStore {
    pub notes: RwLock<HashMap<ItemKey, Note>>,
    key_name: String,
    sort_key_name: Option<String>,
}

impl MockNoteStore {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            key_name: "id".to_string(),
            sort_key_name: None,
        }
    }

    /// Mock for a table keyed with a sort key
    pub fn with_sort_key(sort_key_name: &str) -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            key_name: "id".to_string(),
            sort_key_name: Some(sort_key_name.to_string()),
        }
    }

    fn key_for(&self, id: &str, user_id: Option<&str>) -> Result<ItemKey, StoreError> {
        if let Some(sort_key) = &self.sort_key_name {
            if user_id.is_none() {
                return Err(StoreError::MissingSortKey(sort_key.clone()));
            }
        }
        Ok((id.to_string(), user_id.map(str::to_string)))
    }
}

#[async_trait]
impl NoteStore for MockNoteStore {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note, StoreError> {
        if let Some(sort_key) = &self.sort_key_name {
            if req.user_id.is_none() {
                return Err(StoreError::MissingSortKey(sort_key.clone()));
            }
        }
        let note = Note::from_request(req);
        self.notes
            .write()
            .await
            .insert((note.id.clone(), note.user_id.clone()), note.clone());
        Ok(note)
    }

    async fn get(&self, id: &str, user_id: Option<&str>) -> Result<Option<Note>, StoreError> {
        let key = self.key_for(id, user_id)?;
        Ok(self.notes.read().await.get(&key).cloned())
    }

    async fn list(&self, user_id: Option<&str>) -> Result<Vec<Note>, StoreError> {
        let notes = self.notes.read().await;
        let filter = match (&self.sort_key_name, user_id) {
            (Some(_), Some(user_id)) => Some(user_id),
            _ => None,
        };
        Ok(notes
            .values()
            .filter(|n| filter.is_none() || n.user_id.as_deref() == filter)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &str,
        req: UpdateNoteRequest,
        user_id: Option<&str>,
    ) -> Result<Note, StoreError> {
        if req.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }
        let key = self.key_for(id, user_id)?;
        let mut notes = self.notes.write().await;
        let note = notes.entry(key).or_insert_with(|| Note {
            id: id.to_string(),
            user_id: user_id.map(str::to_string),
            title: String::new(),
            content: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        });
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        note.updated_at = now_iso();
        Ok(note.clone())
    }

    async fn delete(&self, id: &str, user_id: Option<&str>) -> Result<(), StoreError> {
        let key = self.key_for(id, user_id)?;
        self.notes.write().await.remove(&key);
        Ok(())
    }

    fn key_name(&self) -> &str {
        &self.key_name
    }

    fn sort_key_name(&self) -> Option<&str> {
        self.sort_key_name.as_deref()
    }
}
