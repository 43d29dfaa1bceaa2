//! Web UI request handlers
//!
//! Every handler issues its own store call; the only shared state is the
//! `Arc`'d store handle and the optional default user id the server was
//! started with.

use super::pages;
use crate::dynamo::NoteStore;
use crate::notes::{CreateNoteRequest, UpdateNoteRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared UI server state
pub struct ServerState {
    pub store: Arc<dyn NoteStore>,
    /// Sort key value applied when a request does not carry one
    pub default_user_id: Option<String>,
}

pub type UiState = Arc<ServerState>;

/// Errors surfaced to the browser as plain-text bodies
#[derive(Debug)]
pub enum AppError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, message).into_response()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Form / query payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<String>,
    pub client_id: Option<String>,
}

/// Identifies one item; `id` and `item_id` are both accepted
#[derive(Debug, Default, Deserialize)]
pub struct ItemSelector {
    pub id: Option<String>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
}

impl ItemSelector {
    fn note_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.item_id.as_deref())
            .filter(|v| !v.is_empty())
    }

    fn effective_user_id<'a>(&'a self, state: &'a ServerState) -> Option<&'a str> {
        self.user_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .or(state.default_user_id.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub id: Option<String>,
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all notes, newest first
pub async fn index(State(state): State<UiState>) -> Result<Html<String>, AppError> {
    let mut notes = state
        .store
        .list(state.default_user_id.as_deref())
        .await
        .map_err(|e| AppError::Internal(format!("list failed: {e}")))?;
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Html(pages::notes_page(
        &notes,
        state.store.key_name(),
        state.default_user_id.as_deref(),
    )))
}

/// Create a note from the add form and go back to the list
pub async fn add(
    State(state): State<UiState>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, AppError> {
    let (Some(title), Some(content)) = (non_empty(form.title), non_empty(form.content)) else {
        return Err(AppError::BadRequest("title and content required"));
    };

    let req = CreateNoteRequest {
        title,
        content,
        user_id: non_empty(form.user_id).or_else(|| state.default_user_id.clone()),
        client_id: non_empty(form.client_id),
    };
    state
        .store
        .create(req)
        .await
        .map_err(|e| AppError::Internal(format!("add failed: {e}")))?;

    Ok(Redirect::to("/"))
}

pub async fn delete_get(
    State(state): State<UiState>,
    Query(query): Query<ItemSelector>,
) -> Result<Redirect, AppError> {
    delete_note(&state, query).await
}

pub async fn delete_post(
    State(state): State<UiState>,
    Form(form): Form<ItemSelector>,
) -> Result<Redirect, AppError> {
    delete_note(&state, form).await
}

async fn delete_note(state: &ServerState, selector: ItemSelector) -> Result<Redirect, AppError> {
    let Some(id) = selector.note_id() else {
        return Err(AppError::BadRequest("id required"));
    };
    state
        .store
        .delete(id, selector.effective_user_id(state))
        .await
        .map_err(|e| AppError::Internal(format!("delete failed: {e}")))?;
    Ok(Redirect::to("/"))
}

/// Render the edit form for one note
pub async fn edit_form(
    State(state): State<UiState>,
    Query(query): Query<ItemSelector>,
) -> Result<Html<String>, AppError> {
    let Some(id) = query.note_id() else {
        return Err(AppError::BadRequest("id required"));
    };
    let user_id = query.effective_user_id(&state);
    let note = state
        .store
        .get(id, user_id)
        .await
        .map_err(|e| AppError::Internal(format!("fetch failed: {e}")))?;
    let Some(note) = note else {
        return Err(AppError::NotFound("not found"));
    };

    Ok(Html(pages::edit_page(
        &note,
        state.store.key_name(),
        user_id,
    )))
}

/// Apply the edit form
pub async fn edit_submit(
    State(state): State<UiState>,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let selector = ItemSelector {
        id: form.id,
        item_id: form.item_id,
        user_id: form.user_id,
    };
    let Some(id) = selector.note_id() else {
        return Err(AppError::BadRequest("id required"));
    };

    // fields absent from the form stay untouched; submitted-but-empty
    // fields are stored as written
    let req = UpdateNoteRequest {
        title: form.title,
        content: form.content,
    };
    state
        .store
        .update(id, req, selector.effective_user_id(&state))
        .await
        .map_err(|e| AppError::Internal(format!("update failed: {e}")))?;

    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamo::mock::MockNoteStore;
    use crate::notes::Note;

    fn state_with(store: MockNoteStore, default_user_id: Option<&str>) -> UiState {
        Arc::new(ServerState {
            store: Arc::new(store),
            default_user_id: default_user_id.map(str::to_string),
        })
    }

    async fn seed(state: &UiState, id: &str, title: &str, user_id: Option<&str>) -> Note {
        state
            .store
            .create(CreateNoteRequest {
                title: title.to_string(),
                content: format!("content of {title}"),
                user_id: user_id.map(str::to_string),
                client_id: Some(id.to_string()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_requires_title_and_content() {
        let state = state_with(MockNoteStore::new(), None);

        let err = add(
            State(state),
            Form(AddForm {
                title: Some("only title".into()),
                content: Some(String::new()),
                user_id: None,
                client_id: None,
            }),
        )
        .await
        .unwrap_err();

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_creates_and_redirects() {
        let state = state_with(MockNoteStore::new(), None);

        add(
            State(state.clone()),
            Form(AddForm {
                title: Some("t".into()),
                content: Some("c".into()),
                user_id: None,
                client_id: Some("n1".into()),
            }),
        )
        .await
        .unwrap();

        let note = state.store.get("n1", None).await.unwrap().unwrap();
        assert_eq!(note.title, "t");
    }

    #[tokio::test]
    async fn test_add_falls_back_to_default_user_id() {
        let state = state_with(MockNoteStore::with_sort_key("UserId"), Some("alice"));

        add(
            State(state.clone()),
            Form(AddForm {
                title: Some("t".into()),
                content: Some("c".into()),
                user_id: None,
                client_id: Some("n1".into()),
            }),
        )
        .await
        .unwrap();

        let note = state.store.get("n1", Some("alice")).await.unwrap().unwrap();
        assert_eq!(note.user_id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let state = state_with(MockNoteStore::new(), None);

        let err = delete_note(&state, ItemSelector::default()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest("id required")));
    }

    #[tokio::test]
    async fn test_delete_accepts_item_id_alias() {
        let state = state_with(MockNoteStore::new(), None);
        seed(&state, "n1", "t", None).await;

        delete_note(
            &state,
            ItemSelector {
                id: None,
                item_id: Some("n1".into()),
                user_id: None,
            },
        )
        .await
        .unwrap();

        assert!(state.store.get("n1", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edit_form_missing_note_is_404() {
        let state = state_with(MockNoteStore::new(), None);

        let err = edit_form(
            State(state),
            Query(ItemSelector {
                id: Some("missing".into()),
                item_id: None,
                user_id: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound("not found")));
    }

    #[tokio::test]
    async fn test_edit_submit_updates_note() {
        let state = state_with(MockNoteStore::new(), None);
        seed(&state, "n1", "before", None).await;

        edit_submit(
            State(state.clone()),
            Form(EditForm {
                id: Some("n1".into()),
                item_id: None,
                user_id: None,
                title: Some("after".into()),
                content: Some("new body".into()),
            }),
        )
        .await
        .unwrap();

        let note = state.store.get("n1", None).await.unwrap().unwrap();
        assert_eq!(note.title, "after");
        assert_eq!(note.content, "new body");
    }

    #[tokio::test]
    async fn test_index_lists_newest_first() {
        // seed the mock map directly so created_at values differ
        let mock = MockNoteStore::new();
        {
            let mut notes = mock.notes.write().await;
            for (id, ts) in [
                ("a", "2026-08-01T00:00:00+00:00"),
                ("b", "2026-08-03T00:00:00+00:00"),
                ("c", "2026-08-02T00:00:00+00:00"),
            ] {
                notes.insert(
                    (id.to_string(), None),
                    Note {
                        id: id.to_string(),
                        user_id: None,
                        title: format!("note {id}"),
                        content: "x".to_string(),
                        created_at: ts.to_string(),
                        updated_at: ts.to_string(),
                    },
                );
            }
        }
        let state = state_with(mock, None);

        let Html(body) = index(State(state)).await.unwrap();
        let pos_a = body.find("note a").unwrap();
        let pos_b = body.find("note b").unwrap();
        let pos_c = body.find("note c").unwrap();
        assert!(pos_b < pos_c, "newest note should come first");
        assert!(pos_c < pos_a);
    }
}
