//! Note model and request DTOs.
//!
//! The partition key attribute name is a property of the table, not of the
//! model; `Note` always calls it `id` internally and [`Note::to_table_json`]
//! projects it back under the table's actual attribute names for output.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// UTC timestamp without sub-second digits, e.g. `2026-08-05T12:00:00+00:00`
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// A note stored in the managed table.
///
/// `user_id` carries the sort key value for tables configured with a RANGE
/// key; it stays `None` for simple-key tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to create a note
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    /// Sort key value, required for tables keyed with one
    pub user_id: Option<String>,
    /// Client-generated idempotency id; repeated creates with the same id
    /// overwrite instead of duplicating
    pub client_id: Option<String>,
}

/// Request to update a note; at least one field must be set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Note {
    /// Build a fresh note from a create request. The id honors the
    /// client-supplied idempotency token when present.
    pub fn from_request(req: CreateNoteRequest) -> Self {
        let ts = now_iso();
        Self {
            id: req
                .client_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: req.user_id,
            title: req.title,
            content: req.content,
            created_at: ts.clone(),
            updated_at: ts,
        }
    }

    /// Project the note as JSON under the table's actual attribute names,
    /// matching what PutItem stores.
    pub fn to_table_json(&self, key_name: &str, sort_key_name: Option<&str>) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(key_name.to_string(), json!(self.id));
        if let (Some(sort_key), Some(user_id)) = (sort_key_name, &self.user_id) {
            map.insert(sort_key.to_string(), json!(user_id));
        }
        map.insert("title".to_string(), json!(self.title));
        map.insert("content".to_string(), json!(self.content));
        map.insert("created_at".to_string(), json!(self.created_at));
        map.insert("updated_at".to_string(), json!(self.updated_at));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_generates_uuid_id() {
        let note = Note::from_request(CreateNoteRequest {
            title: "groceries".into(),
            content: "milk, eggs".into(),
            ..Default::default()
        });

        assert!(Uuid::parse_str(&note.id).is_ok());
        assert_eq!(note.title, "groceries");
        assert_eq!(note.content, "milk, eggs");
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.user_id.is_none());
    }

    #[test]
    fn test_from_request_honors_client_id() {
        let note = Note::from_request(CreateNoteRequest {
            title: "t".into(),
            content: "c".into(),
            user_id: Some("alice".into()),
            client_id: Some("stable-id-1".into()),
        });

        assert_eq!(note.id, "stable-id-1");
        assert_eq!(note.user_id.as_deref(), Some("alice"));
    }

    #[test]
    fn test_now_iso_has_seconds_precision() {
        let ts = now_iso();
        assert!(ts.ends_with("+00:00"), "unexpected offset in {ts}");
        assert!(!ts.contains('.'), "sub-second digits in {ts}");
    }

    #[test]
    fn test_to_table_json_uses_table_attribute_names() {
        let note = Note {
            id: "n1".into(),
            user_id: Some("alice".into()),
            title: "t".into(),
            content: "c".into(),
            created_at: "2026-08-05T12:00:00+00:00".into(),
            updated_at: "2026-08-05T12:00:00+00:00".into(),
        };

        let json = note.to_table_json("NoteId", Some("UserId"));
        assert_eq!(json["NoteId"], "n1");
        assert_eq!(json["UserId"], "alice");
        assert_eq!(json["title"], "t");
        assert!(json.get("id").is_none());

        // simple-key table drops the sort key entirely
        let json = note.to_table_json("id", None);
        assert_eq!(json["id"], "n1");
        assert!(json.get("UserId").is_none());
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateNoteRequest::default().is_empty());
        assert!(!UpdateNoteRequest {
            title: Some("t".into()),
            content: None,
        }
        .is_empty());
        assert!(!UpdateNoteRequest {
            title: None,
            content: Some("c".into()),
        }
        .is_empty());
    }
}
