//! DynamoDB client for note storage

use super::traits::{NoteStore, StoreError};
use crate::notes::{now_iso, CreateNoteRequest, Note, UpdateNoteRequest};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, KeyType, ReturnValue};
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;

/// Client for note operations against one DynamoDB table.
pub struct DynamoClient {
    client: Client,
    table: String,
    key_name: String,
    sort_key_name: Option<String>,
}

impl DynamoClient {
    /// Connect using the standard AWS environment chain (region, credentials
    /// and endpoint overrides all resolve the usual way) and settle the key
    /// attribute names.
    ///
    /// Names detected from the table's key schema win over caller-provided
    /// ones, which win over the `id` default. A failed DescribeTable (no
    /// permission, table not created yet) falls back to the provided or
    /// default names without failing the command.
    pub async fn new(table: &str, key_name: Option<&str>, sort_key_name: Option<&str>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = Client::new(&config);

        let mut key_name = key_name.unwrap_or("id").to_string();
        let mut sort_key_name = sort_key_name.map(str::to_string);

        match client.describe_table().table_name(table).send().await {
            Ok(out) => {
                let schema = out.table().map(|t| t.key_schema()).unwrap_or_default();
                for element in schema {
                    match element.key_type() {
                        KeyType::Hash => key_name = element.attribute_name().to_string(),
                        KeyType::Range if sort_key_name.is_none() => {
                            sort_key_name = Some(element.attribute_name().to_string());
                        }
                        _ => {}
                    }
                }
            }
            Err(err) => {
                tracing::debug!(
                    "describe_table failed for '{}', using provided key names: {}",
                    table,
                    DisplayErrorContext(&err)
                );
            }
        }

        Self {
            client,
            table: table.to_string(),
            key_name,
            sort_key_name,
        }
    }

    /// Primary key map for one item, enforcing the sort key when the table
    /// has one
    fn key_for(
        &self,
        id: &str,
        user_id: Option<&str>,
    ) -> Result<HashMap<String, AttributeValue>, StoreError> {
        let mut key = HashMap::from([(
            self.key_name.clone(),
            AttributeValue::S(id.to_string()),
        )]);
        if let Some(sort_key) = &self.sort_key_name {
            let user_id =
                user_id.ok_or_else(|| StoreError::MissingSortKey(sort_key.clone()))?;
            key.insert(sort_key.clone(), AttributeValue::S(user_id.to_string()));
        }
        Ok(key)
    }

    fn note_from_item(&self, item: &HashMap<String, AttributeValue>) -> Note {
        note_from_item(item, &self.key_name, self.sort_key_name.as_deref())
    }
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

/// Read a note out of a raw item map under the table's attribute names
pub(crate) fn note_from_item(
    item: &HashMap<String, AttributeValue>,
    key_name: &str,
    sort_key_name: Option<&str>,
) -> Note {
    Note {
        id: string_attr(item, key_name),
        user_id: sort_key_name
            .and_then(|sk| item.get(sk))
            .and_then(|v| v.as_s().ok())
            .cloned(),
        title: string_attr(item, "title"),
        content: string_attr(item, "content"),
        created_at: string_attr(item, "created_at"),
        updated_at: string_attr(item, "updated_at"),
    }
}

/// Build the UpdateItem expression covering only the provided fields;
/// `updated_at` is always refreshed
pub(crate) fn build_update_expression(
    req: &UpdateNoteRequest,
) -> (String, HashMap<String, AttributeValue>) {
    let mut expr = String::from("SET updated_at = :u");
    let mut values = HashMap::from([(":u".to_string(), AttributeValue::S(now_iso()))]);
    if let Some(title) = &req.title {
        expr.push_str(", title = :t");
        values.insert(":t".to_string(), AttributeValue::S(title.clone()));
    }
    if let Some(content) = &req.content {
        expr.push_str(", content = :c");
        values.insert(":c".to_string(), AttributeValue::S(content.clone()));
    }
    (expr, values)
}

fn request_error(err: impl std::error::Error) -> StoreError {
    StoreError::Request(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl NoteStore for DynamoClient {
    async fn create(&self, req: CreateNoteRequest) -> Result<Note, StoreError> {
        if let Some(sort_key) = &self.sort_key_name {
            if req.user_id.is_none() {
                return Err(StoreError::MissingSortKey(sort_key.clone()));
            }
        }

        let note = Note::from_request(req);
        let mut item = HashMap::from([
            (self.key_name.clone(), AttributeValue::S(note.id.clone())),
            ("title".to_string(), AttributeValue::S(note.title.clone())),
            (
                "content".to_string(),
                AttributeValue::S(note.content.clone()),
            ),
            (
                "created_at".to_string(),
                AttributeValue::S(note.created_at.clone()),
            ),
            (
                "updated_at".to_string(),
                AttributeValue::S(note.updated_at.clone()),
            ),
        ]);
        if let (Some(sort_key), Some(user_id)) = (&self.sort_key_name, &note.user_id) {
            item.insert(sort_key.clone(), AttributeValue::S(user_id.clone()));
        }

        // PutItem overwrites an existing item with the same key, which is
        // what makes client-supplied ids idempotent
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(request_error)?;

        Ok(note)
    }

    async fn get(&self, id: &str, user_id: Option<&str>) -> Result<Option<Note>, StoreError> {
        let key = self.key_for(id, user_id)?;
        let out = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(request_error)?;

        Ok(out.item().map(|item| self.note_from_item(item)))
    }

    async fn list(&self, user_id: Option<&str>) -> Result<Vec<Note>, StoreError> {
        let mut scan = self.client.scan().table_name(&self.table);
        if let (Some(sort_key), Some(user_id)) = (&self.sort_key_name, user_id) {
            scan = scan
                .filter_expression("#sk = :uid")
                .expression_attribute_names("#sk", sort_key)
                .expression_attribute_values(":uid", AttributeValue::S(user_id.to_string()));
        }
        let out = scan.send().await.map_err(request_error)?;

        Ok(out
            .items()
            .iter()
            .map(|item| self.note_from_item(item))
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
        let (expr, values) = build_update_expression(&req);

        let out = self
            .client
            .update_item()
            .table_name(&self.table)
            .set_key(Some(key))
            .update_expression(expr)
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(request_error)?;

        let attributes = out.attributes().cloned().unwrap_or_default();
        Ok(self.note_from_item(&attributes))
    }

    async fn delete(&self, id: &str, user_id: Option<&str>) -> Result<(), StoreError> {
        let key = self.key_for(id, user_id)?;
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(key))
            .send()
            .await
            .map_err(request_error)?;
        Ok(())
    }

    fn key_name(&self) -> &str {
        &self.key_name
    }

    fn sort_key_name(&self) -> Option<&str> {
        self.sort_key_name.as_deref()
    }
}
