//! Webhook entity model and DTOs.
//!
//! `events`, `data_types` and `topics` are stored as comma-joined strings.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Webhook {
    pub id: DbId,
    pub name: String,
    pub content_type: String,
    pub url: String,
    pub method: String,
    pub events: Vec<String>,
    pub data_types: Vec<String>,
    pub topics: Vec<String>,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
    pub belongs_to_user: DbId,
}

pub type WebhookList = Paginated<Webhook>;

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookCreationInput {
    pub name: String,
    pub content_type: String,
    pub url: String,
    pub method: String,
    pub events: Vec<String>,
    pub data_types: Vec<String>,
    pub topics: Vec<String>,
    pub belongs_to_user: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookUpdateInput {
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub events: Option<Vec<String>>,
    pub data_types: Option<Vec<String>>,
    pub topics: Option<Vec<String>>,
}

impl Webhook {
    pub fn update(&mut self, input: &WebhookUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "name", &mut self.name, input.name.as_ref());
        apply_change(
            &mut changes,
            "content_type",
            &mut self.content_type,
            input.content_type.as_ref(),
        );
        apply_change(&mut changes, "url", &mut self.url, input.url.as_ref());
        apply_change(&mut changes, "method", &mut self.method, input.method.as_ref());
        apply_change(&mut changes, "events", &mut self.events, input.events.as_ref());
        apply_change(
            &mut changes,
            "data_types",
            &mut self.data_types,
            input.data_types.as_ref(),
        );
        apply_change(&mut changes, "topics", &mut self.topics, input.topics.as_ref());
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn webhook() -> Webhook {
        Webhook {
            id: 1,
            name: "hook".into(),
            content_type: "application/json".into(),
            url: "https://example.com/hook".into(),
            method: "POST".into(),
            events: vec!["item_created".into()],
            data_types: vec![],
            topics: vec![],
            created_on: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: 9,
        }
    }

    #[test]
    fn update_reports_changed_list_fields() {
        let mut hook = webhook();
        let changes = hook.update(&WebhookUpdateInput {
            events: Some(vec!["item_created".into(), "item_archived".into()]),
            method: Some("POST".into()),
            ..Default::default()
        });
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field_name, "events");
        assert_eq!(hook.events.len(), 2);
    }
}
