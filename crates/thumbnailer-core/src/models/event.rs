//! Event Grid envelope and blob-created payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidEventError;

pub const BLOB_CREATED_EVENT: &str = "Microsoft.Storage.BlobCreated";
pub const SUBSCRIPTION_VALIDATION_EVENT: &str = "Microsoft.EventGrid.SubscriptionValidationEvent";

/// Event Grid schema envelope. `data` is kept raw and interpreted per event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridEvent {
    #[serde(default)]
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Event types the webhook reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    BlobCreated,
    SubscriptionValidation,
    Other,
}

impl EventGridEvent {
    pub fn kind(&self) -> EventKind {
        if self.event_type.eq_ignore_ascii_case(BLOB_CREATED_EVENT) {
            EventKind::BlobCreated
        } else if self
            .event_type
            .eq_ignore_ascii_case(SUBSCRIPTION_VALIDATION_EVENT)
        {
            EventKind::SubscriptionValidation
        } else {
            EventKind::Other
        }
    }

    /// Interpret `data` as a blob-created payload.
    ///
    /// A missing `url` is not rejected here; the pipeline validates it so the
    /// same rule applies no matter how the event arrived.
    pub fn creation_event(&self) -> Result<CreationEvent, InvalidEventError> {
        if !self.data.is_object() {
            return Err(InvalidEventError::MalformedPayload(format!(
                "event {} carries no data object",
                self.id
            )));
        }
        Ok(serde_json::from_value(self.data.clone())?)
    }

    pub fn validation_data(&self) -> Result<SubscriptionValidationData, InvalidEventError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// The subset of a blob-created notification the pipeline needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationEvent {
    #[serde(rename = "url", default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl CreationEvent {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: Some(source_url.into()),
            content_type: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionValidationData {
    pub validation_code: String,
    #[serde(default)]
    pub validation_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionValidationResponse {
    pub validation_response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blob_created(data: serde_json::Value) -> EventGridEvent {
        serde_json::from_value(json!({
            "id": "831e1650-001e-001b-66ab-eeb76e069631",
            "eventType": "Microsoft.Storage.BlobCreated",
            "subject": "/blobServices/default/containers/images/blobs/cat.jpg",
            "eventTime": "2017-06-26T18:41:00.9584103Z",
            "data": data,
            "dataVersion": "",
            "topic": "/subscriptions/id/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_blob_created_event() {
        let event = blob_created(json!({
            "api": "PutBlob",
            "contentType": "image/jpeg",
            "contentLength": 524288,
            "blobType": "BlockBlob",
            "url": "https://acct.blob.core.windows.net/images/cat.jpg"
        }));

        assert_eq!(event.kind(), EventKind::BlobCreated);
        assert!(event.event_time.is_some());

        let creation = event.creation_event().unwrap();
        assert_eq!(
            creation.source_url.as_deref(),
            Some("https://acct.blob.core.windows.net/images/cat.jpg")
        );
        assert_eq!(creation.content_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_missing_url_is_left_for_validation() {
        let event = blob_created(json!({ "contentType": "image/png" }));
        let creation = event.creation_event().unwrap();
        assert_eq!(creation.source_url, None);
    }

    #[test]
    fn test_non_object_data_is_malformed() {
        let event = blob_created(json!("https://acct.blob.core.windows.net/images/cat.jpg"));
        assert!(matches!(
            event.creation_event(),
            Err(InvalidEventError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_wrongly_typed_url_is_malformed() {
        let event = blob_created(json!({ "url": 42 }));
        assert!(matches!(
            event.creation_event(),
            Err(InvalidEventError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_event_kind_detection() {
        let event: EventGridEvent = serde_json::from_value(json!({
            "eventType": "Microsoft.EventGrid.SubscriptionValidationEvent",
            "data": { "validationCode": "512d38b6-c7b8-40c8-89fe-f46f9e9622b6" }
        }))
        .unwrap();
        assert_eq!(event.kind(), EventKind::SubscriptionValidation);
        let data = event.validation_data().unwrap();
        assert_eq!(data.validation_code, "512d38b6-c7b8-40c8-89fe-f46f9e9622b6");
        assert_eq!(data.validation_url, None);

        let event: EventGridEvent = serde_json::from_value(json!({
            "eventType": "Microsoft.Storage.BlobDeleted",
            "data": {}
        }))
        .unwrap();
        assert_eq!(event.kind(), EventKind::Other);
    }

    #[test]
    fn test_validation_url_is_kept() {
        let event: EventGridEvent = serde_json::from_value(json!({
            "eventType": "Microsoft.EventGrid.SubscriptionValidationEvent",
            "data": {
                "validationCode": "512d38b6-c7b8-40c8-89fe-f46f9e9622b6",
                "validationUrl": "https://rp-eastus2.eventgrid.azure.net/eventsubscriptions/thumbs/validate?id=512d38b6"
            }
        }))
        .unwrap();
        let data = event.validation_data().unwrap();
        assert_eq!(
            data.validation_url.as_deref(),
            Some("https://rp-eastus2.eventgrid.azure.net/eventsubscriptions/thumbs/validate?id=512d38b6")
        );
    }
}
