//! Data models for the application
//!
//! Event payloads delivered by the trigger infrastructure.

mod event;

// Re-export all models for convenient imports
pub use event::{
    CreationEvent, EventGridEvent, EventKind, SubscriptionValidationData,
    SubscriptionValidationResponse, BLOB_CREATED_EVENT, SUBSCRIPTION_VALIDATION_EVENT,
};
