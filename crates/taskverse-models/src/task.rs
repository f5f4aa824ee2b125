//! Accepted-task models.

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::wire::json_to_bson;

/// A task acceptance as submitted by a client.
///
/// Any caller-supplied `_id` is dropped before insert; the store always
/// assigns a fresh identifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct AcceptedTask {
    /// Email of the accepting user.
    #[serde(rename = "userEmail")]
    #[validate(email)]
    pub user_email: String,

    /// Acceptance timestamp. Defaulted at insert when the caller omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,

    /// Caller-supplied fields outside the known schema, typically a snapshot
    /// of the accepted job.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AcceptedTask {
    /// Build the document to insert, with any inbound identifier stripped.
    pub fn into_document(self) -> Document {
        let accepted_at = self.accepted_at.unwrap_or_else(Utc::now);
        let mut document = doc! {
            "userEmail": self.user_email,
            "accepted_at": bson::DateTime::from_chrono(accepted_at),
        };
        for (key, value) in self.extra {
            if key == "_id" {
                continue;
            }
            document.insert(key, json_to_bson(value));
        }
        document
    }
}
