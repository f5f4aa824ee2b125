//! Job posting models.

use bson::{doc, Document};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::wire::json_to_bson;

/// A job posting as submitted by a client.
///
/// Known fields are typed and validated; anything else the caller sends is
/// preserved verbatim through `extra` and round-trips on reads.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct Job {
    #[validate(length(min = 1))]
    pub title: String,

    pub description: String,

    pub category: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    /// Email of the posting user.
    #[serde(rename = "postedByEmail")]
    #[validate(email)]
    pub posted_by_email: String,

    /// Creation timestamp. Defaulted at insert when the caller omits it,
    /// never touched again afterwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Caller-supplied fields outside the known schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Build the document to insert.
    pub fn into_document(self) -> Document {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let mut document = doc! {
            "title": self.title,
            "description": self.description,
            "category": self.category,
            "price": self.price,
            "postedByEmail": self.posted_by_email,
            "created_at": bson::DateTime::from_chrono(created_at),
        };
        for (key, value) in self.extra {
            document.insert(key, json_to_bson(value));
        }
        document
    }
}

/// Partial update for a job. Only present fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, Validate)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,

    #[serde(rename = "postedByEmail", skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub posted_by_email: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPatch {
    /// Build the `$set` document for the update.
    ///
    /// Identity and creation time are never patched; those keys are dropped
    /// if the caller supplies them.
    pub fn into_set_document(self) -> Document {
        let mut set = Document::new();
        if let Some(title) = self.title {
            set.insert("title", title);
        }
        if let Some(description) = self.description {
            set.insert("description", description);
        }
        if let Some(category) = self.category {
            set.insert("category", category);
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(email) = self.posted_by_email {
            set.insert("postedByEmail", email);
        }
        for (key, value) in self.extra {
            if key == "_id" || key == "created_at" {
                continue;
            }
            set.insert(key, json_to_bson(value));
        }
        set
    }
}
