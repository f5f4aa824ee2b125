//! JSON <-> BSON conversions for the wire format.
//!
//! Stored documents leave the API as plain JSON: ObjectIds as 24-char hex
//! strings, datetimes as RFC 3339 strings with millisecond precision.
//! Inbound free-form fields are mapped to their natural BSON counterparts
//! without any extended-JSON interpretation.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use serde_json::{Map, Value};

/// Convert a BSON value to its wire JSON representation.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Bson::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null => Value::Null,
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a stored document to a wire JSON object.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

/// Convert a free-form JSON value to BSON for storage.
///
/// Integers become `Int32` when they fit and `Int64` otherwise; non-integral
/// numbers become `Double`. Objects are stored as nested documents even when
/// they look like extended JSON; what the caller sends is what gets stored.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else {
                n.as_f64().map(Bson::Double).unwrap_or(Bson::Null)
            }
        }
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(json_map_to_document(map)),
    }
}

/// Convert a JSON object to a BSON document.
pub fn json_map_to_document(map: Map<String, Value>) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn object_ids_and_datetimes_render_as_strings() {
        let oid = ObjectId::parse_str("665f0e2a9b3c4d5e6f708192").unwrap();
        let dt = bson::DateTime::from_millis(1_717_243_200_000);

        let doc = bson::doc! { "_id": oid, "created_at": dt, "price": 120_i32 };
        let json = document_to_json(doc);

        assert_eq!(json["_id"], json!("665f0e2a9b3c4d5e6f708192"));
        assert_eq!(json["created_at"], json!("2024-06-01T12:00:00.000Z"));
        assert_eq!(json["price"], json!(120));
    }

    #[test]
    fn free_form_json_maps_to_natural_bson() {
        let map = json!({
            "deadline": "2024-07-01",
            "budget": 1500,
            "remote": true,
            "tags": ["design", "logo"],
            "client": { "rating": 4.5 }
        });

        let Value::Object(map) = map else { unreachable!() };
        let doc = json_map_to_document(map);

        assert_eq!(doc.get_str("deadline").unwrap(), "2024-07-01");
        assert_eq!(doc.get_i32("budget").unwrap(), 1500);
        assert!(doc.get_bool("remote").unwrap());
        assert_eq!(doc.get_array("tags").unwrap().len(), 2);
        assert_eq!(
            doc.get_document("client").unwrap().get_f64("rating").unwrap(),
            4.5
        );
    }
}
