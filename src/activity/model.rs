//! Activity models
//!
//! Serialized shape:
//! ```json
//! {
//!   "@context": "https://www.w3.org/ns/activitystreams",
//!   "type": "Create",
//!   "actor": { "id": "+33600000001", "name": "+33600000001", "type": "Person" },
//!   "target": { "id": "+33600000002", "name": "+33600000002", "type": "Person" },
//!   "object": { "id": "evt-1", "type": "Note", "content": "hello" },
//!   "generator": { "id": "callr", "name": "callr", "type": "Service" },
//!   "published": 1477565064000
//! }
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::AppError;

pub const ACTIVITYSTREAMS_CONTEXT: &str = "https://www.w3.org/ns/activitystreams";

/// `Create` activity produced for one inbound SMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: Person,
    pub target: Person,
    /// `None` is written as an empty object
    #[serde(serialize_with = "object_or_empty")]
    pub object: Option<ActivityObject>,
    pub generator: Generator,
    /// Epoch milliseconds
    pub published: i64,
}

impl Activity {
    /// Label of the resolved object, `"Empty"` when none was resolved.
    pub fn object_kind(&self) -> &'static str {
        match &self.object {
            Some(ActivityObject::Image { .. }) => "Image",
            Some(ActivityObject::Video { .. }) => "Video",
            Some(ActivityObject::Note { .. }) => "Note",
            None => "Empty",
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Phone number seen as an ActivityStreams `Person`
///
/// Absent numbers serialize as `null` and are stripped before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Person {
    pub fn from_phone_number(number: Option<&str>) -> Self {
        Self {
            id: number.map(str::to_string),
            name: number.map(str::to_string),
            kind: "Person".to_string(),
        }
    }
}

/// Service that emitted the activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generator {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Generator {
    pub fn service(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: "Service".to_string(),
        }
    }
}

/// Object of the `Create` activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ActivityObject {
    Image {
        id: String,
        url: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
    Video {
        id: String,
        url: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
    Note {
        id: String,
        content: String,
    },
}

fn object_or_empty<S>(object: &Option<ActivityObject>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match object {
        Some(object) => object.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
