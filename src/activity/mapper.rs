//! Event to activity mapping

use std::sync::Arc;

use super::ids::IdGenerator;
use super::model::{ACTIVITYSTREAMS_CONTEXT, Activity, ActivityObject, Generator, Person};
use crate::error::AppError;
use crate::metrics::OBJECTS_MAPPED;
use crate::probe::{MediaProbe, is_web_url};
use crate::webhook::NormalizedEvent;

/// Maps normalized SMS events to `Create` activities
///
/// The message text decides the object:
/// - an http(s) URL probing as `image/*` becomes an `Image`
/// - an http(s) URL probing as `video/*` becomes a `Video`
/// - any other non-empty text (including other URLs) becomes a `Note`
/// - empty text leaves the object empty
pub struct ActivityMapper {
    generator: Generator,
    probe: Arc<dyn MediaProbe>,
    ids: Arc<dyn IdGenerator>,
}

impl ActivityMapper {
    pub fn new(generator: Generator, probe: Arc<dyn MediaProbe>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            generator,
            probe,
            ids,
        }
    }

    /// Build the activity for `event`
    ///
    /// # Errors
    /// Probe failures are returned unchanged; nothing else fails.
    pub async fn map(&self, event: &NormalizedEvent) -> Result<Activity, AppError> {
        tracing::debug!(event_id = ?event.event_id, "Mapping event to activity");

        let mut activity = self.skeleton(event);
        let text = event.text.as_deref().unwrap_or_default();

        if is_web_url(text) {
            let info = self
                .probe
                .probe(text)
                .await
                .map_err(|e| e.record("probe"))?;

            if info.is_image() {
                activity.object = Some(ActivityObject::Image {
                    id: self.object_id(event),
                    url: text.to_string(),
                    media_type: info.mimetype,
                });
            } else if info.is_video() {
                activity.object = Some(ActivityObject::Video {
                    id: self.object_id(event),
                    url: text.to_string(),
                    media_type: info.mimetype,
                });
            } else {
                tracing::debug!(
                    url = text,
                    mimetype = %info.mimetype,
                    "URL is not an image or video; keeping it as text"
                );
            }
        }

        if activity.object.is_none() && !text.is_empty() {
            activity.object = Some(ActivityObject::Note {
                id: self.object_id(event),
                content: text.to_string(),
            });
        }

        OBJECTS_MAPPED
            .with_label_values(&[activity.object_kind()])
            .inc();

        Ok(activity)
    }

    fn skeleton(&self, event: &NormalizedEvent) -> Activity {
        Activity {
            context: ACTIVITYSTREAMS_CONTEXT.to_string(),
            kind: "Create".to_string(),
            actor: Person::from_phone_number(event.sender_phone_number.as_deref()),
            target: Person::from_phone_number(event.to_phone_number.as_deref()),
            object: None,
            generator: self.generator.clone(),
            published: event
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
        }
    }

    fn object_id(&self, event: &NormalizedEvent) -> String {
        event
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| self.ids.next_id())
    }
}
