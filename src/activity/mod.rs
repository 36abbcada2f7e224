//! ActivityStreams mapping
//!
//! Builds `Create` activities out of normalized SMS events.

mod ids;
mod mapper;
mod model;

pub use ids::{IdGenerator, UuidGenerator};
pub use mapper::ActivityMapper;
pub use model::{ACTIVITYSTREAMS_CONTEXT, Activity, ActivityObject, Generator, Person};
