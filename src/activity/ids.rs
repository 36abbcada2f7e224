//! Object identifier generation

/// Source of fresh object ids for events that carry none
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 in hyphenated form
///
/// Example: "9b2f6c1e-3d4a-4f0b-8a52-1c7e2d9f4b30"
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
