//! Common test utilities for integration tests

#![allow(dead_code)]

pub mod media_server;
pub mod schema_validator;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use callr_bridge::Parser;
use callr_bridge::activity::{Generator, IdGenerator};
use callr_bridge::error::AppError;
use callr_bridge::probe::{FileInfo, MediaProbe};
use callr_bridge::schema::JsonSchemaRegistry;
use mockall::mock;
use serde_json::{Value, json};

pub const SENDER: &str = "+33639980042";
pub const RECIPIENT: &str = "+33678912345";
pub const SERVICE_ID: &str = "callr-test";
pub const SERVICE_NAME: &str = "callr";

mock! {
    pub Probe {}

    #[async_trait]
    impl MediaProbe for Probe {
        async fn probe(&self, url: &str) -> Result<FileInfo, AppError>;
    }
}

/// Ids `generated-1`, `generated-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        format!("generated-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Probe mock answering every URL with `mimetype`
pub fn probe_returning(mimetype: &'static str) -> MockProbe {
    let mut probe = MockProbe::new();
    probe.expect_probe().returning(move |url| {
        Ok(FileInfo {
            url: url.to_string(),
            mimetype: mimetype.to_string(),
            size: Some(1024),
        })
    });
    probe
}

/// Probe mock that fails the test if it is ever called
pub fn probe_never_called() -> MockProbe {
    let mut probe = MockProbe::new();
    probe.expect_probe().never();
    probe
}

/// Parser over `probe`, the bundled schemas and sequential ids
pub fn parser_with(probe: impl MediaProbe + 'static) -> Parser {
    Parser::new(
        Generator::service(SERVICE_ID, SERVICE_NAME),
        Arc::new(probe),
        Arc::new(JsonSchemaRegistry::bundled().expect("bundled schemas compile")),
        Arc::new(SequentialIds::default()),
    )
}

/// `sms.mo` body as Callr sends it
pub fn sms_body(text: &str) -> Value {
    json!({
        "type": "sms.mo",
        "data": {
            "from": SENDER,
            "to": RECIPIENT,
            "text": text,
            "hash": "be5f0b6a",
            "user": "callr-user",
        },
        "event_id": "7cd4d2ec-4bbf-4d1e-8f3e-18b4b9b0c8a5",
        "event_at": "2016-10-27 10:44:24",
    })
}

/// Transport wrapper around `body`
pub fn delivery(body: Value) -> Value {
    json!({
        "request": {
            "headers": { "content-type": "application/json" },
            "body": body,
        }
    })
}
