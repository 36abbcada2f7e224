//! callr-bridge - Callr SMS webhooks as ActivityStreams 2.0 activities
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Normalizer (webhook)                      │
//! │  - Typed decoding of { request: { body } }                  │
//! │  - Only sms.mo bodies pass                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Mapper (activity)                        │
//! │  - Create activity with actor/target/generator              │
//! │  - Image / Video / Note object via media probe              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Validator (schema)                        │
//! │  - Null stripping                                           │
//! │  - JSON schema check, invalid activities dropped            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `webhook`: Webhook models and normalization
//! - `activity`: Activity models and mapping
//! - `probe`: Media type probing of URLs
//! - `schema`: Null stripping and JSON schema validation
//! - `parser`: Pipeline facade
//! - `config`: Configuration management
//! - `metrics`: Prometheus instruments
//! - `error`: Error types

pub mod activity;
pub mod config;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod probe;
pub mod schema;
pub mod webhook;

pub use parser::Parser;
