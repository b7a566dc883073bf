//! # Referral Core
//!
//! Core query logic for the imaging referral guide.
//!
//! This crate contains the data operations behind `GET /api/conditions`:
//! - Normalisation of dual-spelled clinical documents into [`ClinicalRecord`]s
//! - Body-area, age-group and panel filtering
//! - Panel, condition and scenario deduplication
//! - Radiation scoring and appropriateness classification of procedures
//! - Read-only record stores (MongoDB and in-memory)
//!
//! **No API concerns**: HTTP servers, routing and response envelopes belong in `api-rest` and
//! `api-shared`.

pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod query;
pub mod record;
pub mod scoring;
pub mod store;

pub use api_shared::{AgeGroup, Appropriateness, QueryKind};
pub use conditions::{ConditionsService, QueryOutput};
pub use config::CoreConfig;
pub use error::{ConfigError, QueryError, QueryResult, StoreError, StoreResult};
pub use query::ConditionsQuery;
pub use record::{ClinicalRecord, Procedure};
pub use store::{open_store, MemoryRecordStore, MongoRecordStore, RecordStore};
