//! # API Shared
//!
//! Shared wire definitions for the referral APIs.
//!
//! Contains:
//! - Query parameters accepted by `GET /api/conditions` (`ConditionsParams`)
//! - The `{success, data | error}` response envelope
//! - Payload items for each query type (conditions, scenarios, procedures)
//! - Shared services like `HealthService`
//!
//! Used by `referral-core` to shape results, by `api-rest` to serve them, and by
//! `referral-wizard` to decode them on the client side.

pub mod health;
pub mod wire;

pub use health::{HealthRes, HealthService};
pub use wire::*;
