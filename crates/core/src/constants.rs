//! Constants used throughout the referral core crate.
//!
//! Field-name aliases live here so the legacy (`"Body Area"`) and cleaned (`body_area`)
//! collection layouts are described in exactly one place.

/// Age, in years, from which a patient is treated as an adult.
pub const ADULT_AGE_THRESHOLD: u32 = 18;

/// Condition name used by the seeding scripts for unfinished rows.
pub const PLACEHOLDER_CONDITION: &str = "placeholder";

/// Default MongoDB database name when no explicit name is configured.
pub const DEFAULT_DATABASE: &str = "clinical_advice";

/// Default collection holding the clinical-appropriateness documents.
pub const DEFAULT_COLLECTION: &str = "completed_cleaned_clinical";

/// Document identifier key.
pub const ID_FIELD: &str = "_id";

// Record-level aliases. The first alias with a non-empty string value wins.
pub const PANEL_FIELDS: [&str; 2] = ["panel", "Panel"];
pub const CONDITION_FIELDS: [&str; 2] = ["condition", "Condition"];
pub const BODY_AREA_FIELDS: [&str; 2] = ["body_area", "Body Area"];
pub const AGE_FIELDS: [&str; 2] = ["age", "Age"];
pub const SCENARIO_ID_FIELDS: [&str; 2] = ["scenario_id", "Scenario ID"];
pub const SCENARIO_DESCRIPTION_FIELDS: [&str; 2] =
    ["scenario_description", "Scenario Description"];
pub const SEVERITY_FIELDS: [&str; 2] = ["severity", "Severity"];
pub const PROCEDURES_FIELDS: [&str; 2] = ["procedures", "Procedures"];

// Procedure-level aliases.
pub const PROCEDURE_NAME_FIELDS: [&str; 2] = ["procedure_name", "Procedure Name"];
pub const APPROPRIATENESS_FIELDS: [&str; 2] =
    ["appropriateness_category", "Appropriateness Category"];
pub const ADULT_RRL_FIELDS: [&str; 2] = ["adult_rrl", "Adult RRL"];
pub const PEDS_RRL_FIELDS: [&str; 2] = ["peds_rrl", "Peds RRL"];
