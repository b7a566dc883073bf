//! Record filters: body area, age group and panel.

use crate::constants::ADULT_AGE_THRESHOLD;
use api_shared::AgeGroup;
use regex::Regex;
use std::sync::LazyLock;

static AGE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").expect("valid age range regex"));
static SINGLE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid number regex"));

/// Inclusive age range parsed from a stored age string such as `"18 - 150"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub start: u32,
    pub end: u32,
}

impl AgeRange {
    /// Parse the first `start - end` pair in `raw`, or failing that the first lone number, which
    /// is then used as both bounds.
    ///
    /// Returns `None` when the string carries no number or a number too large for `u32`.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(caps) = AGE_RANGE.captures(raw) {
            let start = caps[1].parse().ok()?;
            let end = caps[2].parse().ok()?;
            return Some(Self { start, end });
        }

        let single: u32 = SINGLE_NUMBER.find(raw)?.as_str().parse().ok()?;
        Some(Self {
            start: single,
            end: single,
        })
    }

    /// Adults qualify when the range reaches 18 or above; children when it starts below 18.
    ///
    /// A range such as `10 - 60` therefore qualifies for both groups.
    pub fn admits(&self, group: AgeGroup) -> bool {
        match group {
            AgeGroup::Adult => self.end >= ADULT_AGE_THRESHOLD,
            AgeGroup::Child => self.start < ADULT_AGE_THRESHOLD,
        }
    }
}

/// Whether a stored age string admits the requested age group.
///
/// With no age group every record passes. With one, a missing or unparseable age excludes the
/// record.
pub fn age_admits(stored_age: Option<&str>, group: Option<AgeGroup>) -> bool {
    let Some(group) = group else {
        return true;
    };

    stored_age
        .and_then(AgeRange::parse)
        .is_some_and(|range| range.admits(group))
}

/// Anchored, case-insensitive comparison of a stored body area or panel.
///
/// Surrounding whitespace on either side is ignored; anything else must match exactly, so
/// `abdomen` never matches `abdomen-pelvis`.
pub fn text_matches(stored: Option<&str>, requested: &str) -> bool {
    stored.is_some_and(|stored| stored.trim().to_lowercase() == requested.trim().to_lowercase())
}

/// MongoDB regular expression equivalent of [`text_matches`], used with `$options: "i"`.
pub fn body_area_pattern(requested: &str) -> String {
    format!(r"^\s*{}\s*$", regex::escape(requested.trim()))
}
