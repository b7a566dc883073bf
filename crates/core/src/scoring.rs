//! Procedure scoring: radiation dose and appropriateness classification.

use api_shared::Appropriateness;
use regex::Regex;
use std::sync::LazyLock;

static DOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:-(\d+))?").expect("valid dose regex"));

/// Parse a radiation score from a descriptor such as `"1-10 mSv☢☢☢"`.
///
/// The first integer or integer range wins; for a range the upper bound is used. Missing or
/// unparseable input scores 0.
pub fn radiation_score(descriptor: Option<&str>) -> u32 {
    let Some(caps) = descriptor.and_then(|d| DOSE.captures(d)) else {
        return 0;
    };

    caps.get(2)
        .or_else(|| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Classify a free-text appropriateness category.
///
/// Precedence matters: "Usually Not Appropriate" must land in `rarely`, so the
/// "not appropriate" check runs before "usually appropriate".
pub fn classify_appropriateness(category: Option<&str>) -> Appropriateness {
    let lower = category.unwrap_or_default().to_lowercase();

    if lower.contains("not appropriate") {
        Appropriateness::Rarely
    } else if lower.contains("usually appropriate") {
        Appropriateness::Usually
    } else if lower.contains("may") {
        Appropriateness::Maybe
    } else if lower.contains("rarely") {
        Appropriateness::Rarely
    } else {
        Appropriateness::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radiation_score_takes_upper_bound() {
        assert_eq!(radiation_score(Some("10-30 mSv")), 30);
        assert_eq!(radiation_score(Some("1-10 mSv☢☢☢")), 10);
    }

    #[test]
    fn test_radiation_score_single_value() {
        assert_eq!(radiation_score(Some("0 mSvO")), 0);
        assert_eq!(radiation_score(Some("3 mSv")), 3);
    }

    #[test]
    fn test_radiation_score_unparseable_is_zero() {
        assert_eq!(radiation_score(Some("Varies")), 0);
        assert_eq!(radiation_score(Some("")), 0);
        assert_eq!(radiation_score(None), 0);
    }

    #[test]
    fn test_classify_usually() {
        assert_eq!(
            classify_appropriateness(Some("Usually Appropriate")),
            Appropriateness::Usually
        );
    }

    #[test]
    fn test_classify_maybe() {
        assert_eq!(
            classify_appropriateness(Some("May Be Appropriate")),
            Appropriateness::Maybe
        );
        assert_eq!(
            classify_appropriateness(Some("May Be Appropriate (Disagreement)")),
            Appropriateness::Maybe
        );
    }

    #[test]
    fn test_classify_rarely() {
        assert_eq!(
            classify_appropriateness(Some("Usually Not Appropriate")),
            Appropriateness::Rarely
        );
        assert_eq!(
            classify_appropriateness(Some("Not Appropriate")),
            Appropriateness::Rarely
        );
        assert_eq!(
            classify_appropriateness(Some("Rarely Appropriate")),
            Appropriateness::Rarely
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_appropriateness(Some("Pending")), Appropriateness::Unknown);
        assert_eq!(classify_appropriateness(None), Appropriateness::Unknown);
    }
}
