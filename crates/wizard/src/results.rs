//! Grouping of scored procedures for display.

use api_shared::{Appropriateness, ProcedureItem};

/// Maximum entries shown per bucket.
pub const BUCKET_LIMIT: usize = 4;

/// Procedures of one scenario split into display buckets, each capped at [`BUCKET_LIMIT`].
///
/// `unknown` procedures are shown with the rarely/not appropriate ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBuckets {
    pub usually: Vec<ProcedureItem>,
    pub maybe: Vec<ProcedureItem>,
    pub rarely: Vec<ProcedureItem>,
}

impl ResultBuckets {
    pub fn from_procedures(procedures: Vec<ProcedureItem>) -> Self {
        let mut buckets = Self::default();

        for procedure in procedures {
            let bucket = match procedure.appropriate {
                Appropriateness::Usually => &mut buckets.usually,
                Appropriateness::Maybe => &mut buckets.maybe,
                Appropriateness::Rarely | Appropriateness::Unknown => &mut buckets.rarely,
            };
            if bucket.len() < BUCKET_LIMIT {
                bucket.push(procedure);
            }
        }

        buckets
    }

    /// Procedures to display: usually then maybe, followed by rarely when revealed.
    pub fn visible(&self, show_not_appropriate: bool) -> Vec<&ProcedureItem> {
        let mut shown: Vec<&ProcedureItem> = self.usually.iter().chain(&self.maybe).collect();
        if show_not_appropriate {
            shown.extend(&self.rarely);
        }
        shown
    }

    pub fn is_empty(&self) -> bool {
        self.usually.is_empty() && self.maybe.is_empty() && self.rarely.is_empty()
    }
}
