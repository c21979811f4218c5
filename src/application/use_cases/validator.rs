//! Classification validator
//!
//! Checks a candidate classification against the taxonomy entries permitted
//! for a comment. Exact, case-sensitive string matching; no fuzzy matches.

use crate::domain::classification::Classification;
use crate::domain::taxonomy::{AudienceSegment, TaxonomyEntry, TaxonomyIndex};

/// True iff some permitted entry matches the candidate on all three levels.
/// A stored detail of "N/A" (the normalized no-detail sentinel) matches a
/// candidate detail of exactly "N/A" and nothing else.
pub fn is_valid<'a, I>(candidate: &Classification, permitted: I) -> bool
where
    I: IntoIterator<Item = &'a TaxonomyEntry>,
{
    permitted.into_iter().any(|entry| {
        entry.category == candidate.categoria
            && entry.subcategory == candidate.subcategoria
            && entry.detail == candidate.detalle
    })
}

/// Validate against the taxonomy subset for one segment, or against the
/// whole taxonomy when segmentation is off.
pub fn validate_scoped(
    candidate: &Classification,
    taxonomy: &TaxonomyIndex,
    segment: AudienceSegment,
    segmentation: bool,
) -> bool {
    if segmentation {
        is_valid(candidate, taxonomy.entries_for(segment))
    } else {
        is_valid(candidate, taxonomy.entries())
    }
}
