// ============================================================
// CLASSIFICATION TYPES
// ============================================================
// Input comments and the fixed three-field classification record
// produced per comment.

use serde::{Deserialize, Serialize};

use super::taxonomy::AudienceSegment;

/// One comment to classify. Immutable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub segment: AudienceSegment,
}

impl Comment {
    pub fn new(text: impl Into<String>, segment: AudienceSegment) -> Self {
        Self {
            text: text.into(),
            segment,
        }
    }
}

/// The oracle's answer, constrained to exactly three string fields. Extra or
/// missing keys fail deserialization, which the classifier treats as a
/// retriable parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Classification {
    pub categoria: String,
    pub subcategoria: String,
    pub detalle: String,
}

impl Classification {
    pub fn new(
        categoria: impl Into<String>,
        subcategoria: impl Into<String>,
        detalle: impl Into<String>,
    ) -> Self {
        Self {
            categoria: categoria.into(),
            subcategoria: subcategoria.into(),
            detalle: detalle.into(),
        }
    }

    /// The explicit fallback value. Never a valid taxonomy entry.
    pub fn empty() -> Self {
        Self {
            categoria: String::new(),
            subcategoria: String::new(),
            detalle: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categoria.is_empty() && self.subcategoria.is_empty() && self.detalle.is_empty()
    }
}

/// One output row: the comment paired with its (possibly empty)
/// classification. Produced one-to-one with input comments, same order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub comment: Comment,
    pub classification: Classification,
}
