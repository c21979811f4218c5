// ============================================================
// TAXONOMY TYPES
// ============================================================
// The closed category -> subcategory -> detail hierarchy that
// classifications are validated against.

use serde::{Deserialize, Serialize};

/// Sentinel used in the raw taxonomy when a row has no detail level.
pub const NO_DETAIL_SENTINEL: &str = "-";

/// Normalized form of the sentinel, as rendered in prompts and expected
/// back from the oracle.
pub const NO_DETAIL: &str = "N/A";

/// Author sentiment cohort of a comment. Restricts which taxonomy branches
/// are valid for that comment when segmentation is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudienceSegment {
    Promoter,
    DetractorOrPassive,
}

impl AudienceSegment {
    /// Raw `TIPO_NPS` values map to exactly two cohorts: the literal
    /// "Promotor" and everything else.
    pub fn from_tipo_nps(raw: &str) -> Self {
        if raw == "Promotor" {
            AudienceSegment::Promoter
        } else {
            AudienceSegment::DetractorOrPassive
        }
    }

    /// The `TIPO_NPS` wording used when talking to the oracle.
    pub fn as_tipo_nps(&self) -> &'static str {
        match self {
            AudienceSegment::Promoter => "Promotor",
            AudienceSegment::DetractorOrPassive => "Detractor+Pasivo",
        }
    }
}

/// One flat taxonomy row. `detail` is already normalized: the raw "-"
/// sentinel becomes "N/A" at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub category: String,
    pub subcategory: String,
    pub detail: String,
    pub description: String,
    pub segment: AudienceSegment,
}

impl TaxonomyEntry {
    pub fn new(
        category: String,
        subcategory: String,
        detail: String,
        description: String,
        segment: AudienceSegment,
    ) -> Self {
        let detail = if detail.trim() == NO_DETAIL_SENTINEL {
            NO_DETAIL.to_string()
        } else {
            detail
        };
        Self {
            category,
            subcategory,
            detail,
            description,
            segment,
        }
    }

    pub fn has_detail(&self) -> bool {
        self.detail != NO_DETAIL
    }
}

/// A detail leaf with its description.
#[derive(Debug, Clone)]
pub struct DetailNode {
    pub detail: String,
    pub description: String,
}

/// A subcategory with its details, in insertion order.
#[derive(Debug, Clone)]
pub struct SubcategoryNode {
    pub name: String,
    pub details: Vec<DetailNode>,
}

/// A category with its subcategories, in insertion order.
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub name: String,
    pub subcategories: Vec<SubcategoryNode>,
}

/// Read-only nested view over the flat taxonomy, grouped by audience
/// segment and then category -> subcategory -> detail. Insertion order is
/// preserved so prompt rendering stays stable across runs.
#[derive(Debug, Clone)]
pub struct TaxonomyIndex {
    entries: Vec<TaxonomyEntry>,
    promoter: Vec<CategoryNode>,
    detractor: Vec<CategoryNode>,
}

impl TaxonomyIndex {
    pub fn build(entries: Vec<TaxonomyEntry>) -> Self {
        let mut promoter: Vec<CategoryNode> = Vec::new();
        let mut detractor: Vec<CategoryNode> = Vec::new();

        for entry in &entries {
            let tree = match entry.segment {
                AudienceSegment::Promoter => &mut promoter,
                AudienceSegment::DetractorOrPassive => &mut detractor,
            };
            Self::insert(tree, entry);
        }

        Self {
            entries,
            promoter,
            detractor,
        }
    }

    fn insert(tree: &mut Vec<CategoryNode>, entry: &TaxonomyEntry) {
        let category = match tree.iter_mut().find(|c| c.name == entry.category) {
            Some(category) => category,
            None => {
                tree.push(CategoryNode {
                    name: entry.category.clone(),
                    subcategories: Vec::new(),
                });
                tree.last_mut().unwrap()
            }
        };

        let subcategory = match category
            .subcategories
            .iter_mut()
            .find(|s| s.name == entry.subcategory)
        {
            Some(subcategory) => subcategory,
            None => {
                category.subcategories.push(SubcategoryNode {
                    name: entry.subcategory.clone(),
                    details: Vec::new(),
                });
                category.subcategories.last_mut().unwrap()
            }
        };

        subcategory.details.push(DetailNode {
            detail: entry.detail.clone(),
            description: entry.description.clone(),
        });
    }

    /// All entries, regardless of segment.
    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// Entries permitted for one audience segment.
    pub fn entries_for(&self, segment: AudienceSegment) -> Vec<&TaxonomyEntry> {
        self.entries
            .iter()
            .filter(|e| e.segment == segment)
            .collect()
    }

    /// Nested grouping for one segment, in insertion order.
    pub fn categories_for(&self, segment: AudienceSegment) -> &[CategoryNode] {
        match segment {
            AudienceSegment::Promoter => &self.promoter,
            AudienceSegment::DetractorOrPassive => &self.detractor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
