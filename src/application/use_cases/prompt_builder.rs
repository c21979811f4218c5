//! System Prompt Builder for comment classification
//!
//! Renders the taxonomy into the fixed instruction block handed to the LLM
//! as system message. Rendered once per run and reused for every comment.

use crate::domain::taxonomy::{AudienceSegment, CategoryNode, TaxonomyIndex};
use std::fmt::Write;

/// Builds the classification system prompt from a taxonomy index.
pub struct PromptBuilder {
    /// When enabled, the taxonomy is rendered as separate Promoter and
    /// Detractor/Passive blocks and the guidance tells the oracle to stay
    /// inside the comment's own segment. When disabled, one flat enumeration
    /// covers the whole taxonomy.
    segmentation: bool,
}

impl PromptBuilder {
    pub fn new(segmentation: bool) -> Self {
        Self { segmentation }
    }

    /// Render the full system prompt. Deterministic: identical taxonomy
    /// content always yields byte-identical text.
    pub fn build(&self, taxonomy: &TaxonomyIndex) -> String {
        let mut prompt = String::new();

        writeln!(
            prompt,
            "Eres un clasificador de comentarios de usuarios que asigna cada comentario a una única entrada de la taxonomía permitida."
        )
        .unwrap();
        writeln!(prompt).unwrap();

        if self.segmentation {
            writeln!(prompt, "CATEGORÍAS POR TIPO DE COMENTARIO:").unwrap();
            writeln!(prompt).unwrap();
            writeln!(prompt, "=== CATEGORÍAS PARA COMENTARIOS DE PROMOTORES ===").unwrap();
            self.add_taxonomy_block(
                &mut prompt,
                taxonomy.categories_for(AudienceSegment::Promoter),
            );
            writeln!(prompt).unwrap();
            writeln!(
                prompt,
                "=== CATEGORÍAS PARA COMENTARIOS DE DETRACTORES Y PASIVOS ==="
            )
            .unwrap();
            self.add_taxonomy_block(
                &mut prompt,
                taxonomy.categories_for(AudienceSegment::DetractorOrPassive),
            );
        } else {
            writeln!(prompt, "CATEGORÍAS PERMITIDAS:").unwrap();
            self.add_taxonomy_block(
                &mut prompt,
                taxonomy.categories_for(AudienceSegment::Promoter),
            );
            self.add_taxonomy_block(
                &mut prompt,
                taxonomy.categories_for(AudienceSegment::DetractorOrPassive),
            );
        }

        writeln!(prompt).unwrap();
        self.add_guidance(&mut prompt);
        writeln!(prompt).unwrap();
        self.add_examples(&mut prompt);
        writeln!(prompt).unwrap();
        writeln!(prompt, "Responde solo con el JSON:").unwrap();
        write!(
            prompt,
            r#"{{"categoria": "categoría", "subcategoria": "subcategoría", "detalle": "detalle"}}"#
        )
        .unwrap();

        prompt
    }

    /// Render one segment's categories: category header, bulleted
    /// subcategories, then either detail lines or the bare description when
    /// the row has no detail level.
    fn add_taxonomy_block(&self, prompt: &mut String, categories: &[CategoryNode]) {
        for category in categories {
            writeln!(prompt).unwrap();
            writeln!(prompt, "{}:", category.name).unwrap();
            for subcategory in &category.subcategories {
                writeln!(prompt, "• {}:", subcategory.name).unwrap();
                for detail in &subcategory.details {
                    if detail.detail == crate::domain::taxonomy::NO_DETAIL {
                        writeln!(prompt, "  {}", detail.description).unwrap();
                    } else {
                        writeln!(prompt, "  - {}: {}", detail.detail, detail.description).unwrap();
                    }
                }
            }
        }
    }

    fn add_guidance(&self, prompt: &mut String) {
        writeln!(prompt, "GUÍA DE INTERPRETACIÓN:").unwrap();
        if self.segmentation {
            writeln!(prompt, "1. CONSIDERA EL TIPO DE USUARIO:").unwrap();
            writeln!(
                prompt,
                "   - Promotor: Usuarios satisfechos que recomiendan el producto"
            )
            .unwrap();
            writeln!(
                prompt,
                "   - Detractor+Pasivo: Usuarios que tienen quejas o no están completamente satisfechos"
            )
            .unwrap();
            writeln!(prompt, "2. INTERPRETA EL CONTEXTO:").unwrap();
            writeln!(
                prompt,
                "   - Para Promotores: Identifica los aspectos específicos que elogian"
            )
            .unwrap();
            writeln!(
                prompt,
                "   - Para Detractores+Pasivos: Identifica los puntos de dolor o mejora"
            )
            .unwrap();
            writeln!(prompt, "3. REGLAS DE CLASIFICACIÓN:").unwrap();
            writeln!(
                prompt,
                "   - Usa solo las categorías permitidas según el TIPO_NPS del comentario"
            )
            .unwrap();
        } else {
            writeln!(prompt, "1. INTERPRETA EL CONTEXTO:").unwrap();
            writeln!(
                prompt,
                "   - Identifica el aspecto concreto que el comentario elogia o critica"
            )
            .unwrap();
            writeln!(prompt, "2. REGLAS DE CLASIFICACIÓN:").unwrap();
            writeln!(
                prompt,
                "   - Usa solo las categorías permitidas de la lista anterior"
            )
            .unwrap();
        }
        writeln!(
            prompt,
            "   - Clasifica tanto menciones positivas como negativas"
        )
        .unwrap();
        writeln!(
            prompt,
            "   - Prioriza aspectos específicos sobre comentarios generales"
        )
        .unwrap();
        writeln!(
            prompt,
            "   - Interpreta el contexto completo del comentario, incluidas las quejas indirectas y las menciones múltiples"
        )
        .unwrap();
    }

    fn add_examples(&self, prompt: &mut String) {
        writeln!(prompt, "EJEMPLOS DE CLASIFICACIÓN:").unwrap();
        if self.segmentation {
            writeln!(prompt, "PROMOTOR:").unwrap();
        }
        writeln!(
            prompt,
            r#""La velocidad es excelente" -> {{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A"}}"#
        )
        .unwrap();
        writeln!(
            prompt,
            r#""Me encanta que todos lo usen" -> {{"categoria": "Accesibilidad", "subcategoria": "Capilaridad", "detalle": "N/A"}}"#
        )
        .unwrap();
        if self.segmentation {
            writeln!(prompt).unwrap();
            writeln!(prompt, "DETRACTOR+PASIVO:").unwrap();
        }
        writeln!(
            prompt,
            r#""La app es muy lenta" -> {{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A"}}"#
        )
        .unwrap();
        writeln!(
            prompt,
            r#""Deberían ampliar los límites" -> {{"categoria": "Variedad de productos que faltan", "subcategoria": "Límite Transaccional", "detalle": "Límite Diario"}}"#
        )
        .unwrap();
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(true)
    }
}
