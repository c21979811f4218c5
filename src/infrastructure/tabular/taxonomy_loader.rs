//! Taxonomy loader
//!
//! Reads the taxonomy file into a TaxonomyIndex. Required columns:
//! Categoría, Subcategoría, Detalle, Descripción and, when segmentation is
//! on, TIPO_NPS. Rows with an empty category are skipped.

use super::{read_table, Table};
use crate::domain::error::Result;
use crate::domain::taxonomy::{AudienceSegment, TaxonomyEntry, TaxonomyIndex};
use std::path::Path;
use tracing::info;

const REQUIRED: [&str; 4] = ["Categoría", "Subcategoría", "Detalle", "Descripción"];
const SEGMENT_COLUMN: &str = "TIPO_NPS";

pub fn load_taxonomy(path: &Path, segmentation: bool) -> Result<TaxonomyIndex> {
    let table = read_table(path)?;
    let index = from_table(&table, segmentation)?;
    info!(
        entries = index.len(),
        path = %path.display(),
        "Taxonomy loaded"
    );
    Ok(index)
}

pub fn from_table(table: &Table, segmentation: bool) -> Result<TaxonomyIndex> {
    let positions = table.required_columns(&REQUIRED)?;
    let [cat, subcat, detail, desc] = [positions[0], positions[1], positions[2], positions[3]];

    // Without segmentation the TIPO_NPS column is optional; every row then
    // lands in the Detractor/Passive bucket, which validation ignores anyway
    // because it scans the whole taxonomy.
    let segment_col = if segmentation {
        Some(table.required_columns(&[SEGMENT_COLUMN])?[0])
    } else {
        table.headers.iter().position(|h| h == SEGMENT_COLUMN)
    };

    let mut entries = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let category = table.cell(row, cat);
        if category.trim().is_empty() {
            continue;
        }
        let segment = match segment_col {
            Some(col) => AudienceSegment::from_tipo_nps(&table.cell(row, col)),
            None => AudienceSegment::DetractorOrPassive,
        };
        entries.push(TaxonomyEntry::new(
            category,
            table.cell(row, subcat),
            table.cell(row, detail),
            table.cell(row, desc),
            segment,
        ));
    }

    Ok(TaxonomyIndex::build(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::tabular::parse_csv;

    const CSV: &str = "\
Categoría,Subcategoría,Detalle,Descripción,TIPO_NPS
Velocidad,Navegación,-,Rapidez al navegar,Promotor
Variedad de productos que faltan,Límite Transaccional,Límite Diario,Tope diario,Detractor
";

    #[test]
    fn test_load_segmented_taxonomy() {
        let table = parse_csv(CSV).unwrap();
        let index = from_table(&table, true).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries_for(AudienceSegment::Promoter).len(), 1);
        assert_eq!(
            index.entries_for(AudienceSegment::DetractorOrPassive).len(),
            1
        );
        // Sentinel normalized during construction.
        assert_eq!(index.entries()[0].detail, "N/A");
    }

    #[test]
    fn test_missing_tipo_nps_fatal_when_segmented() {
        let table = parse_csv("Categoría,Subcategoría,Detalle,Descripción\na,b,-,d\n").unwrap();
        let err = from_table(&table, true).unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));
    }

    #[test]
    fn test_tipo_nps_optional_when_unsegmented() {
        let table = parse_csv("Categoría,Subcategoría,Detalle,Descripción\na,b,-,d\n").unwrap();
        let index = from_table(&table, false).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_core_column_fatal() {
        let table = parse_csv("Categoría,Subcategoría,Descripción,TIPO_NPS\na,b,d,Promotor\n")
            .unwrap();
        let err = from_table(&table, true).unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));
        assert!(err.to_string().contains("Detalle"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let csv = format!("{} ,,,,\n", CSV);
        let table = parse_csv(&csv).unwrap();
        let index = from_table(&table, true).unwrap();
        assert_eq!(index.len(), 2);
    }
}
