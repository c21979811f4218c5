//! Comments loader
//!
//! Reads the comments file. Required columns: TIPO_NPS, comentario.
//! Every row becomes a comment, blanks included; the batch never drops
//! or reorders rows.

use super::{read_table, Table};
use crate::domain::classification::Comment;
use crate::domain::error::Result;
use crate::domain::taxonomy::AudienceSegment;
use std::path::Path;
use tracing::info;

const REQUIRED: [&str; 2] = ["TIPO_NPS", "comentario"];

/// A comment row plus the raw TIPO_NPS value it arrived with, preserved
/// verbatim for the output file.
#[derive(Debug, Clone)]
pub struct CommentRow {
    pub tipo_nps: String,
    pub comment: Comment,
}

pub fn load_comments(path: &Path) -> Result<Vec<CommentRow>> {
    let table = read_table(path)?;
    let rows = from_table(&table)?;
    info!(comments = rows.len(), path = %path.display(), "Comments loaded");
    Ok(rows)
}

pub fn from_table(table: &Table) -> Result<Vec<CommentRow>> {
    let positions = table.required_columns(&REQUIRED)?;
    let (tipo_col, text_col) = (positions[0], positions[1]);

    Ok(table
        .rows
        .iter()
        .map(|row| {
            let tipo_nps = table.cell(row, tipo_col);
            let segment = AudienceSegment::from_tipo_nps(&tipo_nps);
            CommentRow {
                comment: Comment::new(table.cell(row, text_col), segment),
                tipo_nps,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::tabular::parse_csv;

    #[test]
    fn test_load_comments() {
        let table = parse_csv(
            "TIPO_NPS,comentario\nPromotor,La velocidad es excelente\nDetractor,La app es lenta\n",
        )
        .unwrap();
        let rows = from_table(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].comment.segment, AudienceSegment::Promoter);
        assert_eq!(rows[0].tipo_nps, "Promotor");
        assert_eq!(rows[1].comment.segment, AudienceSegment::DetractorOrPassive);
        assert_eq!(rows[1].comment.text, "La app es lenta");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = parse_csv("comentario\nhola\n").unwrap();
        let err = from_table(&table).unwrap_err();
        assert!(matches!(err, AppError::SchemaError(_)));
    }

    #[test]
    fn test_duplicate_comments_kept() {
        let table = parse_csv("TIPO_NPS,comentario\nPromotor,igual\nPromotor,igual\n").unwrap();
        assert_eq!(from_table(&table).unwrap().len(), 2);
    }
}
