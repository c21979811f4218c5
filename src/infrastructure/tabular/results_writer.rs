//! Results writer
//!
//! Emits the classified batch as CSV: UTF-8 with BOM so spreadsheet tools
//! pick up the accents, columns TIPO_NPS, comentario, TAB1, TAB2, TAB3,
//! one row per input comment in input order.

use crate::domain::classification::ClassificationResult;
use crate::domain::error::{AppError, Result};
use std::path::Path;
use tracing::info;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
const HEADERS: [&str; 5] = ["TIPO_NPS", "comentario", "TAB1", "TAB2", "TAB3"];

/// Render results to CSV bytes, BOM included.
pub fn to_csv_bytes(rows: &[(String, &ClassificationResult)]) -> Result<Vec<u8>> {
    let mut buffer = Vec::from(UTF8_BOM);
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer
            .write_record(HEADERS)
            .map_err(|e| AppError::IoError(format!("Failed to write CSV header: {}", e)))?;

        for (tipo_nps, result) in rows {
            writer
                .write_record([
                    tipo_nps.as_str(),
                    result.comment.text.as_str(),
                    result.classification.categoria.as_str(),
                    result.classification.subcategoria.as_str(),
                    result.classification.detalle.as_str(),
                ])
                .map_err(|e| AppError::IoError(format!("Failed to write CSV row: {}", e)))?;
        }
        writer
            .flush()
            .map_err(|e| AppError::IoError(format!("Failed to flush CSV: {}", e)))?;
    }
    Ok(buffer)
}

pub fn write_csv(path: &Path, rows: &[(String, &ClassificationResult)]) -> Result<()> {
    let bytes = to_csv_bytes(rows)?;
    std::fs::write(path, bytes)?;
    info!(rows = rows.len(), path = %path.display(), "Results written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::{Classification, Comment};
    use crate::domain::taxonomy::AudienceSegment;

    fn result(text: &str, classification: Classification) -> ClassificationResult {
        ClassificationResult {
            comment: Comment::new(text, AudienceSegment::Promoter),
            classification,
        }
    }

    #[test]
    fn test_output_starts_with_bom_and_header() {
        let r = result("rápido", Classification::new("Velocidad", "Navegación", "N/A"));
        let rows = vec![("Promotor".to_string(), &r)];
        let bytes = to_csv_bytes(&rows).unwrap();

        assert!(bytes.starts_with(b"\xef\xbb\xbf"));
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert!(text.starts_with("TIPO_NPS,comentario,TAB1,TAB2,TAB3"));
        assert!(text.contains("Promotor,rápido,Velocidad,Navegación,N/A"));
    }

    #[test]
    fn test_empty_classification_yields_empty_cells() {
        let r = result("???", Classification::empty());
        let rows = vec![("Detractor".to_string(), &r)];
        let bytes = to_csv_bytes(&rows).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert!(text.contains("Detractor,???,,,"));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let a = result("uno", Classification::empty());
        let b = result("dos", Classification::empty());
        let rows = vec![("Promotor".to_string(), &a), ("Promotor".to_string(), &b)];
        let bytes = to_csv_bytes(&rows).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        let uno = text.find("uno").unwrap();
        let dos = text.find("dos").unwrap();
        assert!(uno < dos);
    }
}
