use log::{debug, warn};

use cardiovar_core::models::AnnotationSchema;
use cardiovar_core::utils::RecordStream;

use crate::consts::{COLUMN_HEADER_PREFIX, CSQ_HEADER_MARKER, CSQ_INFO_KEY};
use crate::error::Result;

const FORMAT_CLAUSE: &str = "Format: ";

///
/// Where the annotation lives in a variant file: the header line prefix that
/// declares its subfields and the INFO key that carries its payload.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationLayout {
    pub header_marker: String,
    pub info_key: String,
}

impl Default for AnnotationLayout {
    fn default() -> Self {
        AnnotationLayout {
            header_marker: CSQ_HEADER_MARKER.to_string(),
            info_key: CSQ_INFO_KEY.to_string(),
        }
    }
}

///
/// Extract the field list from the `Format: a|b|c"` clause of a header line.
///
/// The list runs from the clause to the last literal quote on the line. Returns
/// `None` if the line has no such clause.
///
pub fn parse_format_clause(line: &str) -> Option<AnnotationSchema> {
    let start = line.find(FORMAT_CLAUSE)? + FORMAT_CLAUSE.len();
    let rest = &line[start..];
    let end = rest.rfind('"')?;
    let list = &rest[..end];
    if list.is_empty() {
        return None;
    }
    Some(AnnotationSchema::from_pipe_list(list))
}

///
/// Scan the header section of a variant file for the annotation schema.
///
/// Stops at the `#CHROM` column header (or the first data line). Returns `None` when
/// no header line declared the field list; callers treat that as `SchemaMissing`.
///
pub fn discover_schema(
    lines: RecordStream,
    layout: &AnnotationLayout,
) -> Result<Option<AnnotationSchema>> {
    for line in lines {
        let line = line?;
        if line.starts_with(&layout.header_marker) {
            if let Some(schema) = parse_format_clause(&line) {
                debug!(
                    "Found {} annotation schema with {} fields",
                    layout.info_key,
                    schema.len()
                );
                return Ok(Some(schema));
            }
            warn!("Annotation header line has no Format clause: {}", line);
        }
        if line.starts_with(COLUMN_HEADER_PREFIX) || !line.starts_with('#') {
            break;
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn stream(text: &str) -> RecordStream {
        RecordStream::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[rstest]
    fn test_parse_format_clause() {
        let line = r#"##INFO=<ID=CSQ,Number=.,Type=String,Description="Consequence annotations from Ensembl VEP. Format: Allele|Consequence|CANONICAL">"#;
        let schema = parse_format_clause(line).unwrap();
        assert_eq!(schema.fields(), &["Allele", "Consequence", "CANONICAL"]);
    }

    #[rstest]
    fn test_parse_format_clause_without_clause() {
        let line = r#"##INFO=<ID=CSQ,Number=.,Type=String,Description="no fields">"#;
        assert_eq!(parse_format_clause(line), None);
    }

    #[rstest]
    fn test_discover_schema() {
        let text = "##fileformat=VCFv4.2\n\
            ##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Format: A|B|CANONICAL\">\n\
            #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
            1\t100\t.\tA\tT\t.\t.\tCSQ=x|y|YES\n";
        let schema = discover_schema(stream(text), &AnnotationLayout::default())
            .unwrap()
            .unwrap();
        assert_eq!(schema.fields(), &["A", "B", "CANONICAL"]);
    }

    #[rstest]
    fn test_discover_schema_missing() {
        let text = "##fileformat=VCFv4.2\n\
            #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
            ##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Format: A|B\">\n";
        let schema = discover_schema(stream(text), &AnnotationLayout::default()).unwrap();
        assert_eq!(schema, None);
    }

    #[rstest]
    fn test_discover_schema_custom_layout() {
        let layout = AnnotationLayout {
            header_marker: "##INFO=<ID=ANN".to_string(),
            info_key: "ANN".to_string(),
        };
        let text = "##INFO=<ID=CSQ,Description=\"Format: A\">\n\
            ##INFO=<ID=ANN,Description=\"Format: X|Y\">\n";
        let schema = discover_schema(stream(text), &layout).unwrap().unwrap();
        assert_eq!(schema.fields(), &["X", "Y"]);
    }
}
