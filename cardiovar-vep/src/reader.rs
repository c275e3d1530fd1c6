use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use cardiovar_core::consts::{COMMENT_PREFIX, INFO_COLUMN, MIN_VCF_COLUMNS};
use cardiovar_core::models::{AnnotationRecord, AnnotationSchema, VariantKey};
use cardiovar_core::utils::{RecordStream, info_value};

use crate::canonical::select_canonical;
use crate::decode::decode_annotations;
use crate::error::Result;
use crate::schema::{AnnotationLayout, discover_schema};

///
/// A variant reduced to its representative transcript annotation.
///
#[derive(Debug, Clone)]
pub struct AnnotatedVariant<'s> {
    pub key: VariantKey,
    pub id: String,
    pub annotation: AnnotationRecord<'s>,
}

///
/// Counts of everything skipped while reading an annotated variant file.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseReport {
    /// No header declared the annotation field list.
    pub schema_missing: bool,
    pub data_lines: usize,
    /// Data lines with too few columns or an unparsable position.
    pub malformed_lines: usize,
    /// Data lines whose INFO column has no annotation entry.
    pub missing_annotation: usize,
    /// Annotation sub-blocks whose width did not match the schema.
    pub mismatched_blocks: usize,
    /// Variants dropped because every sub-block was discarded.
    pub dropped_variants: usize,
    pub emitted_variants: usize,
}

impl ParseReport {
    pub fn skipped_units(&self) -> usize {
        self.malformed_lines + self.missing_annotation + self.mismatched_blocks + self.dropped_variants
    }
}

impl Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} data lines, {} variants kept; skipped: {} malformed lines, {} without annotation, {} mismatched sub-blocks, {} variants with no usable annotation",
            self.data_lines,
            self.emitted_variants,
            self.malformed_lines,
            self.missing_annotation,
            self.mismatched_blocks,
            self.dropped_variants
        )?;
        if self.schema_missing {
            write!(f, " (annotation schema missing from header)")?;
        }
        Ok(())
    }
}

///
/// An annotated variant file with its header-declared schema.
///
/// Opening reads the header once to capture the schema; [`AnnotatedVcf::variants`]
/// reopens the file and streams the data lines against it.
///
#[derive(Debug, Clone)]
pub struct AnnotatedVcf {
    path: PathBuf,
    layout: AnnotationLayout,
    schema: AnnotationSchema,
    schema_missing: bool,
}

impl AnnotatedVcf {
    pub fn open(path: &Path) -> Result<Self> {
        AnnotatedVcf::open_with_layout(path, AnnotationLayout::default())
    }

    pub fn open_with_layout(path: &Path, layout: AnnotationLayout) -> Result<Self> {
        let schema = discover_schema(RecordStream::from_path(path)?, &layout)?;
        let schema_missing = schema.is_none();
        if schema_missing {
            warn!(
                "No {} annotation schema declared in {:?}; every annotation will be discarded",
                layout.info_key, path
            );
        }

        Ok(AnnotatedVcf {
            path: path.to_path_buf(),
            layout,
            schema: schema.unwrap_or_default(),
            schema_missing,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &AnnotationSchema {
        &self.schema
    }

    pub fn layout(&self) -> &AnnotationLayout {
        &self.layout
    }

    pub fn schema_missing(&self) -> bool {
        self.schema_missing
    }

    pub fn variants(&self) -> Result<AnnotatedVariantReader<'_>> {
        Ok(AnnotatedVariantReader {
            lines: RecordStream::from_path(&self.path)?,
            schema: &self.schema,
            info_key: &self.layout.info_key,
            report: ParseReport {
                schema_missing: self.schema_missing,
                ..ParseReport::default()
            },
        })
    }
}

///
/// Streams [`AnnotatedVariant`]s from the data lines of a file.
///
/// Malformed lines, mismatched sub-blocks and variants without any usable
/// annotation are skipped and counted in [`AnnotatedVariantReader::report`].
///
pub struct AnnotatedVariantReader<'s> {
    lines: RecordStream,
    schema: &'s AnnotationSchema,
    info_key: &'s str,
    report: ParseReport,
}

impl<'s> AnnotatedVariantReader<'s> {
    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    fn parse_line(&mut self, line: &str) -> Option<AnnotatedVariant<'s>> {
        let columns: Vec<&str> = line.splitn(MIN_VCF_COLUMNS + 1, '\t').collect();
        if columns.len() < MIN_VCF_COLUMNS {
            self.report.malformed_lines += 1;
            return None;
        }

        let key = match VariantKey::from_columns(&columns) {
            Ok(key) => key,
            Err(e) => {
                debug!("Skipping line: {}", e);
                self.report.malformed_lines += 1;
                return None;
            }
        };

        let payload = match info_value(columns[INFO_COLUMN], self.info_key) {
            Some(payload) => payload,
            None => {
                self.report.missing_annotation += 1;
                return None;
            }
        };

        let decoded = decode_annotations(payload, self.schema);
        self.report.mismatched_blocks += decoded.discarded;

        match select_canonical(decoded.records) {
            Some(annotation) => {
                self.report.emitted_variants += 1;
                Some(AnnotatedVariant {
                    key,
                    id: columns[2].to_string(),
                    annotation,
                })
            }
            None => {
                self.report.dropped_variants += 1;
                None
            }
        }
    }
}

impl<'s> Iterator for AnnotatedVariantReader<'s> {
    type Item = Result<AnnotatedVariant<'s>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.starts_with(COMMENT_PREFIX) || line.is_empty() {
                continue;
            }
            self.report.data_lines += 1;
            if let Some(variant) = self.parse_line(&line) {
                return Some(Ok(variant));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rstest::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n\
        ##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Consequence annotations from Ensembl VEP. Format: Allele|SYMBOL|gnomADg_AF|CANONICAL\">\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    fn write_vcf(dir: &Path, body: &str, with_schema: bool) -> PathBuf {
        let path = dir.join("annotated.vcf");
        let mut file = std::fs::File::create(&path).unwrap();
        if with_schema {
            file.write_all(HEADER.as_bytes()).unwrap();
        } else {
            file.write_all(b"##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n")
                .unwrap();
        }
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[rstest]
    fn test_reader_selects_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let body = "chr14\t23885000\trs1\tG\tA\t.\tPASS\tAC=1;CSQ=A|MYH7|0.001|,A|MYH7|0.002|YES\n\
            14\t23885001\t.\tG\tT\t.\tPASS\tAC=1\n\
            14\t23885002\t.\tG\n\
            14\tnotanumber\t.\tG\tT\t.\tPASS\tCSQ=T|MYH7|.|YES\n\
            14\t23885003\t.\tG\tC\t.\tPASS\tCSQ=C|MYH7,C|MYH7|.\n";
        let path = write_vcf(dir.path(), body, true);

        let vcf = AnnotatedVcf::open(&path).unwrap();
        let mut reader = vcf.variants().unwrap();
        let variants: Vec<AnnotatedVariant> = reader.by_ref().map(|v| v.unwrap()).collect();

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].key, VariantKey::new("14", 23885000, "G", "A"));
        assert_eq!(variants[0].id, "rs1");
        assert_eq!(variants[0].annotation.get("gnomADg_AF"), Some("0.002"));

        let report = reader.report();
        assert_eq!(report.data_lines, 5);
        assert_eq!(report.malformed_lines, 2);
        assert_eq!(report.missing_annotation, 1);
        assert_eq!(report.mismatched_blocks, 2);
        assert_eq!(report.dropped_variants, 1);
        assert_eq!(report.emitted_variants, 1);
        assert_eq!(report.schema_missing, false);
    }

    #[rstest]
    fn test_reader_without_schema_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let body = "1\t100\t.\tA\tT\t.\tPASS\tCSQ=T|GENE|0.1|YES\n\
            1\t200\t.\tA\tG\t.\tPASS\tCSQ=G|GENE|0.1|YES,G|GENE2|0.1|\n";
        let path = write_vcf(dir.path(), body, false);

        let vcf = AnnotatedVcf::open(&path).unwrap();
        assert_eq!(vcf.schema_missing(), true);

        let mut reader = vcf.variants().unwrap();
        assert_eq!(reader.by_ref().count(), 0);
        assert_eq!(reader.report().schema_missing, true);
        assert_eq!(reader.report().mismatched_blocks, 3);
        assert_eq!(reader.report().dropped_variants, 2);
    }
}
