//! Quick look at whether an annotated file actually carries the dbNSFP-derived
//! fields the feature builder needs.

use cardiovar_core::consts::{COMMENT_PREFIX, INFO_COLUMN, MIN_VCF_COLUMNS};
use cardiovar_core::models::VariantKey;
use cardiovar_core::utils::{RecordStream, info_value, is_missing};

use crate::decode::decode_annotations;
use crate::error::Result;
use crate::reader::AnnotatedVcf;

pub const FIELDS_OF_INTEREST: [&str; 9] = [
    "SIFT_pred",
    "Polyphen2_HVAR_pred",
    "Polyphen2_HDIV_pred",
    "GERP++_RS",
    "phyloP100way_vertebrate",
    "gnomADg_AF",
    "SYMBOL",
    "IMPACT",
    "Consequence",
];

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionExample {
    pub key: VariantKey,
    /// `(field, raw value)` for each field of interest declared in the schema.
    pub values: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    pub present_fields: Vec<String>,
    pub examples: Vec<InspectionExample>,
}

///
/// Report which `fields` the schema declares, and collect up to `max_examples`
/// variants that have a sub-block with at least one populated field of interest.
///
/// Only the first such sub-block of each variant is reported.
///
pub fn inspect_annotations(
    vcf: &AnnotatedVcf,
    fields: &[&str],
    max_examples: usize,
) -> Result<InspectionReport> {
    let schema = vcf.schema();
    let declared: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|f| schema.contains(f))
        .collect();

    let mut report = InspectionReport {
        present_fields: declared.iter().map(|f| f.to_string()).collect(),
        examples: Vec::new(),
    };
    if max_examples == 0 || declared.is_empty() {
        return Ok(report);
    }

    for line in RecordStream::from_path(vcf.path())? {
        let line = line?;
        if line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let columns: Vec<&str> = line.splitn(MIN_VCF_COLUMNS + 1, '\t').collect();
        if columns.len() < MIN_VCF_COLUMNS {
            continue;
        }
        let Some(payload) = info_value(columns[INFO_COLUMN], &vcf.layout().info_key) else {
            continue;
        };
        let Ok(key) = VariantKey::from_columns(&columns) else {
            continue;
        };

        let decoded = decode_annotations(payload, schema);
        let populated = decoded.records.iter().find(|record| {
            declared
                .iter()
                .any(|f| record.raw(f).is_some_and(|v| !is_missing(v)))
        });

        if let Some(record) = populated {
            report.examples.push(InspectionExample {
                key,
                values: declared
                    .iter()
                    .map(|f| (f.to_string(), record.raw(f).unwrap_or_default().to_string()))
                    .collect(),
            });
            if report.examples.len() >= max_examples {
                break;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_inspect_finds_populated_examples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vep.vcf");
        std::fs::write(
            &path,
            "##INFO=<ID=CSQ,Number=.,Type=String,Description=\"Format: Allele|SYMBOL|SIFT_pred|Extra\">\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
             1\t10\t.\tA\tT\t.\t.\tCSQ=T|.|.|x\n\
             1\t20\t.\tA\tG\t.\t.\tCSQ=G|.|.|x,G|TNNT2|D|y\n\
             1\t30\t.\tA\tC\t.\t.\tCSQ=C|TNNT2|T|z\n",
        )
        .unwrap();

        let vcf = AnnotatedVcf::open(&path).unwrap();
        let report = inspect_annotations(&vcf, &FIELDS_OF_INTEREST, 1).unwrap();

        assert_eq!(report.present_fields, vec!["SIFT_pred", "SYMBOL"]);
        assert_eq!(report.examples.len(), 1);
        assert_eq!(report.examples[0].key.pos, 20);
        assert_eq!(
            report.examples[0].values,
            vec![
                ("SIFT_pred".to_string(), "D".to_string()),
                ("SYMBOL".to_string(), "TNNT2".to_string())
            ]
        );
    }
}
