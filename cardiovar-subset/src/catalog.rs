use std::path::{Path, PathBuf};

use cardiovar_core::utils::normalize_chrom;

use crate::consts::{CHROM_PLACEHOLDER, DEFAULT_SHARD_TEMPLATES};
use crate::error::{Result, SubsetError};

///
/// Where the per-chromosome shards of a reference resource live.
///
/// Each template is a path relative to `dir` with `{chrom}` standing for the
/// normalized chromosome name. Templates are tried in order and the first existing
/// file wins. Nothing is opened here; the extractor opens one shard at a time.
///
#[derive(Debug, Clone)]
pub struct ReferenceShardCatalog {
    dir: PathBuf,
    templates: Vec<String>,
}

impl ReferenceShardCatalog {
    pub fn new(dir: &Path) -> Self {
        ReferenceShardCatalog {
            dir: dir.to_path_buf(),
            templates: DEFAULT_SHARD_TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn with_templates(dir: &Path, templates: Vec<String>) -> Self {
        ReferenceShardCatalog {
            dir: dir.to_path_buf(),
            templates,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn candidates(&self, chrom: &str) -> Vec<PathBuf> {
        let chrom = normalize_chrom(chrom);
        self.templates
            .iter()
            .map(|t| self.dir.join(t.replace(CHROM_PLACEHOLDER, &chrom)))
            .collect()
    }

    pub fn resolve(&self, chrom: &str) -> Result<PathBuf> {
        let searched = self.candidates(chrom);
        match searched.iter().find(|p| p.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(SubsetError::ShardNotFound {
                chrom: normalize_chrom(chrom),
                searched,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_candidates() {
        let catalog = ReferenceShardCatalog::new(Path::new("/data/dbnsfp"));
        assert_eq!(
            catalog.candidates("chrMT"),
            vec![
                PathBuf::from("/data/dbnsfp/dbNSFP4.4a_variant.chrM.gz"),
                PathBuf::from("/data/dbnsfp/dbNSFP4.4a/dbNSFP4.4a_variant.chrM.gz"),
            ]
        );
    }

    #[rstest]
    fn test_resolve_falls_back_to_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dbNSFP4.4a")).unwrap();
        let shard = dir.path().join("dbNSFP4.4a/dbNSFP4.4a_variant.chr11.gz");
        std::fs::write(&shard, b"").unwrap();

        let catalog = ReferenceShardCatalog::new(dir.path());
        assert_eq!(catalog.resolve("chr11").unwrap(), shard);
    }

    #[rstest]
    fn test_resolve_missing_shard() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ReferenceShardCatalog::with_templates(dir.path(), vec!["ref.{chrom}.tsv.gz".to_string()]);

        match catalog.resolve("X") {
            Err(SubsetError::ShardNotFound { chrom, searched }) => {
                assert_eq!(chrom, "X");
                assert_eq!(searched, vec![dir.path().join("ref.X.tsv.gz")]);
            }
            other => panic!("expected ShardNotFound, got {:?}", other),
        }
    }
}
