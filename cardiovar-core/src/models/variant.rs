use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::utils::strip_chr_prefix;

///
/// Identity of a variant across every component: chromosome (without `chr`),
/// 1-based position, reference and alternate allele.
///
/// Equality is exact; no allele normalization is performed.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl VariantKey {
    pub fn new(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> Self {
        VariantKey {
            chrom: strip_chr_prefix(chrom).to_string(),
            pos,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
        }
    }

    ///
    /// Build a key from the leading columns of a tab split variant line
    /// (`CHROM POS ID REF ALT ...`).
    ///
    pub fn from_columns(columns: &[&str]) -> Result<Self, CoreError> {
        if columns.len() < 5 {
            return Err(CoreError::InvalidVariantKey(columns.join("\t")));
        }
        let pos = parse_position(columns[1])?;
        Ok(VariantKey::new(columns[0], pos, columns[3], columns[4]))
    }
}

pub(crate) fn parse_position(raw: &str) -> Result<u64, CoreError> {
    match raw.trim().parse::<u64>() {
        Ok(pos) if pos > 0 => Ok(pos),
        _ => Err(CoreError::InvalidPosition(raw.to_string())),
    }
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

impl FromStr for VariantKey {
    type Err = CoreError;

    /// Parse `chrom:pos:ref:alt`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(CoreError::InvalidVariantKey(s.to_string()));
        }
        let pos = parse_position(parts[1])?;
        Ok(VariantKey::new(parts[0], pos, parts[2], parts[3]))
    }
}
