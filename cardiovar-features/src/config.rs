use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

///
/// Fixed policy thresholds for the qualitative evidence list.
///
/// These are not learned; the defaults are the values reviewers expect.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvidenceThresholds {
    /// AF below this is "ultra-rare".
    pub ultra_rare_af: f64,
    /// AF below this is "very low".
    pub very_low_af: f64,
    /// AF below this is "low".
    pub low_af: f64,
    /// Conservation scores (GERP++, phyloP) above this are "conserved".
    pub conservation: f64,
}

impl Default for EvidenceThresholds {
    fn default() -> Self {
        EvidenceThresholds {
            ultra_rare_af: 1e-5,
            very_low_af: 1e-3,
            low_af: 1e-2,
            conservation: 2.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct FeatureConfig {
    pub evidence: EvidenceThresholds,
}

#[derive(Error, Debug)]
pub enum FeatureConfigError {
    #[error("Evidence thresholds must satisfy 0 < ultra_rare_af <= very_low_af <= low_af")]
    UnorderedThresholds,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), FeatureConfigError> {
        let t = &self.evidence;
        if !(t.ultra_rare_af > 0.0 && t.ultra_rare_af <= t.very_low_af && t.very_low_af <= t.low_af) {
            return Err(FeatureConfigError::UnorderedThresholds);
        }
        Ok(())
    }
}

impl TryFrom<&Path> for FeatureConfig {
    type Error = FeatureConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: FeatureConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_defaults() {
        let config = FeatureConfig::default();
        assert_eq!(config.evidence.ultra_rare_af, 1e-5);
        assert_eq!(config.evidence.very_low_af, 1e-3);
        assert_eq!(config.evidence.low_af, 1e-2);
        assert_eq!(config.evidence.conservation, 2.0);
    }

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.toml");
        std::fs::write(&path, "[evidence]\nconservation = 3.5\n").unwrap();

        let config = FeatureConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.evidence.conservation, 3.5);
        assert_eq!(config.evidence.low_af, 1e-2);
    }

    #[rstest]
    fn test_unordered_thresholds_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.toml");
        std::fs::write(&path, "[evidence]\nultra_rare_af = 0.5\n").unwrap();

        let result = FeatureConfig::try_from(path.as_path());
        assert_eq!(matches!(result, Err(FeatureConfigError::UnorderedThresholds)), true);
    }
}
