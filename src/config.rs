//! Assembly configuration
//!
//! Raw file locations, filters and artifact paths for every source. Loaded
//! from YAML; every field has a default, so an empty file is a valid
//! configuration. Relative paths resolve against `data_dir`.

use crate::sources::alias::DEFAULT_SYMBOL_MARKER;
use crate::sources::biogrid::DEFAULT_ORGANISM;
use crate::sources::string::DEFAULT_SCORE_THRES;
use crate::sources::{
    BiogridFilter, BiogridSource, InteractionSource, OmnipathFilter, OmnipathSource, SourceKind,
    StringSource,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringConfig {
    pub links_path: PathBuf,
    pub aliases_path: PathBuf,
    /// Links must score strictly above this (0-1000)
    pub score_thres: u32,
    /// Alias source tag marking gene symbols
    pub alias_source_marker: String,
    pub output: PathBuf,
}

impl Default for StringConfig {
    fn default() -> Self {
        Self {
            links_path: PathBuf::from("9606.protein.links.txt"),
            aliases_path: PathBuf::from("9606.protein.aliases.txt"),
            score_thres: DEFAULT_SCORE_THRES,
            alias_source_marker: DEFAULT_SYMBOL_MARKER.to_string(),
            output: PathBuf::from("string.ppig"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiogridConfig {
    pub path: PathBuf,
    /// NCBI taxonomy id both interactors must belong to
    pub organism: u32,
    /// Accepted `Experimental System` labels
    pub exp_type: Option<BTreeSet<String>>,
    /// Accepted `Experimental System Type` values
    pub int_type: Option<BTreeSet<String>>,
    pub output: PathBuf,
}

impl Default for BiogridConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("BIOGRID-ALL.tab2.txt"),
            organism: DEFAULT_ORGANISM,
            exp_type: None,
            int_type: None,
            output: PathBuf::from("biogrid.ppig"),
        }
    }
}

impl BiogridConfig {
    pub fn filter(&self) -> BiogridFilter {
        BiogridFilter {
            organism: self.organism,
            exp_type: self.exp_type.clone(),
            int_type: self.int_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmnipathConfig {
    pub path: PathBuf,
    pub is_directed: bool,
    pub is_signed: bool,
    pub output: PathBuf,
}

impl Default for OmnipathConfig {
    fn default() -> Self {
        let filter = OmnipathFilter::default();
        Self {
            path: PathBuf::from("omnipath_interactions.txt"),
            is_directed: filter.is_directed,
            is_signed: filter.is_signed,
            output: PathBuf::from("omnipath.ppig"),
        }
    }
}

impl OmnipathConfig {
    pub fn filter(&self) -> OmnipathFilter {
        OmnipathFilter {
            is_directed: self.is_directed,
            is_signed: self.is_signed,
        }
    }
}

/// Configuration for assembling every source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Base directory for relative paths
    pub data_dir: PathBuf,
    pub string: StringConfig,
    pub biogrid: BiogridConfig,
    pub omnipath: OmnipathConfig,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            string: StringConfig::default(),
            biogrid: BiogridConfig::default(),
            omnipath: OmnipathConfig::default(),
        }
    }
}

impl AssemblyConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: AssemblyConfig = if yaml.trim().is_empty() {
            AssemblyConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!(
            path = %path.display(),
            data_dir = %config.data_dir.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.string.score_thres > 1000 {
            return Err(ConfigError::Invalid(format!(
                "string.score_thres must be within 0..=1000, got {}",
                self.string.score_thres
            )));
        }
        if self.string.alias_source_marker.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "string.alias_source_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a path against `data_dir`; absolute paths are kept
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Where the graph artifact of a source is written
    pub fn output_path(&self, kind: SourceKind) -> PathBuf {
        let output = match kind {
            SourceKind::String => &self.string.output,
            SourceKind::Biogrid => &self.biogrid.output,
            SourceKind::Omnipath => &self.omnipath.output,
        };
        self.resolve(output)
    }

    /// The configured builder of a source
    pub fn source(&self, kind: SourceKind) -> Box<dyn InteractionSource> {
        match kind {
            SourceKind::String => Box::new(StringSource {
                links_path: self.resolve(&self.string.links_path),
                aliases_path: self.resolve(&self.string.aliases_path),
                score_thres: self.string.score_thres,
                alias_source_marker: self.string.alias_source_marker.clone(),
            }),
            SourceKind::Biogrid => Box::new(BiogridSource::new(
                self.resolve(&self.biogrid.path),
                self.biogrid.filter(),
            )),
            SourceKind::Omnipath => Box::new(OmnipathSource::new(
                self.resolve(&self.omnipath.path),
                self.omnipath.filter(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = AssemblyConfig::from_yaml_str("").unwrap();
        assert_eq!(config, AssemblyConfig::default());
        assert_eq!(config.string.score_thres, 900);
        assert_eq!(config.biogrid.organism, 9606);
        assert!(config.omnipath.is_directed);
    }

    #[test]
    fn test_partial_document() {
        let yaml = r#"
data_dir: /srv/ppi
string:
  score_thres: 700
biogrid:
  int_type: [physical]
  exp_type: ["Affinity Capture-MS", "Affinity Capture-Western"]
omnipath:
  is_signed: false
  output: /tmp/omnipath.ppig
"#;
        let config = AssemblyConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.string.score_thres, 700);
        assert_eq!(config.string.alias_source_marker, "BioMart_HUGO");
        assert_eq!(config.biogrid.filter(), BiogridFilter::affinity_capture());
        assert!(!config.omnipath.filter().is_signed);

        assert_eq!(
            config.output_path(SourceKind::String),
            PathBuf::from("/srv/ppi/string.ppig")
        );
        assert_eq!(
            config.output_path(SourceKind::Omnipath),
            PathBuf::from("/tmp/omnipath.ppig")
        );
        assert_eq!(config.source(SourceKind::Biogrid).kind(), SourceKind::Biogrid);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = AssemblyConfig::from_yaml_str("string:\n  score_thres: 1500\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_shape() {
        let err = AssemblyConfig::from_yaml_str("string: 42\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
