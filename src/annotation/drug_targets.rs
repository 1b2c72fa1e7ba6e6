//! Drug to canonical target gene mapping

use super::{delimiter_for, io_error, AnnotationError, AnnotationResult};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

const TABLE: &str = "drug-targets";

#[derive(Debug, Deserialize)]
struct TargetRecord {
    #[serde(rename = "DRUG_ID")]
    drug_id: String,
    #[serde(rename = "TARGET", default)]
    target: Option<String>,
}

/// Target genes per drug identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugTargets {
    targets: BTreeMap<String, BTreeSet<String>>,
}

impl DrugTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add targets for a drug; repeated calls accumulate
    pub fn insert<I, S>(&mut self, drug_id: impl Into<String>, genes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.targets.entry(drug_id.into()).or_default();
        entry.extend(
            genes
                .into_iter()
                .map(Into::into)
                .filter(|g: &String| !g.is_empty()),
        );
    }

    /// Targets of a drug; empty when the drug is unknown
    pub fn targets(&self, drug_id: &str) -> impl Iterator<Item = &str> + '_ {
        self.targets
            .get(drug_id)
            .into_iter()
            .flat_map(|genes| genes.iter().map(String::as_str))
    }

    pub fn is_target(&self, drug_id: &str, gene: &str) -> bool {
        self.targets
            .get(drug_id)
            .map_or(false, |genes| genes.contains(gene))
    }

    pub fn drug_count(&self) -> usize {
        self.targets.len()
    }

    /// Read a `DRUG_ID`, `TARGET` table. Several targets in one cell are
    /// separated by `;` or `,`.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> AnnotationResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in ["DRUG_ID", "TARGET"] {
            if !headers.iter().any(|h| h == column) {
                return Err(AnnotationError::MissingColumn {
                    table: TABLE,
                    column: column.to_string(),
                });
            }
        }

        let mut map = DrugTargets::new();
        for record in rdr.deserialize::<TargetRecord>() {
            let record = record?;
            let genes = record
                .target
                .as_deref()
                .unwrap_or("")
                .split([';', ','])
                .map(str::trim)
                .map(str::to_string)
                .collect::<Vec<_>>();
            map.insert(record.drug_id, genes);
        }

        let without_targets = map.targets.values().filter(|g| g.is_empty()).count();
        info!(
            drugs = map.drug_count(),
            without_targets,
            "Read drug targets"
        );
        Ok(map)
    }

    pub fn from_path(path: impl AsRef<Path>) -> AnnotationResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(io_error(path))?;
        Self::from_reader(file, delimiter_for(path))
    }
}

impl<D, G, S> FromIterator<(D, G)> for DrugTargets
where
    D: Into<String>,
    G: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (D, G)>>(iter: T) -> Self {
        let mut map = DrugTargets::new();
        for (drug, genes) in iter {
            map.insert(drug, genes);
        }
        map
    }
}
