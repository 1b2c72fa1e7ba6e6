//! STRING protein identifier to gene symbol mapping

use super::table::{self, TableSpec};
use super::SourceResult;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Source tag token marking HGNC gene-symbol aliases
pub const DEFAULT_SYMBOL_MARKER: &str = "BioMart_HUGO";

pub(crate) const ALIAS_TABLE: TableSpec = TableSpec {
    source: "string-aliases",
    delimiter: b'\t',
    required: &["string_protein_id", "alias", "source"],
};

/// One row of the STRING alias file
#[derive(Debug, Clone, Deserialize)]
pub struct StringAlias {
    pub string_protein_id: String,
    pub alias: String,
    /// Space-separated list of tags naming where the alias comes from
    pub source: String,
}

/// Unambiguous mapping from raw protein id to gene symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifierMap {
    symbols: FxHashMap<String, String>,
}

impl IdentifierMap {
    /// Build the map from alias rows.
    ///
    /// Only rows whose `source` tags contain `marker` are considered. A
    /// protein id is kept only when exactly one distinct alias remains for it.
    pub fn from_aliases<I>(aliases: I, marker: &str) -> Self
    where
        I: IntoIterator<Item = StringAlias>,
    {
        let mut candidates: FxHashMap<String, BTreeSet<String>> = FxHashMap::default();
        let mut rows = 0usize;
        let mut marked = 0usize;

        for row in aliases {
            rows += 1;
            if !row.source.split(' ').any(|tag| tag == marker) {
                continue;
            }
            marked += 1;
            candidates
                .entry(row.string_protein_id)
                .or_default()
                .insert(row.alias);
        }

        let total_ids = candidates.len();
        let symbols: FxHashMap<String, String> = candidates
            .into_iter()
            .filter_map(|(id, mut aliases)| {
                if aliases.len() == 1 {
                    aliases.pop_first().map(|symbol| (id, symbol))
                } else {
                    None
                }
            })
            .collect();

        info!(
            rows,
            marked,
            ids = total_ids,
            ambiguous = total_ids - symbols.len(),
            mapped = symbols.len(),
            marker,
            "Built identifier map"
        );

        IdentifierMap { symbols }
    }

    /// Read the alias file and build the map
    pub fn from_file(path: &Path, marker: &str) -> SourceResult<Self> {
        let rows: Vec<StringAlias> = table::read_file(path, &ALIAS_TABLE)?;
        Ok(Self::from_aliases(rows, marker))
    }

    /// Gene symbol for a raw id, if it maps unambiguously
    pub fn get(&self, id: &str) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<(String, String)> for IdentifierMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        IdentifierMap {
            symbols: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(id: &str, alias: &str, source: &str) -> StringAlias {
        StringAlias {
            string_protein_id: id.to_string(),
            alias: alias.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_keeps_only_unambiguous_ids() {
        let rows = vec![
            alias("9606.ENSP01", "EGFR", "BioMart_HUGO Ensembl_UniProt"),
            // repeated alias for the same id is still one symbol
            alias("9606.ENSP01", "EGFR", "BioMart_HUGO"),
            alias("9606.ENSP02", "HRAS", "BioMart_HUGO"),
            alias("9606.ENSP02", "KRAS", "BioMart_HUGO"),
            alias("9606.ENSP03", "ERBB2", "Ensembl_EntrezGene"),
        ];

        let map = IdentifierMap::from_aliases(rows, DEFAULT_SYMBOL_MARKER);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("9606.ENSP01"), Some("EGFR"));
        assert_eq!(map.get("9606.ENSP02"), None);
        assert_eq!(map.get("9606.ENSP03"), None);
    }

    #[test]
    fn test_marker_must_be_a_whole_token() {
        let rows = vec![alias("9606.ENSP01", "EGFR", "BioMart_HUGO_old")];
        let map = IdentifierMap::from_aliases(rows, DEFAULT_SYMBOL_MARKER);
        assert!(map.is_empty());
    }

    #[test]
    fn test_non_marked_aliases_do_not_cause_ambiguity() {
        let rows = vec![
            alias("9606.ENSP01", "EGFR", "BioMart_HUGO"),
            alias("9606.ENSP01", "ERBB1", "Ensembl_UniProt"),
        ];
        let map = IdentifierMap::from_aliases(rows, DEFAULT_SYMBOL_MARKER);
        assert_eq!(map.get("9606.ENSP01"), Some("EGFR"));
    }
}
