//! Edge weights from gene-gene correlation

use super::{SubgraphError, SubgraphResult};
use crate::annotation::delimiter_for;
use crate::graph::InteractionGraph;
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Fewer shared samples than this gives no correlation
pub const MIN_SHARED_SAMPLES: usize = 3;

const WEIGHT_TABLE: &str = "weights";
const PROFILE_TABLE: &str = "profiles";

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Symmetric weight per gene pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationWeights {
    /// lower symbol -> higher symbol -> weight
    weights: FxHashMap<String, FxHashMap<String, f64>>,
    len: usize,
}

impl CorrelationWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of a pair; NaN weights are ignored
    pub fn insert(&mut self, a: &str, b: &str, weight: f64) {
        if weight.is_nan() {
            return;
        }
        let (lo, hi) = ordered(a, b);
        let previous = self
            .weights
            .entry(lo.to_string())
            .or_default()
            .insert(hi.to_string(), weight);
        if previous.is_none() {
            self.len += 1;
        }
    }

    /// Weight of a pair, in either orientation
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let (lo, hi) = ordered(a, b);
        self.weights.get(lo)?.get(hi).copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read a long-format `source`, `target`, `weight` table
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> SubgraphResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut idx = [0usize; 3];
        for (slot, column) in idx.iter_mut().zip(["source", "target", "weight"]) {
            *slot = headers.iter().position(|h| h == column).ok_or_else(|| {
                SubgraphError::MissingColumn {
                    table: WEIGHT_TABLE,
                    column: column.to_string(),
                }
            })?;
        }

        let mut weights = CorrelationWeights::new();
        for record in rdr.records() {
            let record = record?;
            let raw = record.get(idx[2]).unwrap_or("");
            let weight: f64 = raw.parse().map_err(|_| SubgraphError::InvalidValue {
                table: WEIGHT_TABLE,
                value: raw.to_string(),
                line: record.position().map_or(0, |p| p.line()),
            })?;
            weights.insert(
                record.get(idx[0]).unwrap_or(""),
                record.get(idx[1]).unwrap_or(""),
                weight,
            );
        }
        info!(pairs = weights.len(), "Read correlation weights");
        Ok(weights)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SubgraphResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SubgraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, delimiter_for(path))
    }

    /// Pearson correlation of the two endpoint profiles, for every edge of
    /// `graph`. Edges lacking a profile or enough shared samples get no
    /// weight.
    pub fn from_profiles(profiles: &GeneProfiles, graph: &InteractionGraph) -> Self {
        let pairs: Vec<(&str, &str)> = graph.edges().map(|e| (e.source, e.target)).collect();
        let computed: Vec<(&str, &str, f64)> = pairs
            .par_iter()
            .filter_map(|&(a, b)| {
                let r = pearson(profiles.profile(a)?, profiles.profile(b)?)?;
                Some((a, b, r))
            })
            .collect();

        info!(
            edges = pairs.len(),
            weighted = computed.len(),
            "Computed profile correlations"
        );
        computed.into_iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a str, f64)> for CorrelationWeights {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str, f64)>>(iter: T) -> Self {
        let mut weights = CorrelationWeights::new();
        for (a, b, w) in iter {
            weights.insert(a, b, w);
        }
        weights
    }
}

/// Gene x sample matrix; missing measurements are `None`
#[derive(Debug, Clone, Default)]
pub struct GeneProfiles {
    samples: Vec<String>,
    profiles: IndexMap<String, Vec<Option<f64>>>,
}

impl GeneProfiles {
    pub fn new(samples: Vec<String>) -> Self {
        GeneProfiles {
            samples,
            profiles: IndexMap::new(),
        }
    }

    /// Add or replace a gene profile; it must have one value per sample
    pub fn insert(&mut self, gene: impl Into<String>, values: Vec<Option<f64>>) -> bool {
        if values.len() != self.samples.len() {
            return false;
        }
        self.profiles.insert(gene.into(), values);
        true
    }

    pub fn profile(&self, gene: &str) -> Option<&[Option<f64>]> {
        self.profiles.get(gene).map(Vec::as_slice)
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn gene_count(&self) -> usize {
        self.profiles.len()
    }

    /// Read a matrix whose first column holds gene symbols and whose header
    /// holds sample names. Empty, `NA` and `nan` cells are missing.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> SubgraphResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.len() < 2 {
            return Err(SubgraphError::MissingColumn {
                table: PROFILE_TABLE,
                column: "sample".to_string(),
            });
        }
        let mut profiles = GeneProfiles::new(headers.iter().skip(1).map(str::to_string).collect());

        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            let mut fields = record.iter();
            let gene = fields.next().unwrap_or("").to_string();
            let values = fields
                .map(|raw| parse_measurement(raw, line))
                .collect::<SubgraphResult<Vec<_>>>()?;
            profiles.insert(gene, values);
        }
        info!(
            genes = profiles.gene_count(),
            samples = profiles.samples.len(),
            "Read gene profiles"
        );
        Ok(profiles)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SubgraphResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SubgraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, delimiter_for(path))
    }
}

fn parse_measurement(raw: &str, line: u64) -> SubgraphResult<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| SubgraphError::InvalidValue {
        table: PROFILE_TABLE,
        value: raw.to_string(),
        line,
    })?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}

/// Pearson correlation over samples present in both profiles.
///
/// `None` with fewer than [`MIN_SHARED_SAMPLES`] shared samples or when
/// either side has zero variance.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let shared: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if shared.len() < MIN_SHARED_SAMPLES {
        return None;
    }

    let n = shared.len() as f64;
    let mean_x = shared.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = shared.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &shared {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{simplify, AttributeMap, CombineRule, EdgeList};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pearson() {
        let x = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let z = [Some(4.0), Some(3.0), Some(2.0), Some(1.0)];
        assert!(close(pearson(&x, &y).unwrap(), 1.0));
        assert!(close(pearson(&x, &z).unwrap(), -1.0));
    }

    #[test]
    fn test_pearson_pairwise_complete() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let y = [Some(1.0), Some(100.0), None, Some(4.0), Some(5.0)];
        // shared samples 0, 3, 4
        assert!(close(pearson(&x, &y).unwrap(), 1.0));

        let short = [Some(1.0), None, None, Some(2.0), None];
        assert_eq!(pearson(&x, &short), None);

        let flat = [Some(2.0); 5];
        assert_eq!(pearson(&x, &flat), None);
    }

    #[test]
    fn test_weights_are_symmetric() {
        let weights: CorrelationWeights = [("TP53", "MDM2", -0.4)].into_iter().collect();
        assert_eq!(weights.get("MDM2", "TP53"), Some(-0.4));
        assert_eq!(weights.get("TP53", "MDM2"), Some(-0.4));
        assert_eq!(weights.get("TP53", "EGFR"), None);
    }

    #[test]
    fn test_read_long_table() {
        let raw = "source\ttarget\tweight\nA\tB\t0.5\nC\tB\t-0.8\n";
        let weights = CorrelationWeights::from_reader(raw.as_bytes(), b'\t').unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights.get("B", "C"), Some(-0.8));

        let bad = "source\ttarget\tweight\nA\tB\thigh\n";
        assert!(matches!(
            CorrelationWeights::from_reader(bad.as_bytes(), b'\t'),
            Err(SubgraphError::InvalidValue { line: 2, .. })
        ));
    }

    #[test]
    fn test_weights_from_profiles() {
        let raw = "gene,s1,s2,s3,s4\nA,1,2,3,4\nB,2,4,6,8\nC,4,3,2,NA\nD,1,1,1,1\n";
        let profiles = GeneProfiles::from_reader(raw.as_bytes(), b',').unwrap();
        assert_eq!(profiles.gene_count(), 4);
        assert_eq!(profiles.profile("C").unwrap()[3], None);

        let mut list = EdgeList::new(false);
        list.add_edge("A", "B", AttributeMap::new());
        list.add_edge("A", "C", AttributeMap::new());
        list.add_edge("A", "D", AttributeMap::new());
        list.add_edge("A", "MISSING", AttributeMap::new());
        let graph = simplify(list, CombineRule::None);

        let weights = CorrelationWeights::from_profiles(&profiles, &graph);
        assert_eq!(weights.len(), 2);
        assert!(close(weights.get("A", "B").unwrap(), 1.0));
        assert!(close(weights.get("C", "A").unwrap(), -1.0));
        assert_eq!(weights.get("A", "D"), None);
    }
}
