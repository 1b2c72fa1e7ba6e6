//! Drug-gene association tables
//!
//! Tables come from the association pipeline. Only the columns the
//! annotation needs are decoded; every other column is carried through
//! untouched when the annotated table is written back.

use super::proximity::ProximityAnnotation;
use super::{delimiter_for, io_error, AnnotationError, AnnotationResult};
use crate::sources::table::parse_flag;
use csv::StringRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

pub const DRUG_ID: &str = "DRUG_ID";
pub const DRUG_NAME: &str = "DRUG_NAME";
pub const VERSION: &str = "VERSION";
pub const GENE_SYMBOL: &str = "GeneSymbol";
pub const BETA: &str = "beta";
pub const PVAL: &str = "pval";
pub const FDR: &str = "fdr";
pub const TARGET: &str = "target";

/// Appended graph distance column
pub const PPI_DISTANCE: &str = "ppi_distance";
/// Appended proximity category column
pub const PPI: &str = "ppi";

const TABLE: &str = "associations";

/// Decoded view of one association row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRow {
    pub drug_id: String,
    pub drug_name: Option<String>,
    pub version: Option<String>,
    pub gene: String,
    pub beta: Option<f64>,
    pub pval: Option<f64>,
    pub fdr: Option<f64>,
    /// Target flag carried from the association pipeline. Informational
    /// only; proximity is decided by the drug-target mapping.
    pub target: bool,
}

impl AssociationRow {
    pub fn new(drug_id: impl Into<String>, gene: impl Into<String>) -> Self {
        AssociationRow {
            drug_id: drug_id.into(),
            drug_name: None,
            version: None,
            gene: gene.into(),
            beta: None,
            pval: None,
            fdr: None,
            target: false,
        }
    }

    pub fn with_target(mut self, target: bool) -> Self {
        self.target = target;
        self
    }

    pub fn with_fdr(mut self, fdr: f64) -> Self {
        self.fdr = Some(fdr);
        self
    }

    /// `fdr < fdr_thres`; rows without an FDR are never significant
    pub fn is_significant(&self, fdr_thres: f64) -> bool {
        self.fdr.map_or(false, |fdr| fdr < fdr_thres)
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    drug_id: usize,
    gene: usize,
    drug_name: Option<usize>,
    version: Option<usize>,
    beta: Option<usize>,
    pval: Option<usize>,
    fdr: Option<usize>,
    target: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> AnnotationResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AnnotationError::MissingColumn {
                table: TABLE,
                column: name.to_string(),
            })
        };
        Ok(Columns {
            drug_id: require(DRUG_ID)?,
            gene: require(GENE_SYMBOL)?,
            drug_name: find(DRUG_NAME),
            version: find(VERSION),
            beta: find(BETA),
            pval: find(PVAL),
            fdr: find(FDR),
            target: find(TARGET),
        })
    }
}

/// An association table with its original columns
#[derive(Debug, Clone)]
pub struct AssociationTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
    rows: Vec<AssociationRow>,
}

impl AssociationTable {
    /// Read a table with a header row
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> AnnotationResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let columns = Columns::locate(&headers)?;

        let mut records = Vec::new();
        let mut rows = Vec::new();
        let mut unrecognized_target = 0usize;
        for result in rdr.records() {
            let record = result?;
            let (row, target_known) = decode_row(&record, &headers, columns)?;
            if !target_known {
                unrecognized_target += 1;
            }
            rows.push(row);
            records.push(record);
        }

        if unrecognized_target > 0 {
            warn!(
                rows = unrecognized_target,
                "Unrecognized target flags read as false"
            );
        }
        info!(
            rows = rows.len(),
            columns = headers.len(),
            "Read association table"
        );
        Ok(AssociationTable {
            headers,
            records,
            rows,
        })
    }

    /// Read a table from disk; `.tsv` files are tab-separated
    pub fn from_path(path: impl AsRef<Path>) -> AnnotationResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(io_error(path))?;
        Self::from_reader(file, delimiter_for(path))
    }

    /// Build a table from decoded rows only
    pub fn from_rows(rows: Vec<AssociationRow>) -> Self {
        let headers = StringRecord::from(vec![
            DRUG_ID, DRUG_NAME, VERSION, GENE_SYMBOL, BETA, PVAL, FDR, TARGET,
        ]);
        let records = rows.iter().map(encode_row).collect();
        AssociationTable {
            headers,
            records,
            rows,
        }
    }

    pub fn rows(&self) -> &[AssociationRow] {
        &self.rows
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table with `ppi_distance` and `ppi` appended.
    ///
    /// Existing columns of those names are replaced, so a table can be
    /// annotated again.
    pub fn write_annotated<W: Write>(
        &self,
        writer: W,
        delimiter: u8,
        annotations: &[ProximityAnnotation],
    ) -> AnnotationResult<()> {
        if annotations.len() != self.rows.len() {
            return Err(AnnotationError::LengthMismatch {
                rows: self.rows.len(),
                annotations: annotations.len(),
            });
        }

        let kept: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| *h != PPI_DISTANCE && *h != PPI)
            .map(|(i, _)| i)
            .collect();

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        let mut header: Vec<&str> = kept.iter().map(|&i| &self.headers[i]).collect();
        header.push(PPI_DISTANCE);
        header.push(PPI);
        wtr.write_record(&header)?;

        for (record, annotation) in self.records.iter().zip(annotations) {
            let distance = annotation.distance.to_string();
            let category = annotation.category.to_string();
            let mut out: Vec<&str> = kept
                .iter()
                .map(|&i| record.get(i).unwrap_or(""))
                .collect();
            out.push(&distance);
            out.push(&category);
            wtr.write_record(&out)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write the annotated table to disk
    pub fn write_annotated_path(
        &self,
        path: impl AsRef<Path>,
        annotations: &[ProximityAnnotation],
    ) -> AnnotationResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(io_error(path))?;
        self.write_annotated(file, delimiter_for(path), annotations)?;
        info!(path = %path.display(), rows = self.rows.len(), "Wrote annotated associations");
        Ok(())
    }
}

/// Decode one record. The flag is false when the `target` cell is not a
/// recognizable boolean.
fn decode_row(
    record: &StringRecord,
    headers: &StringRecord,
    columns: Columns,
) -> AnnotationResult<(AssociationRow, bool)> {
    let line = record.position().map_or(0, |p| p.line());
    let text = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let invalid = |idx: usize, value: &str| AnnotationError::InvalidValue {
        table: TABLE,
        column: headers.get(idx).unwrap_or_default().to_string(),
        value: value.to_string(),
        line,
    };
    let number = |idx: Option<usize>| -> AnnotationResult<Option<f64>> {
        let Some(i) = idx else { return Ok(None) };
        let raw = record.get(i).unwrap_or("").trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("na") {
            return Ok(None);
        }
        let value: f64 = raw.parse().map_err(|_| invalid(i, raw))?;
        Ok(Some(value).filter(|v| !v.is_nan()))
    };

    let target = columns
        .target
        .map(|i| parse_flag(record.get(i).unwrap_or("")));
    let target_known = !matches!(target, Some(None));

    let row = AssociationRow {
        drug_id: record.get(columns.drug_id).unwrap_or("").to_string(),
        drug_name: text(columns.drug_name),
        version: text(columns.version),
        gene: record.get(columns.gene).unwrap_or("").to_string(),
        beta: number(columns.beta)?,
        pval: number(columns.pval)?,
        fdr: number(columns.fdr)?,
        target: target.flatten().unwrap_or(false),
    };
    Ok((row, target_known))
}

fn encode_row(row: &AssociationRow) -> StringRecord {
    let number = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    StringRecord::from(vec![
        row.drug_id.clone(),
        row.drug_name.clone().unwrap_or_default(),
        row.version.clone().unwrap_or_default(),
        row.gene.clone(),
        number(row.beta),
        number(row.pval),
        number(row.fdr),
        if row.target { "True" } else { "False" }.to_string(),
    ])
}
