//! Gene-annotation records and the chromosome/gene position index.
//!
//! Two tab-delimited annotation layouts are read: the four-column simplified
//! GFF (`chrom  gene  start  end`) used by synteny pipelines, and standard
//! nine-column GFF3, where the gene identifier comes from the first
//! `key=value` pair of the attributes column. Both may be gzip-compressed.

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::file::InputFile;
use crate::synteny::SyntenyMapError;

/// The integer type for genomic positions.
pub type Position = u64;

/// A start/end coordinate range, as given in the annotation input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// A single gene from the annotation input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    /// The chromosome the gene sits on.
    pub chromosome: String,
    /// The gene identifier; falls back to the chromosome identifier when the
    /// input provides none.
    pub gene: String,
    pub start: Position,
    pub end: Position,
}

/// Per-chromosome spans and per-gene positions, built in one pass over the
/// annotation records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionIndex {
    /// Minimum gene start and maximum gene end per chromosome, in input order.
    pub chromosomes: IndexMap<String, Span>,
    /// Start/end per gene identifier. A repeated gene identifier overwrites
    /// its earlier entry (last write wins).
    pub genes: IndexMap<String, Span>,
}

impl PositionIndex {
    /// Index the given gene records. Empty input yields empty maps.
    pub fn from_records(records: &[GeneRecord]) -> PositionIndex {
        let mut index = PositionIndex::default();
        for record in records {
            let span = index
                .chromosomes
                .entry(record.chromosome.clone())
                .or_insert(Span {
                    start: Position::MAX,
                    end: 0,
                });
            span.start = span.start.min(record.start);
            span.end = span.end.max(record.end);

            let gene_span = Span {
                start: record.start,
                end: record.end,
            };
            if index.genes.insert(record.gene.clone(), gene_span).is_some() {
                debug!(
                    "duplicate gene identifier '{}'; keeping the last entry",
                    record.gene
                );
            }
        }
        index
    }
}

/// Extract the gene identifier from a GFF3 attributes column.
///
/// The identifier is the value of the first `key=value` pair, e.g.
/// `ID=AT1G01010;Note=protein_coding_gene` yields `AT1G01010`.
fn gene_from_attributes(attributes: &str) -> Option<String> {
    let first = attributes.split(';').next()?;
    let value = first.split('=').nth(1)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_position(field: &str) -> Result<Position, SyntenyMapError> {
    field.parse().map_err(|_| {
        SyntenyMapError::ParseError(format!("Failed to parse position from string: {}", field))
    })
}

/// Parse one annotation record, dispatching on the column count.
fn parse_record(record: &StringRecord) -> Result<GeneRecord, SyntenyMapError> {
    let chromosome = record
        .get(0)
        .ok_or(SyntenyMapError::MissingField)?
        .to_string();

    if record.len() >= 9 {
        // GFF3: seqid source type start end score strand phase attributes
        let start = parse_position(record.get(3).ok_or(SyntenyMapError::MissingField)?)?;
        let end = parse_position(record.get(4).ok_or(SyntenyMapError::MissingField)?)?;
        let attributes = record.get(8).ok_or(SyntenyMapError::MissingField)?;
        let gene = gene_from_attributes(attributes).unwrap_or_else(|| chromosome.clone());
        Ok(GeneRecord {
            chromosome,
            gene,
            start,
            end,
        })
    } else if record.len() >= 4 {
        // simplified GFF: chrom gene start end
        let gene = record
            .get(1)
            .ok_or(SyntenyMapError::MissingField)?
            .to_string();
        let start = parse_position(record.get(2).ok_or(SyntenyMapError::MissingField)?)?;
        let end = parse_position(record.get(3).ok_or(SyntenyMapError::MissingField)?)?;
        Ok(GeneRecord {
            chromosome,
            gene,
            start,
            end,
        })
    } else {
        // chrom start end, with the chromosome standing in for the gene
        let start = parse_position(record.get(1).ok_or(SyntenyMapError::MissingField)?)?;
        let end = parse_position(record.get(2).ok_or(SyntenyMapError::MissingField)?)?;
        Ok(GeneRecord {
            chromosome: chromosome.clone(),
            gene: chromosome,
            start,
            end,
        })
    }
}

/// Read gene-annotation records from a tab-delimited file.
///
/// This method also supports reading directly from a gzip-compressed file.
/// An optional `chrom...` header row is detected and skipped, and `#`
/// comment lines (including GFF3 `##` directives) are ignored.
pub fn read_annotation(filepath: &str) -> Result<Vec<GeneRecord>, SyntenyMapError> {
    let input_file = InputFile::new(filepath);

    // read one line to check for headers
    let has_header = input_file.has_header("chrom")?;

    let buf_reader = input_file.reader()?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .flexible(true)
        .from_reader(buf_reader);

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(SyntenyMapError::AnnotationParsingError)?;

        // remove comment lines
        if record.get(0).map_or(false, |s| s.starts_with('#')) {
            continue;
        }

        records.push(parse_record(&record)?);
    }

    debug!("read {} annotation records from {}", records.len(), filepath);
    Ok(records)
}
