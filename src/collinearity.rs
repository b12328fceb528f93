//! Collinearity records and the MCScanX block-file parser.
//!
//! MCScanX `.collinearity` output interleaves alignment headers with the
//! gene-pair rows that make up each block:
//!
//! ```text
//! ## Alignment 0: score=4159.0 e_value=0 N=84 at1&at1 plus
//!   0-  0:        AT1G17480       AT1G72300         7e-39
//!   0-  1:        AT1G17490       AT1G72330         1e-71
//! ```
//!
//! Block identifier, connection index, and gene pair come from each row;
//! score, block e-value, chromosome pair, and orientation come from the
//! enclosing header (`plus` is forward, `minus` is flipped). Lines starting
//! with `#` that are not alignment headers (the parameter and statistics
//! preamble) are skipped.

use log::debug;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

use crate::file::InputFile;
use crate::synteny::SyntenyMapError;

/// A single gene-pair connection from a collinearity file, flattened with its
/// block's alignment header fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollinearityRecord {
    /// The block (alignment) identifier.
    pub block: String,
    /// The connection index within the block.
    pub connection: String,
    pub source_gene: String,
    pub target_gene: String,
    pub source_chromosome: String,
    pub target_chromosome: String,
    /// The alignment score from the block header.
    pub score: f64,
    /// The block-level e-value from the header.
    pub block_e_value: f64,
    /// The e-value of this gene pair.
    pub connection_e_value: f64,
    /// Whether the alignment orientation is `minus`.
    pub flipped: bool,
}

/// Block-header state carried across the rows under one `## Alignment` line.
struct AlignmentHeader {
    score: f64,
    e_value: f64,
    source_chromosome: String,
    target_chromosome: String,
    flipped: bool,
}

fn parse_float(field: &str, what: &str) -> Result<f64, SyntenyMapError> {
    field.parse().map_err(|_| {
        SyntenyMapError::ParseError(format!("Failed to parse {} from string: {}", what, field))
    })
}

/// Strip a `key=` prefix off a header token.
fn header_value<'a>(token: &'a str, key: &str) -> Result<&'a str, SyntenyMapError> {
    token.strip_prefix(key).ok_or_else(|| {
        SyntenyMapError::ParseError(format!(
            "Expected alignment header token '{}...', found: {}",
            key, token
        ))
    })
}

/// Parse one `## Alignment` header line.
fn parse_header(line: &str) -> Result<AlignmentHeader, SyntenyMapError> {
    // e.g. "## Alignment 0: score=4159.0 e_value=0 N=84 at1&at1 plus"
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 8 {
        return Err(SyntenyMapError::ParseError(format!(
            "Malformed alignment header: {}",
            line
        )));
    }

    let score = parse_float(header_value(tokens[3], "score=")?, "score")?;
    let e_value = parse_float(header_value(tokens[4], "e_value=")?, "e_value")?;
    header_value(tokens[5], "N=")?;

    let (source_chromosome, target_chromosome) = tokens[6].split_once('&').ok_or_else(|| {
        SyntenyMapError::ParseError(format!(
            "Expected a 'source&target' chromosome pair, found: {}",
            tokens[6]
        ))
    })?;

    let flipped = match tokens[7] {
        "plus" => false,
        "minus" => true,
        other => {
            return Err(SyntenyMapError::ParseError(format!(
                "Expected alignment orientation 'plus' or 'minus', found: {}",
                other
            )))
        }
    };

    Ok(AlignmentHeader {
        score,
        e_value,
        source_chromosome: source_chromosome.to_string(),
        target_chromosome: target_chromosome.to_string(),
        flipped,
    })
}

/// Parse one gene-pair row using the enclosing alignment header.
fn parse_connection(
    line: &str,
    header: &AlignmentHeader,
) -> Result<CollinearityRecord, SyntenyMapError> {
    // e.g. "  0-  1:\tAT1G17490\tAT1G72330\t  1e-71"; the prefix may pad the
    // block and connection numbers with spaces, so split at the first ':'
    let (prefix, rest) = line.split_once(':').ok_or_else(|| {
        SyntenyMapError::ParseError(format!("Malformed collinearity row: {}", line))
    })?;
    let (block, connection) = prefix.split_once('-').ok_or_else(|| {
        SyntenyMapError::ParseError(format!(
            "Expected a 'block-connection' row prefix, found: {}",
            prefix
        ))
    })?;

    let fields: Vec<&str> = rest.split_whitespace().collect();
    let source_gene = fields.first().ok_or(SyntenyMapError::MissingField)?;
    let target_gene = fields.get(1).ok_or(SyntenyMapError::MissingField)?;
    let e_value_str = fields.get(2).ok_or(SyntenyMapError::MissingField)?;
    let connection_e_value = parse_float(e_value_str, "e_value")?;

    Ok(CollinearityRecord {
        block: block.trim().to_string(),
        connection: connection.trim().to_string(),
        source_gene: source_gene.to_string(),
        target_gene: target_gene.to_string(),
        source_chromosome: header.source_chromosome.clone(),
        target_chromosome: header.target_chromosome.clone(),
        score: header.score,
        block_e_value: header.e_value,
        connection_e_value,
        flipped: header.flipped,
    })
}

/// Parse MCScanX collinearity records from a reader.
pub fn parse_collinearity<R: BufRead>(
    reader: R,
) -> Result<Vec<CollinearityRecord>, SyntenyMapError> {
    let mut records = Vec::new();
    let mut current: Option<AlignmentHeader> = None;

    for result in reader.lines() {
        let line = result?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("## Alignment") {
            current = Some(parse_header(trimmed)?);
            continue;
        }
        if trimmed.starts_with('#') {
            // parameter and statistics preamble
            continue;
        }
        let header = current.as_ref().ok_or_else(|| {
            SyntenyMapError::ParseError(format!(
                "Collinearity row before any alignment header: {}",
                trimmed
            ))
        })?;
        records.push(parse_connection(trimmed, header)?);
    }

    Ok(records)
}

/// Read MCScanX collinearity records from a file.
///
/// This method also supports reading directly from a gzip-compressed file.
pub fn read_collinearity(filepath: &str) -> Result<Vec<CollinearityRecord>, SyntenyMapError> {
    let input_file = InputFile::new(filepath);
    let reader = input_file.reader()?;
    let records = parse_collinearity(reader)?;
    debug!(
        "read {} collinearity records from {}",
        records.len(),
        filepath
    );
    Ok(records)
}
