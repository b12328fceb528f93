//! The synteny map: chromosome, gene, block, and pair-connection indices.
//!
//! A [`SyntenyMap`] is built once per dataset load from gene-annotation and
//! collinearity records. After construction it is immutable apart from
//! [`SyntenyMap::recolor`]; all interactive behavior lives in
//! [`crate::view::ViewState`], which borrows the map and derives views from
//! it.

use genomap::{GenomeMap, GenomeMapError};
use indexmap::map::IndexMap;
use indexmap::set::IndexSet;
use log::debug;
use rgb::RGB8;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

use crate::annotation::{read_annotation, GeneRecord, Position, PositionIndex, Span};
use crate::collinearity::{read_collinearity, CollinearityRecord};
use crate::file::FileError;
use crate::keys::{partition_chromosome_keys, partition_tag, sort_chromosome_keys};
use crate::palette::{ColorMode, OrdinalScale, Palette, FLIP_STATE};

#[derive(Error, Debug)]
pub enum SyntenyMapError {
    #[error("Annotation parsing error: {0}")]
    AnnotationParsingError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    #[error("File reading error: {0}")]
    FileError(#[from] FileError),
    #[error("Missing field")]
    MissingField,
    #[error("Parsing failed: {0}")]
    ParseError(String),
    #[error("Gene '{gene}' in block '{block}' is not in the annotation; the annotation and collinearity files are not compatible")]
    MissingGene { block: String, gene: String },
    #[error("Block '{0}' mixes more than one chromosome pair")]
    InconsistentBlock(String),
    #[error("Chromosome key '{0}' does not exist")]
    NoChrom(String),
    #[error("Genome '{0}' does not exist")]
    NoGenome(String),
    #[error("Block '{0}' does not exist")]
    NoBlock(String),
    #[error("New chromosome order is not a permutation of the existing keys")]
    InvalidOrder,
    #[error("GenomeMap error: error updating GenomeMap")]
    GenomeMapError(#[from] GenomeMapError),
}

/// A chromosome's indexed display data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeInfo {
    /// Minimum gene start and maximum gene end on this chromosome.
    pub span: Span,
    /// The currently assigned display color.
    pub color: RGB8,
    /// The genome-of-origin partition tag.
    pub tag: String,
}

/// Aggregate gene coordinates for one block, derived from the gene lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPositions {
    pub min_source: Position,
    pub max_source: Position,
    pub min_target: Position,
    pub max_target: Position,
    /// The number of gene-pair connections in the block.
    pub block_length: usize,
}

/// A syntenic block: its connections in input order plus derived aggregates.
///
/// The chromosome pair and orientation come from the block's first
/// connection; a block whose connections disagree on the pair fails the load
/// with [`SyntenyMapError::InconsistentBlock`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub source_chromosome: String,
    pub target_chromosome: String,
    /// Whether the alignment orientation is `minus`.
    pub flipped: bool,
    pub connections: Vec<CollinearityRecord>,
    pub positions: BlockPositions,
}

impl Block {
    fn new(record: &CollinearityRecord) -> Block {
        Block {
            source_chromosome: record.source_chromosome.clone(),
            target_chromosome: record.target_chromosome.clone(),
            flipped: record.flipped,
            connections: Vec::new(),
            positions: BlockPositions::default(),
        }
    }
}

/// One side of the symmetric chromosome-pair adjacency index.
///
/// A chromosome's link to `partner` counts the distinct blocks joining the
/// pair in either direction; the mirrored link under `partner` carries the
/// same block identifiers. Self-pairs get a single link, counted once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairLink {
    pub partner: String,
    /// The number of distinct blocks joining the pair.
    pub block_count: usize,
    /// The contributing block identifiers, deduplicated, in first-seen order.
    pub block_ids: Vec<String>,
}

/// The full synteny data model built from annotation and collinearity input.
pub struct SyntenyMap {
    /// Per-chromosome spans, colors, and genome tags.
    pub chromosomes: GenomeMap<ChromosomeInfo>,
    /// Chromosome identifiers in ascending natural order.
    pub keys: Vec<String>,
    /// Genome partition tags (natural order) and their member chromosomes.
    pub partitions: IndexMap<String, Vec<String>>,
    /// Gene positions; duplicate gene identifiers keep the last entry.
    pub genes: IndexMap<String, Span>,
    /// Blocks keyed by identifier, in input order.
    pub blocks: IndexMap<String, Block>,
    /// Pair links per chromosome (symmetric; see [`PairLink`]).
    pub links: IndexMap<String, Vec<PairLink>>,
    /// The largest connection count across blocks; bounds the filter range.
    pub max_block_size: usize,
    color_mode: ColorMode,
}

/// Create or update the pair link from `from`'s perspective referencing `to`.
/// The count goes up only when the block is new for the pair.
fn add_pair_link(links: &mut IndexMap<String, Vec<PairLink>>, from: &str, to: &str, block: &str) {
    let entries = links.entry(from.to_string()).or_default();
    match entries.iter_mut().find(|link| link.partner == to) {
        Some(link) => {
            if !link.block_ids.iter().any(|id| id == block) {
                link.block_count += 1;
                link.block_ids.push(block.to_string());
            }
        }
        None => entries.push(PairLink {
            partner: to.to_string(),
            block_count: 1,
            block_ids: vec![block.to_string()],
        }),
    }
}

fn lookup_gene<'a>(
    index: &'a PositionIndex,
    block: &str,
    gene: &str,
) -> Result<&'a Span, SyntenyMapError> {
    index
        .genes
        .get(gene)
        .ok_or_else(|| SyntenyMapError::MissingGene {
            block: block.to_string(),
            gene: gene.to_string(),
        })
}

/// Derive a block's aggregate positions from the gene lookup.
fn aggregate_block(
    id: &str,
    block: &Block,
    index: &PositionIndex,
) -> Result<BlockPositions, SyntenyMapError> {
    let mut positions = BlockPositions {
        min_source: Position::MAX,
        max_source: 0,
        min_target: Position::MAX,
        max_target: 0,
        block_length: block.connections.len(),
    };
    for connection in &block.connections {
        let source = lookup_gene(index, id, &connection.source_gene)?;
        let target = lookup_gene(index, id, &connection.target_gene)?;
        positions.min_source = positions.min_source.min(source.start);
        positions.max_source = positions.max_source.max(source.end);
        positions.min_target = positions.min_target.min(target.start);
        positions.max_target = positions.max_target.max(target.end);
    }
    Ok(positions)
}

impl SyntenyMap {
    /// Create a new [`SyntenyMap`] from a gene-annotation file and an MCScanX
    /// collinearity file.
    ///
    /// This method also supports reading directly from gzip-compressed files.
    ///
    /// The annotation is tab-delimited: either the simplified four-column
    /// layout (`chrom  gene  start  end`) or nine-column GFF3. The
    /// collinearity file is MCScanX output, for example:
    ///
    /// ```text
    /// ## Alignment 0: score=4159.0 e_value=0 N=84 at1&at1 plus
    ///   0-  0:        AT1G17480       AT1G72300         7e-39
    ///   0-  1:        AT1G17490       AT1G72330         1e-71
    /// ```
    ///
    /// Every gene the collinearity file names must exist in the annotation;
    /// a miss fails the whole load with [`SyntenyMapError::MissingGene`] and
    /// no partial map is returned.
    pub fn from_files(annotation: &str, collinearity: &str) -> Result<SyntenyMap, SyntenyMapError> {
        let genes = read_annotation(annotation)?;
        let records = read_collinearity(collinearity)?;
        SyntenyMap::from_records(&genes, &records)
    }

    /// Load a dataset where either input may be absent.
    ///
    /// Both files are required to build a map; otherwise there is nothing to
    /// do and `Ok(None)` is returned.
    pub fn from_optional_files(
        annotation: Option<&str>,
        collinearity: Option<&str>,
    ) -> Result<Option<SyntenyMap>, SyntenyMapError> {
        match (annotation, collinearity) {
            (Some(annotation), Some(collinearity)) => {
                Ok(Some(SyntenyMap::from_files(annotation, collinearity)?))
            }
            _ => {
                debug!("annotation or collinearity input missing; nothing to load");
                Ok(None)
            }
        }
    }

    /// Build the synteny map from already-parsed records.
    ///
    /// Empty inputs yield an empty map. Any gene named by a block but absent
    /// from the annotation, a block mixing chromosome pairs, or a block on a
    /// chromosome the annotation never mentions fails the load; on failure no
    /// partial state is returned.
    pub fn from_records(
        genes: &[GeneRecord],
        records: &[CollinearityRecord],
    ) -> Result<SyntenyMap, SyntenyMapError> {
        let index = PositionIndex::from_records(genes);

        let seen: Vec<String> = index.chromosomes.keys().cloned().collect();
        let keys = sort_chromosome_keys(&seen);
        let partitions = partition_chromosome_keys(&keys);

        // block and pair indexing, one pass in input order
        let mut blocks: IndexMap<String, Block> = IndexMap::new();
        let mut links: IndexMap<String, Vec<PairLink>> = IndexMap::new();
        let mut max_block_size = 0;

        for record in records {
            let block = blocks
                .entry(record.block.clone())
                .or_insert_with(|| Block::new(record));
            if record.source_chromosome != block.source_chromosome
                || record.target_chromosome != block.target_chromosome
            {
                return Err(SyntenyMapError::InconsistentBlock(record.block.clone()));
            }
            block.connections.push(record.clone());
            max_block_size = max_block_size.max(block.connections.len());

            add_pair_link(
                &mut links,
                &record.source_chromosome,
                &record.target_chromosome,
                &record.block,
            );
            // self-pairs are counted once, from the source side only
            if record.source_chromosome != record.target_chromosome {
                add_pair_link(
                    &mut links,
                    &record.target_chromosome,
                    &record.source_chromosome,
                    &record.block,
                );
            }
        }

        // block position aggregation; any missing gene aborts the load
        for (id, block) in blocks.iter_mut() {
            block.positions = aggregate_block(id, block, &index)?;
        }

        // every block chromosome must come from the annotation too
        for block in blocks.values() {
            for chromosome in [&block.source_chromosome, &block.target_chromosome] {
                if !index.chromosomes.contains_key(chromosome) {
                    return Err(SyntenyMapError::NoChrom(chromosome.clone()));
                }
            }
        }

        // chromosome index with default colors
        let mut chromosomes: GenomeMap<ChromosomeInfo> = GenomeMap::new();
        let scale = OrdinalScale::new(Palette::default().colors());
        for (i, key) in keys.iter().enumerate() {
            let span = index
                .chromosomes
                .get(key)
                .ok_or_else(|| SyntenyMapError::NoChrom(key.clone()))?;
            chromosomes.insert(
                key,
                ChromosomeInfo {
                    span: *span,
                    color: scale.color(i),
                    tag: partition_tag(key),
                },
            )?;
        }

        debug!(
            "indexed {} chromosomes, {} genes, {} blocks (max block size {})",
            keys.len(),
            index.genes.len(),
            blocks.len(),
            max_block_size
        );

        Ok(SyntenyMap {
            chromosomes,
            keys,
            partitions,
            genes: index.genes,
            blocks,
            links,
            max_block_size,
            color_mode: ColorMode::default(),
        })
    }

    /// Return the number of chromosomes in the synteny map.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Return if the synteny map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over chromosome name and [`ChromosomeInfo`] tuples in natural
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ChromosomeInfo)> {
        self.keys
            .iter()
            .filter_map(|key| self.chromosomes.get(key).map(|info| (key, info)))
    }

    /// Look up one chromosome.
    pub fn chromosome(&self, name: &str) -> Result<&ChromosomeInfo, SyntenyMapError> {
        self.chromosomes
            .get(name)
            .ok_or_else(|| SyntenyMapError::NoChrom(name.to_string()))
    }

    /// Look up one block.
    pub fn block(&self, id: &str) -> Result<&Block, SyntenyMapError> {
        self.blocks
            .get(id)
            .ok_or_else(|| SyntenyMapError::NoBlock(id.to_string()))
    }

    /// The pair links for one chromosome, empty if it joins no blocks.
    pub fn pair_links(&self, name: &str) -> Result<&[PairLink], SyntenyMapError> {
        self.chromosome(name)?;
        Ok(self.links.get(name).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// The member chromosomes of one genome partition.
    pub fn genome(&self, tag: &str) -> Result<&[String], SyntenyMapError> {
        self.partitions
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| SyntenyMapError::NoGenome(tag.to_string()))
    }

    /// The color mode most recently applied by [`SyntenyMap::recolor`].
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Reassign chromosome colors under the given mode.
    ///
    /// Recoloring only ever touches the color field and is idempotent. The
    /// flip set is consulted by [`ColorMode::FlipState`] alone.
    pub fn recolor(&mut self, mode: ColorMode, flipped: &IndexSet<String>) {
        match mode {
            ColorMode::PerChromosome(palette) => {
                let scale = OrdinalScale::new(palette.colors());
                for (i, key) in self.keys.iter().enumerate() {
                    if let Some(info) = self.chromosomes.get_mut(key) {
                        info.color = scale.color(i);
                    }
                }
            }
            ColorMode::PerGenome(palette) => {
                let scale = OrdinalScale::new(palette.colors());
                for (g, members) in self.partitions.values().enumerate() {
                    let color = scale.color(g);
                    for key in members {
                        if let Some(info) = self.chromosomes.get_mut(key) {
                            info.color = color;
                        }
                    }
                }
            }
            ColorMode::FlipState => {
                for key in &self.keys {
                    let flip = flipped.contains(key);
                    if let Some(info) = self.chromosomes.get_mut(key) {
                        info.color = FLIP_STATE[usize::from(flip)];
                    }
                }
            }
        }
        self.color_mode = mode;
    }
}
