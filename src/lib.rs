//! Functionality for reading and working with genome synteny maps.
//!
//! A [`SyntenyMap`] is built from a gene-annotation (GFF) file and an
//! MCScanX-style collinearity file describing syntenic blocks between
//! chromosomes, optionally across multiple genomes. It indexes chromosome
//! spans, gene positions, blocks with aggregate coordinates, and the
//! symmetric chromosome-pair connection graph. A [`ViewState`] then carries
//! the interactive state (selection, flips, ordering, filtering) and derives
//! the visible chromosome arcs and syntenic chords for a renderer.
//!
//! Here is an example which loads a dataset and prints every chord touching
//! chromosome `at1`:
//!
//! ```no_run
//! use syntenymap::prelude::*;
//!
//! let map = SyntenyMap::from_files("genes.gff", "genome.collinearity")
//!     .expect("cannot read synteny data");
//!
//! let mut view = ViewState::new(&map);
//! view.apply(&map, Action::SelectChromosome("at1".to_string()))
//!     .expect("unknown chromosome");
//!
//! for chord in view.chords(&map).chords {
//!     println!(
//!         "{}\t{}:{}-{}\t{}:{}-{}",
//!         chord.block,
//!         chord.source.id, chord.source.start, chord.source.end,
//!         chord.target.id, chord.target.start, chord.target.end,
//!     );
//! }
//! ```
//!
//! Filtering and reordering go through the same [`Action`] dispatch:
//!
//! ```no_run
//! use syntenymap::prelude::*;
//!
//! let map = SyntenyMap::from_files("genes.gff", "genome.collinearity")
//!     .expect("cannot read synteny data");
//! let mut view = ViewState::new(&map);
//!
//! // keep only blocks with at least five gene pairs, largest first
//! view.apply(&map, Action::SetFilter(BlockFilter {
//!     threshold: 5,
//!     mode: FilterMode::AtLeast,
//! })).expect("invalid action");
//! view.apply(&map, Action::SetChordOrder {
//!     order: ChordOrder::BlockLength,
//!     descending: true,
//! }).expect("invalid action");
//!
//! let chords = view.chords(&map);
//! println!("{} chords visible", chords.chords.len());
//! ```

pub mod annotation;
pub mod collinearity;
pub mod file;
pub mod keys;
pub mod palette;
pub mod synteny;
pub mod view;

pub use annotation::{read_annotation, GeneRecord, Position, PositionIndex, Span};
pub use collinearity::{parse_collinearity, read_collinearity, CollinearityRecord};
pub use synteny::{Block, BlockPositions, ChromosomeInfo, PairLink, SyntenyMap, SyntenyMapError};
pub use view::{
    Action, BlockFilter, ChordEnd, ChordOrder, ChordSet, ChromosomeArc, DataChord, FilterMode,
    ViewState,
};

pub mod prelude {
    pub use crate::annotation::{read_annotation, GeneRecord, Position, PositionIndex, Span};
    pub use crate::collinearity::{parse_collinearity, read_collinearity, CollinearityRecord};
    pub use crate::keys::{partition_chromosome_keys, partition_tag, sort_chromosome_keys};
    pub use crate::palette::{ColorMode, OrdinalScale, Palette};
    pub use crate::synteny::{
        Block, BlockPositions, ChromosomeInfo, PairLink, SyntenyMap, SyntenyMapError,
    };
    pub use crate::view::{
        mirror_span, Action, BlockFilter, ChordEnd, ChordOrder, ChordSet, ChromosomeArc,
        DataChord, FilterMode, ViewState,
    };
}

#[cfg(test)]
mod tests {}
