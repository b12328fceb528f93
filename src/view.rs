//! Interactive view state and the derivation of visible arcs and chords.
//!
//! A [`ViewState`] is created per loaded [`SyntenyMap`] and mutated only
//! through [`ViewState::apply`], which dispatches [`Action`] values (one per
//! user interaction). The derivations [`ViewState::layout`] and
//! [`ViewState::chords`] are pure functions of the state and the map: they
//! recompute their output from scratch on every call, so they stay
//! consistent under any interleaving of actions.

use indexmap::set::IndexSet;
use rgb::RGB8;
use serde::{Deserialize, Serialize};

use crate::annotation::{Position, Span};
use crate::synteny::{SyntenyMap, SyntenyMapError};

/// Comparison direction for the block connection-count filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    AtLeast,
    AtMost,
}

/// A numeric filter on a block's connection count.
///
/// The useful threshold range for a dataset is `1..=max_block_size`
/// ([`SyntenyMap::max_block_size`]); thresholds outside it are legal and
/// simply pass everything or nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFilter {
    pub threshold: usize,
    pub mode: FilterMode,
}

impl Default for BlockFilter {
    fn default() -> Self {
        BlockFilter {
            threshold: 1,
            mode: FilterMode::AtLeast,
        }
    }
}

impl BlockFilter {
    /// Whether a block with the given connection count passes the filter.
    pub fn passes(&self, connections: usize) -> bool {
        match self.mode {
            FilterMode::AtLeast => connections >= self.threshold,
            FilterMode::AtMost => connections <= self.threshold,
        }
    }
}

/// The order chords are emitted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordOrder {
    /// Collinearity input order.
    #[default]
    InputOrder,
    /// Natural order of block identifiers.
    BlockId,
    /// Number of connections in the block.
    BlockLength,
}

/// One visible chromosome arc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeArc {
    pub id: String,
    /// The arc length: the chromosome's maximum gene end.
    pub len: Position,
    pub color: RGB8,
    /// Whether the chromosome is currently drawn reversed.
    pub flipped: bool,
}

/// One end of a chord, with flip-adjusted coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordEnd {
    pub id: String,
    pub start: Position,
    pub end: Position,
}

/// One visible syntenic chord.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChord {
    /// The block this chord draws.
    pub block: String,
    /// The number of connections in the block.
    pub length: usize,
    pub source: ChordEnd,
    pub target: ChordEnd,
    /// The block's orientation flag, for flip highlighting.
    pub flipped: bool,
}

/// The derived chord set for the current view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordSet {
    pub chords: Vec<DataChord>,
    /// Whether the currently selected block is still visible. When a block
    /// is selected and this is `false`, the caller should close any open
    /// block detail view.
    pub selected_block_visible: bool,
}

/// Mirror a coordinate range onto a reversed chromosome:
/// `new_start = chromosome_end - old_end`, `new_end = chromosome_end -
/// old_start`. Applying the mirror twice returns the original range.
pub fn mirror_span(chromosome_end: Position, span: Span) -> Span {
    Span {
        start: chromosome_end.saturating_sub(span.end),
        end: chromosome_end.saturating_sub(span.start),
    }
}

/// A user interaction, dispatched through [`ViewState::apply`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Add a chromosome to the selection.
    SelectChromosome(String),
    /// Remove a chromosome from the selection.
    DeselectChromosome(String),
    ClearSelection,
    SetShowAll(bool),
    /// Reverse a chromosome's display orientation.
    ToggleFlip(String),
    SetFilter(BlockFilter),
    SetChordOrder {
        order: ChordOrder,
        descending: bool,
    },
    /// Set the diagram rotation in degrees (wrapped into `0..360`).
    SetRotation(u16),
    /// Show or hide chords that begin and end on the same chromosome.
    SetShowSelfChr(bool),
    /// Show or hide chords joining two chromosomes of the same genome.
    SetShowSelfGenome(bool),
    SetHighlightFlippedBlocks(bool),
    SetHighlightFlippedChromosomes(bool),
    /// Open a block's detail view.
    SelectBlock(String),
    ClearBlockSelection,
    /// Replace the chromosome order with a new permutation of the keys.
    SetOrder(Vec<String>),
    /// Reverse the relative order of one genome's chromosomes.
    FlipGenomeOrder(String),
    /// Restore one genome's chromosomes to their default relative order.
    ResetGenomeOrder(String),
    /// Restore the default order and clear all flips.
    ResetLayout,
}

/// The interactive view state for one loaded dataset.
///
/// Create it with [`ViewState::new`] after a [`SyntenyMap`] load and mutate
/// it exclusively through [`ViewState::apply`]; actions naming chromosomes,
/// blocks, or genomes are validated against the map before any field
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    /// Current chromosome display order.
    pub order: Vec<String>,
    default_order: Vec<String>,
    /// Chromosomes currently drawn reversed.
    pub flipped: IndexSet<String>,
    /// Current chromosome multi-selection.
    pub selection: IndexSet<String>,
    /// Show every chromosome regardless of the selection.
    pub show_all: bool,
    pub show_self_chr: bool,
    pub show_self_genome: bool,
    pub filter: BlockFilter,
    pub chord_order: ChordOrder,
    pub chord_descending: bool,
    /// Diagram rotation in degrees, `0..360`.
    pub rotation: u16,
    pub highlight_flipped_blocks: bool,
    pub highlight_flipped_chromosomes: bool,
    /// The block whose detail view is open, if any.
    pub selected_block: Option<String>,
}

fn same_genome(map: &SyntenyMap, a: &str, b: &str) -> bool {
    match (map.chromosomes.get(a), map.chromosomes.get(b)) {
        (Some(a), Some(b)) => a.tag == b.tag,
        _ => false,
    }
}

impl ViewState {
    /// The default view for a loaded map: natural chromosome order, no
    /// flips, no selection, show-all on, filter at-least 1.
    pub fn new(map: &SyntenyMap) -> ViewState {
        ViewState {
            order: map.keys.clone(),
            default_order: map.keys.clone(),
            flipped: IndexSet::new(),
            selection: IndexSet::new(),
            show_all: true,
            show_self_chr: true,
            show_self_genome: true,
            filter: BlockFilter::default(),
            chord_order: ChordOrder::default(),
            chord_descending: false,
            rotation: 0,
            highlight_flipped_blocks: false,
            highlight_flipped_chromosomes: true,
            selected_block: None,
        }
    }

    /// The default (natural-sorted) chromosome order.
    pub fn default_order(&self) -> &[String] {
        &self.default_order
    }

    /// Apply one action, validating it against the map.
    ///
    /// On error the state is left unchanged.
    pub fn apply(&mut self, map: &SyntenyMap, action: Action) -> Result<(), SyntenyMapError> {
        match action {
            Action::SelectChromosome(name) => {
                map.chromosome(&name)?;
                self.selection.insert(name);
            }
            Action::DeselectChromosome(name) => {
                map.chromosome(&name)?;
                self.selection.shift_remove(&name);
            }
            Action::ClearSelection => self.selection.clear(),
            Action::SetShowAll(show_all) => self.show_all = show_all,
            Action::ToggleFlip(name) => {
                map.chromosome(&name)?;
                if !self.flipped.shift_remove(&name) {
                    self.flipped.insert(name);
                }
            }
            Action::SetFilter(filter) => self.filter = filter,
            Action::SetChordOrder { order, descending } => {
                self.chord_order = order;
                self.chord_descending = descending;
            }
            Action::SetRotation(degrees) => self.rotation = degrees % 360,
            Action::SetShowSelfChr(show) => self.show_self_chr = show,
            Action::SetShowSelfGenome(show) => self.show_self_genome = show,
            Action::SetHighlightFlippedBlocks(highlight) => {
                self.highlight_flipped_blocks = highlight
            }
            Action::SetHighlightFlippedChromosomes(highlight) => {
                self.highlight_flipped_chromosomes = highlight
            }
            Action::SelectBlock(id) => {
                map.block(&id)?;
                self.selected_block = Some(id);
            }
            Action::ClearBlockSelection => self.selected_block = None,
            Action::SetOrder(order) => self.set_order(map, order)?,
            Action::FlipGenomeOrder(tag) => {
                let members = map.genome(&tag)?;
                self.reorder_members(members, true);
            }
            Action::ResetGenomeOrder(tag) => {
                let members = map.genome(&tag)?;
                self.reorder_members(members, false);
            }
            Action::ResetLayout => {
                self.order = self.default_order.clone();
                self.flipped.clear();
            }
        }
        Ok(())
    }

    fn set_order(&mut self, map: &SyntenyMap, order: Vec<String>) -> Result<(), SyntenyMapError> {
        if order.len() != map.len() {
            return Err(SyntenyMapError::InvalidOrder);
        }
        let mut seen = IndexSet::new();
        for name in &order {
            map.chromosome(name)?;
            if !seen.insert(name.as_str()) {
                return Err(SyntenyMapError::InvalidOrder);
            }
        }
        self.order = order;
        Ok(())
    }

    /// Rewrite the positions occupied by `members` within the current order,
    /// either reversing them or restoring their default relative order.
    fn reorder_members(&mut self, members: &[String], reverse: bool) {
        let positions: Vec<usize> = (0..self.order.len())
            .filter(|&i| members.contains(&self.order[i]))
            .collect();

        let replacement: Vec<String> = if reverse {
            positions
                .iter()
                .rev()
                .map(|&i| self.order[i].clone())
                .collect()
        } else {
            self.default_order
                .iter()
                .filter(|name| members.contains(name))
                .cloned()
                .collect()
        };

        for (&i, name) in positions.iter().zip(replacement) {
            self.order[i] = name;
        }
    }

    /// Zero or every chromosome selected behaves the same as show-all.
    fn effective_show_all(&self, map: &SyntenyMap) -> bool {
        self.show_all || self.selection.is_empty() || self.selection.len() == map.len()
    }

    /// Derive the ordered sequence of visible chromosome arcs.
    ///
    /// The current order is preserved exactly; reordering only ever happens
    /// through actions, never as a side effect of derivation.
    pub fn layout(&self, map: &SyntenyMap) -> Vec<ChromosomeArc> {
        let show_all = self.effective_show_all(map);
        let mut arcs = Vec::new();
        for name in &self.order {
            if !show_all && !self.selection.contains(name) {
                continue;
            }
            let info = match map.chromosomes.get(name) {
                Some(info) => info,
                None => continue,
            };
            arcs.push(ChromosomeArc {
                id: name.clone(),
                len: info.span.end,
                color: info.color,
                flipped: self.flipped.contains(name),
            });
        }
        arcs
    }

    /// Derive the visible chord set.
    ///
    /// Each block is visited once, in input order. With exactly one
    /// chromosome selected ("one-to-many"), show-all admits a block touching
    /// the selection on either side, otherwise both sides must match. With
    /// any other selection ("many-to-many"), show-all (or a degenerate
    /// selection) admits every block, otherwise both sides must be selected.
    /// Surviving blocks then pass the connection-count filter and the
    /// self-connection toggles; coordinates of flipped chromosomes are
    /// mirrored.
    pub fn chords(&self, map: &SyntenyMap) -> ChordSet {
        let one_to_many = self.selection.len() == 1;
        let show_all = self.effective_show_all(map);

        let mut chords = Vec::new();
        for (id, block) in map.blocks.iter() {
            let source = &block.source_chromosome;
            let target = &block.target_chromosome;

            let included = if one_to_many {
                let source_selected = self.selection.contains(source);
                let target_selected = self.selection.contains(target);
                if self.show_all {
                    source_selected || target_selected
                } else {
                    source_selected && target_selected
                }
            } else if show_all {
                true
            } else {
                self.selection.contains(source) && self.selection.contains(target)
            };
            if !included {
                continue;
            }
            if !self.filter.passes(block.connections.len()) {
                continue;
            }
            if !self.show_self_chr && source == target {
                continue;
            }
            if !self.show_self_genome && source != target && same_genome(map, source, target) {
                continue;
            }

            let source_info = match map.chromosomes.get(source) {
                Some(info) => info,
                None => continue,
            };
            let target_info = match map.chromosomes.get(target) {
                Some(info) => info,
                None => continue,
            };

            let positions = &block.positions;
            let source_end = self.chord_end(
                source,
                source_info.span.end,
                positions.min_source,
                positions.max_source,
            );
            let target_end = self.chord_end(
                target,
                target_info.span.end,
                positions.min_target,
                positions.max_target,
            );

            chords.push(DataChord {
                block: id.clone(),
                length: positions.block_length,
                source: source_end,
                target: target_end,
                flipped: block.flipped,
            });
        }

        match self.chord_order {
            ChordOrder::InputOrder => {
                if self.chord_descending {
                    chords.reverse();
                }
            }
            ChordOrder::BlockId => {
                if self.chord_descending {
                    chords.sort_by(|a, b| natord::compare(&b.block, &a.block));
                } else {
                    chords.sort_by(|a, b| natord::compare(&a.block, &b.block));
                }
            }
            ChordOrder::BlockLength => {
                if self.chord_descending {
                    chords.sort_by(|a, b| b.length.cmp(&a.length));
                } else {
                    chords.sort_by(|a, b| a.length.cmp(&b.length));
                }
            }
        }

        let selected_block_visible = match &self.selected_block {
            Some(selected) => chords.iter().any(|chord| &chord.block == selected),
            None => false,
        };

        ChordSet {
            chords,
            selected_block_visible,
        }
    }

    fn chord_end(
        &self,
        id: &str,
        chromosome_end: Position,
        min: Position,
        max: Position,
    ) -> ChordEnd {
        let mut span = Span {
            start: min,
            end: max,
        };
        if self.flipped.contains(id) {
            span = mirror_span(chromosome_end, span);
        }
        ChordEnd {
            id: id.to_string(),
            start: span.start,
            end: span.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::GeneRecord;
    use crate::collinearity::CollinearityRecord;

    fn gene(chromosome: &str, gene: &str, start: Position, end: Position) -> GeneRecord {
        GeneRecord {
            chromosome: chromosome.to_string(),
            gene: gene.to_string(),
            start,
            end,
        }
    }

    fn connection(
        block: &str,
        connection: &str,
        source_chromosome: &str,
        source_gene: &str,
        target_chromosome: &str,
        target_gene: &str,
    ) -> CollinearityRecord {
        CollinearityRecord {
            block: block.to_string(),
            connection: connection.to_string(),
            source_gene: source_gene.to_string(),
            target_gene: target_gene.to_string(),
            source_chromosome: source_chromosome.to_string(),
            target_chromosome: target_chromosome.to_string(),
            score: 100.0,
            block_e_value: 0.0,
            connection_e_value: 1e-10,
            flipped: false,
        }
    }

    /// Two genomes (at1, at2, bn1) and four blocks:
    /// "0" at1-at2 (2 connections), "1" at1-at1 (1), "2" at2-bn1 (1),
    /// "3" at1-bn1 (3).
    fn fixture() -> SyntenyMap {
        let genes = vec![
            gene("at1", "a1", 0, 100),
            gene("at1", "a2", 400, 500),
            gene("at2", "b1", 50, 150),
            gene("at2", "b2", 600, 800),
            gene("bn1", "c1", 10, 90),
            gene("bn1", "c2", 200, 300),
        ];
        let records = vec![
            connection("0", "0", "at1", "a1", "at2", "b1"),
            connection("0", "1", "at1", "a2", "at2", "b2"),
            connection("1", "0", "at1", "a1", "at1", "a2"),
            connection("2", "0", "at2", "b1", "bn1", "c1"),
            connection("3", "0", "at1", "a1", "bn1", "c1"),
            connection("3", "1", "at1", "a2", "bn1", "c2"),
            connection("3", "2", "at1", "a1", "bn1", "c2"),
        ];
        SyntenyMap::from_records(&genes, &records).unwrap()
    }

    fn chord_blocks(view: &ViewState, map: &SyntenyMap) -> Vec<String> {
        view.chords(map)
            .chords
            .iter()
            .map(|chord| chord.block.clone())
            .collect()
    }

    #[test]
    fn test_default_view_shows_everything() {
        let map = fixture();
        let view = ViewState::new(&map);

        assert_eq!(chord_blocks(&view, &map), ["0", "1", "2", "3"]);

        let arcs = view.layout(&map);
        let ids: Vec<&str> = arcs.iter().map(|arc| arc.id.as_str()).collect();
        assert_eq!(ids, ["at1", "at2", "bn1"]);
        assert_eq!(arcs[0].len, 500);
        assert!(!arcs[0].flipped);
    }

    #[test]
    fn test_show_all_ignores_wider_selection() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SelectChromosome("at2".to_string()))
            .unwrap();
        view.apply(&map, Action::SelectChromosome("bn1".to_string()))
            .unwrap();

        // show-all stays on: every block is still emitted
        assert_eq!(chord_blocks(&view, &map), ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_one_to_many_selection() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SelectChromosome("at1".to_string()))
            .unwrap();

        // show-all on: either side touching at1 is enough
        assert_eq!(chord_blocks(&view, &map), ["0", "1", "3"]);

        // show-all off: both sides must be at1
        view.apply(&map, Action::SetShowAll(false)).unwrap();
        assert_eq!(chord_blocks(&view, &map), ["1"]);
    }

    #[test]
    fn test_many_to_many_selection() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SetShowAll(false)).unwrap();
        view.apply(&map, Action::SelectChromosome("at1".to_string()))
            .unwrap();
        view.apply(&map, Action::SelectChromosome("at2".to_string()))
            .unwrap();

        assert_eq!(chord_blocks(&view, &map), ["0", "1"]);
    }

    #[test]
    fn test_degenerate_selections_behave_like_show_all() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SetShowAll(false)).unwrap();

        // nothing selected
        assert_eq!(chord_blocks(&view, &map), ["0", "1", "2", "3"]);
        assert_eq!(view.layout(&map).len(), 3);

        // everything selected
        for name in ["at1", "at2", "bn1"] {
            view.apply(&map, Action::SelectChromosome(name.to_string()))
                .unwrap();
        }
        assert_eq!(chord_blocks(&view, &map), ["0", "1", "2", "3"]);
        assert_eq!(view.layout(&map).len(), 3);
    }

    #[test]
    fn test_layout_follows_selection() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SetShowAll(false)).unwrap();
        view.apply(&map, Action::SelectChromosome("bn1".to_string()))
            .unwrap();

        let arcs = view.layout(&map);
        assert_eq!(arcs.len(), 1);
        assert_eq!(arcs[0].id, "bn1");
        assert_eq!(arcs[0].len, 300);
    }

    #[test]
    fn test_filter_modes() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        view.apply(
            &map,
            Action::SetFilter(BlockFilter {
                threshold: 2,
                mode: FilterMode::AtLeast,
            }),
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["0", "3"]);

        view.apply(
            &map,
            Action::SetFilter(BlockFilter {
                threshold: 2,
                mode: FilterMode::AtMost,
            }),
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["0", "1", "2"]);
    }

    #[test]
    fn test_filter_monotonicity() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        let mut last = usize::MAX;
        for threshold in 1..=map.max_block_size + 1 {
            view.apply(
                &map,
                Action::SetFilter(BlockFilter {
                    threshold,
                    mode: FilterMode::AtLeast,
                }),
            )
            .unwrap();
            let count = view.chords(&map).chords.len();
            assert!(count <= last);
            last = count;
        }

        let mut last = 0;
        for threshold in 1..=map.max_block_size + 1 {
            view.apply(
                &map,
                Action::SetFilter(BlockFilter {
                    threshold,
                    mode: FilterMode::AtMost,
                }),
            )
            .unwrap();
            let count = view.chords(&map).chords.len();
            assert!(count >= last);
            last = count;
        }
    }

    #[test]
    fn test_mirror_span_is_an_involution() {
        let span = Span { start: 10, end: 50 };
        let mirrored = mirror_span(500, span);
        assert_eq!(
            mirrored,
            Span {
                start: 450,
                end: 490
            }
        );
        assert_eq!(mirror_span(500, mirrored), span);
    }

    #[test]
    fn test_flipped_chromosome_mirrors_coordinates() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::ToggleFlip("at2".to_string()))
            .unwrap();

        let chord_set = view.chords(&map);
        let block0 = chord_set
            .chords
            .iter()
            .find(|chord| chord.block == "0")
            .unwrap();

        // source side (at1) is untouched
        assert_eq!(
            block0.source,
            ChordEnd {
                id: "at1".to_string(),
                start: 0,
                end: 500,
            }
        );
        // target side (at2, end 800) is mirrored: 800-800..800-50
        assert_eq!(
            block0.target,
            ChordEnd {
                id: "at2".to_string(),
                start: 0,
                end: 750,
            }
        );
    }

    #[test]
    fn test_toggle_flip_twice_restores_coordinates() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        let before = view.chords(&map);

        view.apply(&map, Action::ToggleFlip("at1".to_string()))
            .unwrap();
        view.apply(&map, Action::ToggleFlip("at1".to_string()))
            .unwrap();
        assert!(view.flipped.is_empty());
        assert_eq!(view.chords(&map), before);
    }

    #[test]
    fn test_selected_block_tracking() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SelectBlock("3".to_string()))
            .unwrap();
        assert!(view.chords(&map).selected_block_visible);

        // filtering block "3" (3 connections) out should tell the caller to
        // close the detail view
        view.apply(
            &map,
            Action::SetFilter(BlockFilter {
                threshold: 1,
                mode: FilterMode::AtMost,
            }),
        )
        .unwrap();
        assert!(!view.chords(&map).selected_block_visible);
    }

    #[test]
    fn test_actions_validate_names() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        let result = view.apply(&map, Action::SelectChromosome("nope".to_string()));
        assert!(matches!(result, Err(SyntenyMapError::NoChrom(_))));

        let result = view.apply(&map, Action::SelectBlock("nope".to_string()));
        assert!(matches!(result, Err(SyntenyMapError::NoBlock(_))));

        let result = view.apply(&map, Action::FlipGenomeOrder("xx".to_string()));
        assert!(matches!(result, Err(SyntenyMapError::NoGenome(_))));

        // nothing changed
        assert_eq!(view, ViewState::new(&map));
    }

    #[test]
    fn test_set_order() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        let reversed = vec!["bn1".to_string(), "at2".to_string(), "at1".to_string()];
        view.apply(&map, Action::SetOrder(reversed.clone())).unwrap();
        assert_eq!(view.order, reversed);

        let arcs = view.layout(&map);
        let ids: Vec<&str> = arcs.iter().map(|arc| arc.id.as_str()).collect();
        assert_eq!(ids, ["bn1", "at2", "at1"]);

        // not a permutation: too short, duplicated, unknown
        let result = view.apply(&map, Action::SetOrder(vec!["at1".to_string()]));
        assert!(matches!(result, Err(SyntenyMapError::InvalidOrder)));

        let result = view.apply(
            &map,
            Action::SetOrder(vec![
                "at1".to_string(),
                "at1".to_string(),
                "bn1".to_string(),
            ]),
        );
        assert!(matches!(result, Err(SyntenyMapError::InvalidOrder)));

        let result = view.apply(
            &map,
            Action::SetOrder(vec![
                "at1".to_string(),
                "at2".to_string(),
                "nope".to_string(),
            ]),
        );
        assert!(matches!(result, Err(SyntenyMapError::NoChrom(_))));

        // failed actions leave the order as it was
        assert_eq!(view.order, reversed);
    }

    #[test]
    fn test_genome_order_flip_and_reset() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        view.apply(&map, Action::FlipGenomeOrder("at".to_string()))
            .unwrap();
        assert_eq!(view.order, ["at2", "at1", "bn1"]);

        view.apply(&map, Action::FlipGenomeOrder("at".to_string()))
            .unwrap();
        assert_eq!(view.order, ["at1", "at2", "bn1"]);

        view.apply(&map, Action::FlipGenomeOrder("at".to_string()))
            .unwrap();
        view.apply(&map, Action::ResetGenomeOrder("at".to_string()))
            .unwrap();
        assert_eq!(view.order, ["at1", "at2", "bn1"]);
    }

    #[test]
    fn test_reset_layout() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(
            &map,
            Action::SetOrder(vec![
                "bn1".to_string(),
                "at1".to_string(),
                "at2".to_string(),
            ]),
        )
        .unwrap();
        view.apply(&map, Action::ToggleFlip("bn1".to_string()))
            .unwrap();

        view.apply(&map, Action::ResetLayout).unwrap();
        assert_eq!(view.order, ["at1", "at2", "bn1"]);
        assert!(view.flipped.is_empty());
    }

    #[test]
    fn test_chord_order_modes() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        view.apply(
            &map,
            Action::SetChordOrder {
                order: ChordOrder::BlockLength,
                descending: false,
            },
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["1", "2", "0", "3"]);

        view.apply(
            &map,
            Action::SetChordOrder {
                order: ChordOrder::BlockLength,
                descending: true,
            },
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["3", "0", "1", "2"]);

        view.apply(
            &map,
            Action::SetChordOrder {
                order: ChordOrder::BlockId,
                descending: true,
            },
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["3", "2", "1", "0"]);

        view.apply(
            &map,
            Action::SetChordOrder {
                order: ChordOrder::InputOrder,
                descending: true,
            },
        )
        .unwrap();
        assert_eq!(chord_blocks(&view, &map), ["3", "2", "1", "0"]);
    }

    #[test]
    fn test_self_connection_toggles() {
        let map = fixture();
        let mut view = ViewState::new(&map);

        view.apply(&map, Action::SetShowSelfChr(false)).unwrap();
        assert_eq!(chord_blocks(&view, &map), ["0", "2", "3"]);

        view.apply(&map, Action::SetShowSelfChr(true)).unwrap();
        view.apply(&map, Action::SetShowSelfGenome(false)).unwrap();
        // block "0" joins at1 and at2, both in genome "at"
        assert_eq!(chord_blocks(&view, &map), ["1", "2", "3"]);

        view.apply(&map, Action::SetShowSelfChr(false)).unwrap();
        assert_eq!(chord_blocks(&view, &map), ["2", "3"]);
    }

    #[test]
    fn test_rotation_wraps() {
        let map = fixture();
        let mut view = ViewState::new(&map);
        view.apply(&map, Action::SetRotation(400)).unwrap();
        assert_eq!(view.rotation, 40);
    }

    #[test]
    fn test_default_state() {
        let map = fixture();
        let view = ViewState::new(&map);

        assert_eq!(view.order, map.keys);
        assert_eq!(view.default_order(), map.keys.as_slice());
        assert!(view.show_all);
        assert!(view.show_self_chr);
        assert!(view.show_self_genome);
        assert_eq!(view.filter, BlockFilter::default());
        assert_eq!(view.filter.threshold, 1);
        assert_eq!(view.rotation, 0);
        assert!(!view.highlight_flipped_blocks);
        assert!(view.highlight_flipped_chromosomes);
        assert!(view.selected_block.is_none());
        assert!(view.selection.is_empty());
        assert!(view.flipped.is_empty());
    }
}
