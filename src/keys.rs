//! Natural ordering and genome partitioning of chromosome identifiers.
//!
//! Chromosome names mix alphabetic prefixes and numbers (`chr2`, `chr10`,
//! `bn1`, `at5`), so plain lexicographic sorting puts `chr10` before `chr2`.
//! [`sort_chromosome_keys`] orders them numerically-aware instead, and
//! [`partition_chromosome_keys`] groups them by genome-of-origin for
//! multi-genome datasets, where each genome contributes its own identifier
//! prefix.

use indexmap::IndexMap;

/// The partition tag used for identifiers with no alphabetic part (e.g. plain
/// `1`, `2`, ... chromosome names from a single-genome dataset).
pub const DEFAULT_PARTITION: &str = "genome";

/// Sort chromosome identifiers in ascending natural order.
///
/// Natural order compares embedded integers numerically, so `chr2` sorts
/// before `chr10`. Duplicate identifiers are removed. The result is
/// deterministic: sorting the same set twice yields the same sequence.
pub fn sort_chromosome_keys(keys: &[String]) -> Vec<String> {
    let mut sorted = keys.to_vec();
    sorted.sort_by(|a, b| natord::compare(a, b));
    // equal keys are adjacent after sorting
    sorted.dedup();
    sorted
}

/// The genome-of-origin tag for one chromosome identifier.
///
/// The tag is the identifier with all ASCII digits removed (`bn12` -> `bn`,
/// `chr2` -> `chr`); identifiers that are purely numeric fall back to
/// [`DEFAULT_PARTITION`].
pub fn partition_tag(key: &str) -> String {
    let tag: String = key.chars().filter(|c| !c.is_ascii_digit()).collect();
    if tag.is_empty() {
        DEFAULT_PARTITION.to_string()
    } else {
        tag
    }
}

/// Partition sorted chromosome identifiers into genome-of-origin groups.
///
/// Each group is keyed by its [`partition_tag`]; group keys come back in
/// ascending natural order and members keep the order they were given in.
pub fn partition_chromosome_keys(keys: &[String]) -> IndexMap<String, Vec<String>> {
    let mut partitions: IndexMap<String, Vec<String>> = IndexMap::new();
    for key in keys {
        partitions
            .entry(partition_tag(key))
            .or_default()
            .push(key.clone());
    }
    partitions.sort_by(|tag_a, _, tag_b, _| natord::compare(tag_a, tag_b));
    partitions
}
