//! Graph-scoped metadata written by the relabeling and sort engines.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::label::Label;
use crate::value::{Rank, Value};

/// Label translation table.
pub type Mapping = BTreeMap<Label, Label>;

/// Metadata record owned by every graph.
///
/// Each field is absent until the engine that owns it first runs and is
/// overwritten, never merged, by every later run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    /// How to get back to the labeling in place before the last relabel.
    #[serde(default, with = "mapping_pairs")]
    pub mapping: Option<Mapping>,
    /// The mapping applied by the last relabel.
    #[serde(default, with = "mapping_pairs")]
    pub inverse_mapping: Option<Mapping>,
    /// Rank groups recorded by the last sort.
    pub sorting: Option<Sorting>,
    /// Free-form graph attributes; engines never touch these.
    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
}

// JSON object keys are always strings, which would turn integer labels into
// text on the way back. Mappings travel as `[old, new]` pairs instead.
mod mapping_pairs {
    use super::*;

    pub(super) fn serialize<S: Serializer>(
        mapping: &Option<Mapping>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        mapping
            .as_ref()
            .map(|mapping| mapping.iter().collect::<Vec<_>>())
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Mapping>, D::Error> {
        let pairs: Option<Vec<(Label, Label)>> = Option::deserialize(deserializer)?;
        Ok(pairs.map(|pairs| pairs.into_iter().collect()))
    }
}

/// Nodes sharing one rank value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankGroup {
    /// Shared rank.
    pub rank: Rank,
    /// Members in sorted order.
    pub nodes: Vec<Label>,
}

/// Partition of the node set into rank groups, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sorting {
    groups: Vec<RankGroup>,
}

impl Sorting {
    /// Groups nodes by rank, keeping the order in which ranks are first seen.
    pub fn from_ranked<I>(ranked: I) -> Self
    where
        I: IntoIterator<Item = (Label, Rank)>,
    {
        let mut groups: Vec<RankGroup> = Vec::new();
        let mut index: BTreeMap<Rank, usize> = BTreeMap::new();
        for (node, rank) in ranked {
            match index.get(&rank) {
                Some(&slot) => groups[slot].nodes.push(node),
                None => {
                    index.insert(rank.clone(), groups.len());
                    groups.push(RankGroup {
                        rank,
                        nodes: vec![node],
                    });
                }
            }
        }
        Self { groups }
    }

    /// Returns the members of the group with the provided rank.
    pub fn get(&self, rank: &Rank) -> Option<&[Label]> {
        self.groups
            .iter()
            .find(|group| &group.rank == rank)
            .map(|group| group.nodes.as_slice())
    }

    /// Returns all groups in sorted order.
    pub fn groups(&self) -> &[RankGroup] {
        &self.groups
    }

    /// Returns the number of distinct ranks.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when no group was recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over every member across all groups.
    pub fn members(&self) -> impl Iterator<Item = &Label> + '_ {
        self.groups.iter().flat_map(|group| group.nodes.iter())
    }
}
