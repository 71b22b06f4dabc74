use std::fmt;
use std::sync::Arc;

use netm_core::{AttrSet, EdgeTriple, Label, MultiGraph, NmError, Rank, Value};
use serde::{Deserialize, Serialize};

/// Labels the `index`-th fresh trunk node grown from `root`.
pub type LabelFn = Arc<dyn Fn(&dyn MultiGraph, &Label, usize) -> Label + Send + Sync>;

/// Produces the primary sort value of a node.
pub type NodeFn =
    Arc<dyn Fn(&dyn MultiGraph, &Label, &[Value]) -> Result<Rank, NmError> + Send + Sync>;

/// Refines node order given the node and its primary rank.
pub type NodeKeyFn = Arc<dyn Fn(&Label, &Rank) -> Rank + Send + Sync>;

/// Produces the primary sort value of an edge.
pub type EdgeFn =
    Arc<dyn Fn(&dyn MultiGraph, &EdgeTriple, &[Value]) -> Result<Rank, NmError> + Send + Sync>;

/// Refines edge order given the edge and its primary rank.
pub type EdgeKeyFn = Arc<dyn Fn(&EdgeTriple, &Rank) -> Rank + Send + Sync>;

/// Options for [`convert_edges`](crate::convert_edges).
#[derive(Clone)]
pub struct ExpandOptions {
    /// Values applied to every fresh trunk node.
    pub node_data: AttrSet,
    /// Values applied to every trunk edge.
    pub edge_data: AttrSet,
    /// Fresh node labeling; defaults to the unused integers counting up from
    /// `node_count`.
    pub label: Option<LabelFn>,
    /// Key given to `(source, target)` pairs during normalization.
    pub default_key: Label,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            node_data: AttrSet::new(),
            edge_data: AttrSet::new(),
            label: None,
            default_key: Label::Int(0),
        }
    }
}

impl ExpandOptions {
    /// Sets the labeling function for fresh nodes.
    pub fn with_label<F>(mut self, label: F) -> Self
    where
        F: Fn(&dyn MultiGraph, &Label, usize) -> Label + Send + Sync + 'static,
    {
        self.label = Some(Arc::new(label));
        self
    }
}

impl fmt::Debug for ExpandOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandOptions")
            .field("node_data", &self.node_data)
            .field("edge_data", &self.edge_data)
            .field("label", &self.label.as_ref().map(|_| "<fn>"))
            .field("default_key", &self.default_key)
            .finish()
    }
}

/// Primary node ordering.
#[derive(Clone)]
pub enum NodeCriterion {
    /// A graph accessor resolved by name: `in_degree`, `out_degree`,
    /// `degree`, `label`, or `attr` (attribute named by the first argument).
    Named(String),
    /// Caller-supplied function.
    Func(NodeFn),
}

impl NodeCriterion {
    /// Criterion resolved by accessor name.
    pub fn named(name: impl Into<String>) -> Self {
        NodeCriterion::Named(name.into())
    }

    /// Criterion computed by `func`.
    pub fn func<F>(func: F) -> Self
    where
        F: Fn(&dyn MultiGraph, &Label, &[Value]) -> Result<Rank, NmError> + Send + Sync + 'static,
    {
        NodeCriterion::Func(Arc::new(func))
    }
}

impl fmt::Debug for NodeCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeCriterion::Named(name) => f.debug_tuple("Named").field(name).finish(),
            NodeCriterion::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

/// Primary edge ordering.
#[derive(Clone)]
pub enum EdgeCriterion {
    /// A graph accessor resolved by name: `source`, `target`, `key`, or
    /// `attr` (attribute named by the first argument).
    Named(String),
    /// Caller-supplied function.
    Func(EdgeFn),
}

impl EdgeCriterion {
    /// Criterion resolved by accessor name.
    pub fn named(name: impl Into<String>) -> Self {
        EdgeCriterion::Named(name.into())
    }

    /// Criterion computed by `func`.
    pub fn func<F>(func: F) -> Self
    where
        F: Fn(&dyn MultiGraph, &EdgeTriple, &[Value]) -> Result<Rank, NmError>
            + Send
            + Sync
            + 'static,
    {
        EdgeCriterion::Func(Arc::new(func))
    }
}

impl fmt::Debug for EdgeCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeCriterion::Named(name) => f.debug_tuple("Named").field(name).finish(),
            EdgeCriterion::Func(_) => f.write_str("Func(<fn>)"),
        }
    }
}

/// Options for [`sort_graph`](crate::sort_graph).
#[derive(Clone)]
pub struct SortOptions {
    /// Primary node ordering; `None` sorts by `node_key` alone.
    pub nodes_by: Option<NodeCriterion>,
    /// Secondary node ordering; defaults to the rank's last element.
    pub node_key: Option<NodeKeyFn>,
    /// Arguments forwarded to `nodes_by`.
    pub node_args: Vec<Value>,
    /// Node direction.
    pub nodes_ascending: bool,
    /// Primary edge ordering.
    pub edges_by: Option<EdgeCriterion>,
    /// Secondary edge ordering; defaults to `100*rank(source) - 10*rank(target)`.
    pub edge_key: Option<EdgeKeyFn>,
    /// Arguments forwarded to `edges_by`.
    pub edge_args: Vec<Value>,
    /// Edge direction.
    pub edges_ascending: bool,
    /// Relabel nodes to their ordinal position after sorting.
    pub relabel: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            nodes_by: Some(NodeCriterion::named("in_degree")),
            node_key: None,
            node_args: Vec::new(),
            nodes_ascending: true,
            edges_by: None,
            edge_key: None,
            edge_args: Vec::new(),
            edges_ascending: false,
            relabel: false,
        }
    }
}

impl SortOptions {
    /// Sets the primary node criterion.
    pub fn nodes_by(mut self, criterion: NodeCriterion) -> Self {
        self.nodes_by = Some(criterion);
        self
    }

    /// Sets the secondary node key.
    pub fn node_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&Label, &Rank) -> Rank + Send + Sync + 'static,
    {
        self.node_key = Some(Arc::new(key));
        self
    }

    /// Sets the primary edge criterion.
    pub fn edges_by(mut self, criterion: EdgeCriterion) -> Self {
        self.edges_by = Some(criterion);
        self
    }

    /// Sets the secondary edge key.
    pub fn edge_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&EdgeTriple, &Rank) -> Rank + Send + Sync + 'static,
    {
        self.edge_key = Some(Arc::new(key));
        self
    }

    /// Sets the node direction.
    pub fn nodes_ascending(mut self, ascending: bool) -> Self {
        self.nodes_ascending = ascending;
        self
    }

    /// Sets the edge direction.
    pub fn edges_ascending(mut self, ascending: bool) -> Self {
        self.edges_ascending = ascending;
        self
    }

    /// Requests ordinal relabeling after the sort.
    pub fn relabel(mut self, relabel: bool) -> Self {
        self.relabel = relabel;
        self
    }
}

impl fmt::Debug for SortOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortOptions")
            .field("nodes_by", &self.nodes_by)
            .field("node_args", &self.node_args)
            .field("nodes_ascending", &self.nodes_ascending)
            .field("edges_by", &self.edges_by)
            .field("edge_args", &self.edge_args)
            .field("edges_ascending", &self.edges_ascending)
            .field("relabel", &self.relabel)
            .finish_non_exhaustive()
    }
}

/// Serializable, name-only form of [`SortOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Accessor name for the primary node criterion.
    pub nodes_by: Option<String>,
    /// Arguments forwarded to `nodes_by`.
    pub node_args: Vec<Value>,
    /// Node direction.
    pub nodes_ascending: bool,
    /// Accessor name for the primary edge criterion.
    pub edges_by: Option<String>,
    /// Arguments forwarded to `edges_by`.
    pub edge_args: Vec<Value>,
    /// Edge direction.
    pub edges_ascending: bool,
    /// Relabel nodes to their ordinal position after sorting.
    pub relabel: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            nodes_by: Some("in_degree".to_string()),
            node_args: Vec::new(),
            nodes_ascending: true,
            edges_by: None,
            edge_args: Vec::new(),
            edges_ascending: false,
            relabel: false,
        }
    }
}

impl SortConfig {
    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, NmError> {
        serde_json::from_str(json)
            .map_err(|err| NmError::malformed("sort-config", err.to_string()))
    }

    /// Converts the configuration into sort options with default keys.
    pub fn into_options(self) -> SortOptions {
        SortOptions {
            nodes_by: self.nodes_by.map(NodeCriterion::Named),
            node_key: None,
            node_args: self.node_args,
            nodes_ascending: self.nodes_ascending,
            edges_by: self.edges_by.map(EdgeCriterion::Named),
            edge_key: None,
            edge_args: self.edge_args,
            edges_ascending: self.edges_ascending,
            relabel: self.relabel,
        }
    }
}
