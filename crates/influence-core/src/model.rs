use crate::{EdgePresentation, ModelError, NodeKey, NodePresentation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A labeled factor positioned in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub label: String,
    #[serde(flatten)]
    pub presentation: NodePresentation,
}

/// A signed causal influence from `src` to `dst`.
///
/// Identity is the ordered `(src, dst)` pair; at most one edge exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeKey,
    pub dst: NodeKey,
    #[serde(rename = "w")]
    pub weight: f64,
    #[serde(flatten)]
    pub presentation: EdgePresentation,
}

impl Edge {
    pub fn connects(&self, src: &str, dst: &str) -> bool {
        self.src.as_str() == src && self.dst.as_str() == dst
    }

    pub fn touches(&self, key: &str) -> bool {
        self.src.as_str() == key || self.dst.as_str() == key
    }
}

/// The influence diagram: factors keyed by [`NodeKey`], edges in insertion order.
///
/// Every mutation on an absent key is a silent no-op. Edges may transiently
/// reference missing nodes; readers skip such edges (see [`InfluenceGraph::endpoints`]).
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceGraph {
    nodes: IndexMap<NodeKey, Node>,
    edges: Vec<Edge>,
    counter: u64,
}

impl Default for InfluenceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InfluenceGraph {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            counter: 1,
        }
    }

    pub(crate) fn from_parts(nodes: IndexMap<NodeKey, Node>, edges: Vec<Edge>, counter: u64) -> Self {
        Self {
            nodes,
            edges,
            counter,
        }
    }

    pub fn add_node(&mut self, label: impl Into<String>, x: f64, y: f64) -> Result<NodeKey, ModelError> {
        self.add_node_with(label, x, y, NodePresentation::default())
    }

    /// Insert a node under the next counter key.
    ///
    /// Fails only once the counter has reached `u64::MAX`; keys are never
    /// reissued.
    pub fn add_node_with(
        &mut self,
        label: impl Into<String>,
        x: f64,
        y: f64,
        presentation: NodePresentation,
    ) -> Result<NodeKey, ModelError> {
        let next = self.counter.checked_add(1).ok_or(ModelError::KeysExhausted)?;
        let key = NodeKey::from_counter(self.counter);
        self.counter = next;
        let node = Node {
            x,
            y,
            label: label.into(),
            presentation,
        };
        tracing::debug!("Added node {} ({:?}) at ({}, {})", key, node.label, x, y);
        self.nodes.insert(key.clone(), node);
        Ok(key)
    }

    /// Remove a node together with every edge that starts or ends at it.
    ///
    /// Returns `false` when the key was unknown (nothing changed).
    pub fn remove_node(&mut self, key: &str) -> bool {
        if self.nodes.shift_remove(key).is_none() {
            return false;
        }
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(key));
        tracing::debug!(
            "Removed node {} and {} attached edge(s)",
            key,
            before - self.edges.len()
        );
        true
    }

    pub fn rename_node(&mut self, key: &str, label: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.label = label.into();
        }
    }

    pub fn move_node(&mut self, key: &str, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.x = x;
            node.y = y;
        }
    }

    pub fn set_node_presentation(&mut self, key: &str, presentation: NodePresentation) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.presentation = presentation;
        }
    }

    pub fn add_edge(&mut self, src: impl Into<NodeKey>, dst: impl Into<NodeKey>, weight: f64) {
        self.add_edge_with(src, dst, weight, EdgePresentation::default());
    }

    /// Insert or overwrite the edge for `(src, dst)`. Self-loops are ignored.
    pub fn add_edge_with(
        &mut self,
        src: impl Into<NodeKey>,
        dst: impl Into<NodeKey>,
        weight: f64,
        presentation: EdgePresentation,
    ) {
        let (src, dst) = (src.into(), dst.into());
        if src == dst {
            tracing::debug!("Ignoring self-loop on {}", src);
            return;
        }
        if let Some(edge) = self.edges.iter_mut().find(|e| e.connects(&src, &dst)) {
            edge.weight = weight;
            edge.presentation = presentation;
            tracing::debug!("Updated edge {} -> {} (w = {})", src, dst, weight);
            return;
        }
        tracing::debug!("Added edge {} -> {} (w = {})", src, dst, weight);
        self.edges.push(Edge {
            src,
            dst,
            weight,
            presentation,
        });
    }

    pub fn set_edge_weight(&mut self, src: &str, dst: &str, weight: f64) {
        if let Some(edge) = self.edge_mut(src, dst) {
            edge.weight = weight;
        }
    }

    pub fn set_edge_presentation(&mut self, src: &str, dst: &str, presentation: EdgePresentation) {
        if let Some(edge) = self.edge_mut(src, dst) {
            edge.presentation = presentation;
        }
    }

    pub fn remove_edge(&mut self, src: &str, dst: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.connects(src, dst));
        before != self.edges.len()
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeKey, &Node)> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, src: &str, dst: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.connects(src, dst))
    }

    fn edge_mut(&mut self, src: &str, dst: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|edge| edge.connects(src, dst))
    }

    /// Both endpoint nodes of `edge`, or `None` when either is missing.
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.nodes.get(edge.src.as_str())?, self.nodes.get(edge.dst.as_str())?))
    }

    pub fn dangling_edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|edge| self.endpoints(edge).is_none())
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// The number the next created node key will carry.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn keys_exhausted(&self) -> bool {
        self.counter == u64::MAX
    }

    pub(crate) fn node_map(&self) -> &IndexMap<NodeKey, Node> {
        &self.nodes
    }
}
