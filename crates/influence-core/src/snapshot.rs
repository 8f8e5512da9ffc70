//! Flat persistence format for influence diagrams.
//!
//! ```json
//! { "nodes": { "F1": { "x": 260, "y": 220, "label": "Preis" } },
//!   "edges": [ { "src": "F1", "dst": "F2", "w": -0.8 } ],
//!   "counter": 3,
//!   "view": { "scale": 1.0, "offset": [0, 0] } }
//! ```
//!
//! Reading also accepts documents without `counter`/`view` and the older
//! wrapped layout `{ "model": { nodes, edges, counter }, "view": ... }`.

use crate::{Edge, InfluenceGraph, Node, NodeKey, SnapshotError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Serialized form of an [`InfluenceGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: IndexMap<NodeKey, Node>,
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<u64>,
}

/// Serialized viewport: uniform scale plus screen-space offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub scale: f64,
    pub offset: [f64; 2],
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewSnapshot {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: [0.0, 0.0],
    };

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SnapshotError::InvalidView { scale: self.scale });
        }
        if !self.offset.iter().all(|v| v.is_finite()) {
            return Err(SnapshotError::InvalidOffset);
        }
        Ok(())
    }
}

/// A whole saved document: graph plus optional view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(flatten)]
    pub graph: GraphSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewSnapshot>,
}

impl DocumentSnapshot {
    /// Parse any accepted document layout. Nothing is applied anywhere; the
    /// caller decides what to do with the result.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let mut root: serde_json::Value = serde_json::from_str(json)?;
        let object = root.as_object_mut().ok_or(SnapshotError::NotAnObject)?;
        let view = match object.remove("view") {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<ViewSnapshot>(value)?),
        };
        let model = object.remove("model");
        let graph: GraphSnapshot = serde_json::from_value(model.unwrap_or(root))?;

        if let Some(view) = &view {
            view.validate()?;
        }
        graph.validate()?;
        Ok(Self { graph, view })
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl GraphSnapshot {
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (key, node) in &self.nodes {
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(SnapshotError::NonFiniteCoordinate {
                    key: key.to_string(),
                });
            }
        }
        for edge in &self.edges {
            if !edge.weight.is_finite() {
                return Err(SnapshotError::NonFiniteWeight {
                    src: edge.src.to_string(),
                    dst: edge.dst.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Smallest counter that cannot collide with any key in `nodes`.
    ///
    /// A key whose suffix is `u64::MAX` leaves no such counter.
    pub fn minimum_counter(&self) -> Result<u64, SnapshotError> {
        match self.nodes.keys().filter_map(NodeKey::numeric_suffix).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or(SnapshotError::CounterExhausted { suffix: max }),
        }
    }
}

impl InfluenceGraph {
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.node_map().clone(),
            edges: self.edges().to_vec(),
            counter: Some(self.counter()),
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// A missing counter is recomputed from the keys; a stored counter that would
    /// hand out an existing key is raised to the first safe value. A key with
    /// suffix `u64::MAX` is rejected since no counter can lie beyond it; a
    /// counter of `u64::MAX` loads as a graph that accepts no new nodes.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        let minimum = snapshot.minimum_counter()?;
        let counter = match snapshot.counter {
            Some(stored) if stored >= minimum => stored,
            Some(stored) => {
                tracing::warn!(
                    "Snapshot counter {} collides with existing keys, using {}",
                    stored,
                    minimum
                );
                minimum
            }
            None => minimum,
        };
        if counter == u64::MAX {
            tracing::warn!("Snapshot counter is exhausted; no nodes can be added");
        }
        let dangling = snapshot
            .edges
            .iter()
            .filter(|e| {
                !snapshot.nodes.contains_key(e.src.as_str())
                    || !snapshot.nodes.contains_key(e.dst.as_str())
            })
            .count();
        if dangling > 0 {
            tracing::warn!("Snapshot contains {} dangling edge(s); they will be skipped", dangling);
        }
        Ok(Self::from_parts(snapshot.nodes, snapshot.edges, counter))
    }
}
