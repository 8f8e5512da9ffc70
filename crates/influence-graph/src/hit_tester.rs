use crate::geometry::{Vec2, point_segment_distance};
use influence_core::{Edge, InfluenceGraph, NodeKey};

/// Result of a hit test at a given position.
///
/// Priority order: Node > Edge > None
#[derive(Debug, Clone, PartialEq)]
pub enum HitResult {
    /// Nothing was hit at the tested position.
    None,
    Node(NodeKey),
    /// An edge, identified by its ordered endpoint pair.
    Edge { src: NodeKey, dst: NodeKey },
}

impl HitResult {
    pub fn is_none(&self) -> bool {
        matches!(self, HitResult::None)
    }

    pub fn node(&self) -> Option<&NodeKey> {
        match self {
            HitResult::Node(key) => Some(key),
            _ => None,
        }
    }
}

/// Picks nodes and edges under a world-space point.
///
/// Both thresholds are stored in screen pixels and divided by the current scale
/// before use, so the clickable area stays the same size on screen at every zoom
/// level. Ties go to the first node in map order and the first edge in list order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTester {
    node_radius: f64,
    edge_tolerance: f64,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new(12.0, 8.0)
    }
}

impl HitTester {
    pub fn new(node_radius: f64, edge_tolerance: f64) -> Self {
        Self {
            node_radius,
            edge_tolerance,
        }
    }

    pub fn node_radius(&self) -> f64 {
        self.node_radius
    }

    pub fn edge_tolerance(&self) -> f64 {
        self.edge_tolerance
    }

    /// Node pick radius in world units at `scale`.
    pub fn pick_radius(&self, scale: f64) -> f64 {
        self.node_radius / scale
    }

    /// Edge tolerance band in world units at `scale`.
    pub fn edge_band(&self, scale: f64) -> f64 {
        self.edge_tolerance / scale
    }

    /// Perform a hit test at the given world position. Nodes win over edges.
    pub fn hit_test(&self, graph: &InfluenceGraph, world: Vec2, scale: f64) -> HitResult {
        if let Some(key) = self.hit_node(graph, world, scale) {
            return HitResult::Node(key.clone());
        }
        if let Some(edge) = self.hit_edge(graph, world, scale) {
            return HitResult::Edge {
                src: edge.src.clone(),
                dst: edge.dst.clone(),
            };
        }
        HitResult::None
    }

    /// First node (in insertion order) within the pick radius, inclusive.
    pub fn hit_node<'g>(
        &self,
        graph: &'g InfluenceGraph,
        world: Vec2,
        scale: f64,
    ) -> Option<&'g NodeKey> {
        let radius = self.pick_radius(scale);
        graph
            .nodes()
            .find(|(_, node)| Vec2::new(node.x, node.y).distance(world) <= radius)
            .map(|(key, _)| key)
    }

    /// First edge (in insertion order) whose segment lies strictly within the
    /// tolerance band. Edges with a missing endpoint are skipped.
    pub fn hit_edge<'g>(
        &self,
        graph: &'g InfluenceGraph,
        world: Vec2,
        scale: f64,
    ) -> Option<&'g Edge> {
        let band = self.edge_band(scale);
        graph.edges().iter().find(|edge| {
            let Some((a, b)) = graph.endpoints(edge) else {
                tracing::trace!("Skipping dangling edge {} -> {}", edge.src, edge.dst);
                return false;
            };
            point_segment_distance(world, Vec2::new(a.x, a.y), Vec2::new(b.x, b.y)) < band
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use influence_core::GraphSnapshot;

    fn horizontal_pair() -> (InfluenceGraph, NodeKey, NodeKey) {
        let mut graph = InfluenceGraph::new();
        let a = graph.add_node("A", 0.0, 0.0).unwrap();
        let b = graph.add_node("B", 100.0, 0.0).unwrap();
        graph.add_edge(a.clone(), b.clone(), 1.0);
        (graph, a, b)
    }

    #[test]
    fn test_hit_node_radius_is_inclusive() {
        let (graph, a, _) = horizontal_pair();
        let tester = HitTester::default();
        assert_eq!(tester.hit_node(&graph, Vec2::new(12.0, 0.0), 1.0), Some(&a));
        assert_eq!(tester.hit_node(&graph, Vec2::new(12.5, 0.0), 1.0), None);
    }

    #[test]
    fn test_pick_radius_scales_with_zoom() {
        let (graph, a, _) = horizontal_pair();
        let tester = HitTester::default();
        // 20 world units is 40 px at scale 2 (miss) and 10 px at scale 0.5 (hit).
        let point = Vec2::new(0.0, 20.0);
        assert_eq!(tester.hit_node(&graph, point, 2.0), None);
        assert_eq!(tester.hit_node(&graph, point, 0.5), Some(&a));
        assert_eq!(tester.pick_radius(4.0), 3.0);
    }

    #[test]
    fn test_hit_node_tie_break_is_insertion_order() {
        let mut graph = InfluenceGraph::new();
        let first = graph.add_node("first", 0.0, 0.0).unwrap();
        let _second = graph.add_node("second", 4.0, 0.0).unwrap();
        let tester = HitTester::default();
        // Closer to the second node, but both are in range.
        assert_eq!(tester.hit_node(&graph, Vec2::new(3.0, 0.0), 1.0), Some(&first));
    }

    #[test]
    fn test_hit_edge_tolerance_is_strict() {
        let (graph, a, b) = horizontal_pair();
        let tester = HitTester::default();
        let hit = tester.hit_edge(&graph, Vec2::new(50.0, 7.9), 1.0).unwrap();
        assert!(hit.connects(&a, &b));
        assert!(tester.hit_edge(&graph, Vec2::new(50.0, 8.0), 1.0).is_none());
        // Same world point is inside the band once zoomed out.
        assert!(tester.hit_edge(&graph, Vec2::new(50.0, 8.0), 0.5).is_some());
    }

    #[test]
    fn test_hit_edge_first_in_insertion_order() {
        let (mut graph, a, b) = horizontal_pair();
        graph.add_edge(b.clone(), a.clone(), -1.0);
        let tester = HitTester::default();
        let hit = tester.hit_edge(&graph, Vec2::new(50.0, 1.0), 1.0).unwrap();
        assert!(hit.connects(&a, &b));
    }

    #[test]
    fn test_priority_node_over_edge() {
        let (graph, a, _) = horizontal_pair();
        let tester = HitTester::default();
        assert_eq!(
            tester.hit_test(&graph, Vec2::new(5.0, 0.0), 1.0),
            HitResult::Node(a.clone())
        );
        assert_eq!(
            tester.hit_test(&graph, Vec2::new(50.0, 0.0), 1.0),
            HitResult::Edge {
                src: a,
                dst: NodeKey::new("F2")
            }
        );
        assert!(tester.hit_test(&graph, Vec2::new(50.0, 50.0), 1.0).is_none());
    }

    #[test]
    fn test_dangling_edges_are_skipped() {
        let json = serde_json::json!({
            "nodes": { "F1": {"x": 0.0, "y": 0.0, "label": "A"} },
            "edges": [
                {"src": "F1", "dst": "F9", "w": 1.0},
                {"src": "F9", "dst": "F1", "w": 1.0}
            ]
        });
        let snapshot: GraphSnapshot = serde_json::from_value(json).unwrap();
        let graph = InfluenceGraph::from_snapshot(snapshot).unwrap();
        let tester = HitTester::default();

        assert_eq!(graph.dangling_edge_count(), 2);
        assert!(tester.hit_edge(&graph, Vec2::new(0.0, 30.0), 1.0).is_none());
        assert!(tester.hit_test(&graph, Vec2::new(40.0, 0.0), 1.0).is_none());
    }
}
