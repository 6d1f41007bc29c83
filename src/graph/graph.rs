use crate::graph::edge::Edge;
use crate::graph::vertex::{Point, Vertex, VertexId};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("vertex {0} does not exist")]
    InvalidReference(VertexId),
    #[error("vertex {0} is defined twice")]
    DuplicateVertex(VertexId),
}

type Adjacency = BTreeMap<VertexId, BTreeMap<VertexId, f64>>;

/// Mutable directed weighted graph.
///
/// `edges[a][b]` and `reversed_edges[b][a]` always hold the same cost. Vertex
/// ids come from a counter that only grows, so an id is never handed out
/// twice even after its vertex was removed.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: BTreeMap<VertexId, Vertex>,
    edges: Adjacency,
    reversed_edges: Adjacency,
    next_id: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a graph keeping the given ids. The free-id counter resumes
    /// after the largest one.
    pub fn from_parts(
        vertices: impl IntoIterator<Item = (VertexId, Vertex)>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for (id, vertex) in vertices {
            if graph.vertices.insert(id, vertex).is_some() {
                return Err(GraphError::DuplicateVertex(id));
            }
            graph.next_id = graph.next_id.max(id.index() + 1);
        }
        for edge in edges {
            graph.add_edge(edge.from(), edge.to(), edge.cost())?;
        }
        Ok(graph)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.next_id);
        self.next_id += 1;
        self.vertices.insert(id, vertex);
        debug!(vertex = %id, "vertex added");
        id
    }

    /// Inserts `from -> to`, replacing the cost if the edge already exists.
    /// Both endpoints must exist.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, cost: f64) -> Result<(), GraphError> {
        for id in [from, to] {
            if !self.vertices.contains_key(&id) {
                return Err(GraphError::InvalidReference(id));
            }
        }
        self.edges.entry(from).or_default().insert(to, cost);
        self.reversed_edges.entry(to).or_default().insert(from, cost);
        debug!(%from, %to, cost, "edge added");
        Ok(())
    }

    /// Removes the vertex together with every edge touching it and returns
    /// the removed edges. Unknown ids remove nothing.
    pub fn remove_vertex(&mut self, id: VertexId) -> Vec<Edge> {
        if self.vertices.remove(&id).is_none() {
            return Vec::new();
        }
        let mut removed = Vec::new();
        if let Some(incoming) = self.reversed_edges.remove(&id) {
            for (from, cost) in incoming {
                if let Some(outgoing) = self.edges.get_mut(&from) {
                    outgoing.remove(&id);
                }
                removed.push(Edge::new(from, id, cost));
            }
        }
        if let Some(outgoing) = self.edges.remove(&id) {
            for (to, cost) in outgoing {
                if let Some(incoming) = self.reversed_edges.get_mut(&to) {
                    incoming.remove(&id);
                }
                // a self loop was already collected from the incoming side
                if to != id {
                    removed.push(Edge::new(id, to, cost));
                }
            }
        }
        debug!(vertex = %id, edges = removed.len(), "vertex removed");
        removed
    }

    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let removed = self
            .edges
            .get_mut(&from)
            .and_then(|outgoing| outgoing.remove(&to))
            .is_some();
        if let Some(incoming) = self.reversed_edges.get_mut(&to) {
            incoming.remove(&from);
        }
        if removed {
            debug!(%from, %to, "edge removed");
        }
        removed
    }

    /// Updates an existing edge. Never creates one; NaN is ignored.
    pub fn set_edge_cost(&mut self, from: VertexId, to: VertexId, cost: f64) -> bool {
        if cost.is_nan() {
            return false;
        }
        match self.edges.get_mut(&from).and_then(|m| m.get_mut(&to)) {
            Some(stored) => *stored = cost,
            None => return false,
        }
        if let Some(stored) = self.reversed_edges.get_mut(&to).and_then(|m| m.get_mut(&from)) {
            *stored = cost;
        }
        debug!(%from, %to, cost, "edge cost set");
        true
    }

    /// NaN or an unknown id leaves the graph untouched.
    pub fn set_vertex_cost(&mut self, id: VertexId, cost: f64) -> bool {
        if cost.is_nan() {
            return false;
        }
        match self.vertices.get_mut(&id) {
            Some(vertex) => {
                vertex.set_cost(cost);
                debug!(vertex = %id, cost, "vertex cost set");
                true
            }
            None => false,
        }
    }

    pub fn set_vertex_position(&mut self, id: VertexId, position: Point) -> bool {
        self.vertices
            .get_mut(&id)
            .map(|vertex| vertex.set_position(position))
            .is_some()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().map(|(id, v)| (*id, v))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_cost(&self, from: VertexId, to: VertexId) -> Option<f64> {
        self.edges.get(&from).and_then(|m| m.get(&to)).copied()
    }

    pub fn contains_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.edge_cost(from, to).is_some()
    }

    /// All edges ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .flat_map(|(from, m)| m.iter().map(|(to, cost)| Edge::new(*from, *to, *cost)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|m| m.len()).sum()
    }

    pub fn outgoing(&self, id: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.edges
            .get(&id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(to, cost)| (*to, *cost)))
    }

    /// Sources of the edges pointing into `id`, from the reversed index.
    pub fn incoming(&self, id: VertexId) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.reversed_edges
            .get(&id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(from, cost)| (*from, *cost)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn same_cost(a: f64, b: f64) -> bool {
        a == b || (a.is_nan() && b.is_nan())
    }

    fn assert_symmetric(graph: &Graph) {
        for (from, m) in &graph.edges {
            for (to, cost) in m {
                let back = graph.reversed_edges.get(to).and_then(|r| r.get(from));
                assert!(back.is_some_and(|c| same_cost(*c, *cost)), "{from}->{to} missing in reverse");
                assert!(graph.vertices.contains_key(from) && graph.vertices.contains_key(to));
            }
        }
        for (to, m) in &graph.reversed_edges {
            for (from, cost) in m {
                let fwd = graph.edges.get(from).and_then(|e| e.get(to));
                assert!(fwd.is_some_and(|c| same_cost(*c, *cost)), "{from}->{to} missing forward");
            }
        }
    }

    fn vertex() -> Vertex {
        Vertex::new(Point::new(0.5, 0.5))
    }

    fn triangle() -> Graph {
        let mut graph = Graph::new();
        let a = graph.add_vertex(vertex());
        let b = graph.add_vertex(vertex());
        let c = graph.add_vertex(vertex());
        graph.add_edge(a, b, 1.0).unwrap();
        graph.add_edge(b, c, 2.0).unwrap();
        graph.add_edge(c, a, 3.0).unwrap();
        graph.add_edge(a, c, 4.0).unwrap();
        graph
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut graph = Graph::new();
        for _ in 0..4 {
            graph.add_vertex(vertex());
        }
        graph.remove_vertex(VertexId(3));
        let id = graph.add_vertex(vertex());
        assert_eq!(VertexId(4), id);
        assert!(!graph.contains_vertex(VertexId(3)));
    }

    #[test]
    fn test_add_edge_to_missing_vertex_fails() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(vertex());
        assert_eq!(
            Err(GraphError::InvalidReference(VertexId(7))),
            graph.add_edge(a, VertexId(7), 1.0)
        );
        assert_eq!(0, graph.edge_count());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_remove_vertex_cascades_only_incident_edges() {
        let mut graph = triangle();
        let d = graph.add_vertex(vertex());
        graph.add_edge(VertexId(1), d, 5.0).unwrap();

        let mut removed = graph.remove_vertex(VertexId(0));
        removed.sort();

        assert_eq!(
            vec![
                Edge::unweighted(VertexId(0), VertexId(1)),
                Edge::unweighted(VertexId(0), VertexId(2)),
                Edge::unweighted(VertexId(2), VertexId(0)),
            ],
            removed
        );
        assert_eq!(Some(2.0), graph.edge_cost(VertexId(1), VertexId(2)));
        assert_eq!(Some(5.0), graph.edge_cost(VertexId(1), d));
        assert_eq!(2, graph.edge_count());
        assert_eq!(0, graph.incoming(VertexId(1)).count());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_remove_isolated_and_missing_vertex() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(vertex());
        assert!(graph.remove_vertex(a).is_empty());
        assert!(graph.remove_vertex(a).is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_vertex_with_self_loop() {
        let mut graph = Graph::new();
        let a = graph.add_vertex(vertex());
        graph.add_edge(a, a, 1.0).unwrap();
        assert_eq!(1, graph.remove_vertex(a).len());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_remove_edge_keeps_reverse_index() {
        let mut graph = triangle();
        assert!(graph.remove_edge(VertexId(0), VertexId(1)));
        assert!(!graph.remove_edge(VertexId(0), VertexId(1)));
        assert!(!graph.contains_edge(VertexId(0), VertexId(1)));
        assert_eq!(0, graph.incoming(VertexId(1)).count());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_set_edge_cost_never_inserts() {
        let mut graph = triangle();
        assert!(!graph.set_edge_cost(VertexId(1), VertexId(0), 9.0));
        assert!(!graph.contains_edge(VertexId(1), VertexId(0)));

        assert!(graph.set_edge_cost(VertexId(0), VertexId(1), 9.5));
        assert_relative_eq!(9.5, graph.edge_cost(VertexId(0), VertexId(1)).unwrap());
        let (_, reversed) = graph.incoming(VertexId(1)).next().unwrap();
        assert_relative_eq!(9.5, reversed);

        assert!(!graph.set_edge_cost(VertexId(0), VertexId(1), f64::NAN));
        assert_relative_eq!(9.5, graph.edge_cost(VertexId(0), VertexId(1)).unwrap());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_set_vertex_cost_ignores_unset_and_missing() {
        let mut graph = triangle();
        assert!(!graph.vertex(VertexId(0)).unwrap().has_cost());
        assert!(graph.set_vertex_cost(VertexId(0), 2.5));
        assert!(!graph.set_vertex_cost(VertexId(0), f64::NAN));
        assert!(!graph.set_vertex_cost(VertexId(42), 1.0));
        assert_relative_eq!(2.5, graph.vertex(VertexId(0)).unwrap().cost());
    }

    #[test]
    fn test_move_vertex() {
        let mut graph = triangle();
        assert!(graph.set_vertex_position(VertexId(1), Point::new(0.2, 0.8)));
        assert_eq!(Point::new(0.2, 0.8), graph.vertex(VertexId(1)).unwrap().position());
        assert!(!graph.set_vertex_position(VertexId(9), Point::new(0.2, 0.8)));
    }

    #[test]
    fn test_from_parts_keeps_ids() {
        let mut graph = Graph::from_parts(
            vec![(VertexId(2), vertex()), (VertexId(5), vertex())],
            vec![Edge::new(VertexId(5), VertexId(2), 1.5)],
        )
        .unwrap();
        assert_eq!(VertexId(6), graph.add_vertex(vertex()));
        assert_eq!(Some(1.5), graph.edge_cost(VertexId(5), VertexId(2)));

        let dangling = Graph::from_parts(
            vec![(VertexId(0), vertex())],
            vec![Edge::new(VertexId(0), VertexId(1), 1.0)],
        );
        assert_eq!(Err(GraphError::InvalidReference(VertexId(1))), dangling.map(|_| ()));

        let duplicate = Graph::from_parts(vec![(VertexId(0), vertex()), (VertexId(0), vertex())], vec![]);
        assert_eq!(Err(GraphError::DuplicateVertex(VertexId(0))), duplicate.map(|_| ()));
    }

    #[derive(Clone, Debug)]
    enum Op {
        AddVertex,
        AddEdge(usize, usize, f64),
        RemoveVertex(usize),
        RemoveEdge(usize, usize),
        SetCost(usize, usize, f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddVertex),
            (0..12usize, 0..12usize, 0.0..10.0f64).prop_map(|(a, b, c)| Op::AddEdge(a, b, c)),
            (0..12usize).prop_map(Op::RemoveVertex),
            (0..12usize, 0..12usize).prop_map(|(a, b)| Op::RemoveEdge(a, b)),
            (0..12usize, 0..12usize, 0.0..10.0f64).prop_map(|(a, b, c)| Op::SetCost(a, b, c)),
        ]
    }

    proptest! {
        #[test]
        fn symmetry_holds_after_every_mutation(ops in prop::collection::vec(op(), 1..60)) {
            let mut graph = Graph::new();
            for op in ops {
                match op {
                    Op::AddVertex => {
                        graph.add_vertex(vertex());
                    }
                    Op::AddEdge(a, b, c) => {
                        let _ = graph.add_edge(VertexId(a), VertexId(b), c);
                    }
                    Op::RemoveVertex(a) => {
                        graph.remove_vertex(VertexId(a));
                    }
                    Op::RemoveEdge(a, b) => {
                        graph.remove_edge(VertexId(a), VertexId(b));
                    }
                    Op::SetCost(a, b, c) => {
                        graph.set_edge_cost(VertexId(a), VertexId(b), c);
                    }
                }
                assert_symmetric(&graph);
            }
        }
    }
}
