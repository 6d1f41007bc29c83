use crate::graph::edge::Edge;
use crate::graph::graph::{Graph, GraphError};
use crate::graph::vertex::{Point, Vertex, VertexId};

/// How the edit layer turns a single user edge into graph edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditPolicy {
    Directed,
    /// every edge is mirrored and both directions share one cost
    Bidirectional,
}

/// Mutation API used by the edit modes. All operations are synchronous and
/// apply the policy on top of the plain directed [`Graph`].
pub struct GraphEditor<'a> {
    graph: &'a mut Graph,
    policy: EditPolicy,
}

impl<'a> GraphEditor<'a> {
    pub fn new(graph: &'a mut Graph, policy: EditPolicy) -> Self {
        Self { graph, policy }
    }

    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    pub fn add_vertex(&mut self, position: Point) -> VertexId {
        self.graph.add_vertex(Vertex::new(position))
    }

    /// Returns the edges that were actually created. Existing edges keep
    /// their cost.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<Vec<Edge>, GraphError> {
        let mut added = Vec::new();
        for (a, b) in self.directions(from, to) {
            if self.graph.contains_edge(a, b) {
                continue;
            }
            let cost = match self.policy {
                EditPolicy::Bidirectional => self.graph.edge_cost(b, a).unwrap_or(f64::NAN),
                EditPolicy::Directed => f64::NAN,
            };
            self.graph.add_edge(a, b, cost)?;
            added.push(Edge::new(a, b, cost));
        }
        Ok(added)
    }

    pub fn remove_vertex(&mut self, id: VertexId) -> Vec<Edge> {
        self.graph.remove_vertex(id)
    }

    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Vec<Edge> {
        self.directions(from, to)
            .into_iter()
            .filter_map(|(a, b)| {
                let cost = self.graph.edge_cost(a, b)?;
                self.graph.remove_edge(a, b);
                Some(Edge::new(a, b, cost))
            })
            .collect()
    }

    pub fn set_vertex_cost(&mut self, id: VertexId, cost: f64) -> bool {
        self.graph.set_vertex_cost(id, cost)
    }

    pub fn set_edge_cost(&mut self, from: VertexId, to: VertexId, cost: f64) -> bool {
        self.directions(from, to)
            .into_iter()
            .fold(false, |changed, (a, b)| self.graph.set_edge_cost(a, b, cost) || changed)
    }

    fn directions(&self, from: VertexId, to: VertexId) -> Vec<(VertexId, VertexId)> {
        match self.policy {
            EditPolicy::Bidirectional if from != to => vec![(from, to), (to, from)],
            _ => vec![(from, to)],
        }
    }
}
