use crate::graph::edge::Edge;
use crate::graph::vertex::VertexId;
use std::collections::BTreeSet;

/// One frame of the shortest path animation.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStep {
    start: BTreeSet<VertexId>,
    end: BTreeSet<VertexId>,
    current_vertices: BTreeSet<VertexId>,
    current_edges: BTreeSet<Edge>,
    used_vertices: BTreeSet<VertexId>,
    used_edges: BTreeSet<Edge>,
}

impl GraphStep {
    pub fn new(
        start: BTreeSet<VertexId>,
        end: BTreeSet<VertexId>,
        current_vertices: BTreeSet<VertexId>,
        current_edges: BTreeSet<Edge>,
        used_vertices: BTreeSet<VertexId>,
        used_edges: BTreeSet<Edge>,
    ) -> Self {
        Self {
            start,
            end,
            current_vertices,
            current_edges,
            used_vertices,
            used_edges,
        }
    }

    pub fn start(&self) -> &BTreeSet<VertexId> {
        &self.start
    }

    pub fn end(&self) -> &BTreeSet<VertexId> {
        &self.end
    }

    pub fn current_vertices(&self) -> &BTreeSet<VertexId> {
        &self.current_vertices
    }

    pub fn current_edges(&self) -> &BTreeSet<Edge> {
        &self.current_edges
    }

    pub fn used_vertices(&self) -> &BTreeSet<VertexId> {
        &self.used_vertices
    }

    pub fn used_edges(&self) -> &BTreeSet<Edge> {
        &self.used_edges
    }

    pub fn vertex_highlight(&self, id: VertexId) -> Highlight {
        if self.current_vertices.contains(&id) {
            Highlight::Current
        } else if self.used_vertices.contains(&id) {
            Highlight::Used
        } else if self.end.contains(&id) {
            Highlight::End
        } else if self.start.contains(&id) {
            Highlight::Start
        } else {
            Highlight::None
        }
    }

    /// An edge shares the highlight of its reverse so that mirrored edges
    /// light up together.
    pub fn edge_highlight(&self, edge: &Edge) -> Highlight {
        let reversed = edge.reversed();
        if self.current_edges.contains(edge) || self.current_edges.contains(&reversed) {
            Highlight::Current
        } else if self.used_edges.contains(edge) || self.used_edges.contains(&reversed) {
            Highlight::Used
        } else {
            Highlight::None
        }
    }
}

/// Presentation class of a vertex or edge within a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    None,
    Start,
    End,
    Used,
    Current,
}
