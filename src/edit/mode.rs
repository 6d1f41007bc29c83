use crate::graph::edge::Edge;
use crate::graph::editor::GraphEditor;
use crate::graph::finder::{EdgeFinder, VertexFinder};
use crate::graph::graph::GraphError;
use crate::graph::vertex::{Point, VertexId};
use std::collections::BTreeSet;
use std::fmt;

/// Active edit mode. A touch on the canvas is dispatched to exactly one mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    AddVertex,
    /// first touch picks the source, second the target
    AddEdge { pending: Option<VertexId> },
    Remove,
    SetPrice,
    SelectStart,
    SelectEnd,
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditMode::AddVertex => "add vertex",
            EditMode::AddEdge { pending: None } => "add edge",
            EditMode::AddEdge { pending: Some(_) } => "add edge (pick target)",
            EditMode::Remove => "remove",
            EditMode::SetPrice => "set price",
            EditMode::SelectStart => "select start",
            EditMode::SelectEnd => "select end",
        };
        f.write_str(name)
    }
}

/// Start and end sets picked by the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub start: BTreeSet<VertexId>,
    pub end: BTreeSet<VertexId>,
}

impl Selection {
    pub fn forget(&mut self, id: VertexId) {
        self.start.remove(&id);
        self.end.remove(&id);
    }
}

/// What a price prompt is for. The UI answers it later with
/// [`PriceRequest::resolve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriceRequest {
    Vertex(VertexId),
    Edge(VertexId, VertexId),
}

impl PriceRequest {
    pub fn resolve(self, cost: f64, editor: &mut GraphEditor<'_>) -> bool {
        match self {
            PriceRequest::Vertex(id) => editor.set_vertex_cost(id, cost),
            PriceRequest::Edge(from, to) => editor.set_edge_cost(from, to, cost),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TouchOutcome {
    Ignored,
    VertexAdded(VertexId),
    EdgeSourcePicked(VertexId),
    EdgesAdded(Vec<Edge>),
    VertexRemoved { id: VertexId, edges: Vec<Edge> },
    EdgesRemoved(Vec<Edge>),
    PriceRequested(PriceRequest),
    SelectionChanged,
}

impl EditMode {
    pub fn on_touch(
        &mut self,
        point: Point,
        radius: f64,
        editor: &mut GraphEditor<'_>,
        selection: &mut Selection,
    ) -> Result<TouchOutcome, GraphError> {
        let vertices = VertexFinder::new(radius);
        let hit = vertices.find(point, editor.graph());

        let outcome = match (*self, hit) {
            (EditMode::AddVertex, None) => TouchOutcome::VertexAdded(editor.add_vertex(point)),
            (EditMode::AddVertex, Some(_)) => TouchOutcome::Ignored,
            (EditMode::AddEdge { pending: None }, Some(id)) => {
                *self = EditMode::AddEdge { pending: Some(id) };
                TouchOutcome::EdgeSourcePicked(id)
            }
            (EditMode::AddEdge { pending: Some(from) }, Some(to)) => {
                *self = EditMode::AddEdge { pending: None };
                if from == to {
                    TouchOutcome::Ignored
                } else {
                    TouchOutcome::EdgesAdded(editor.add_edge(from, to)?)
                }
            }
            (EditMode::AddEdge { .. }, None) => {
                *self = EditMode::AddEdge { pending: None };
                TouchOutcome::Ignored
            }
            (EditMode::Remove, Some(id)) => {
                selection.forget(id);
                TouchOutcome::VertexRemoved {
                    id,
                    edges: editor.remove_vertex(id),
                }
            }
            (EditMode::Remove, None) => {
                let edge = EdgeFinder::new(radius).find(point, editor.graph());
                match edge {
                    Some(edge) => TouchOutcome::EdgesRemoved(editor.remove_edge(edge.from(), edge.to())),
                    None => TouchOutcome::Ignored,
                }
            }
            (EditMode::SetPrice, Some(id)) => TouchOutcome::PriceRequested(PriceRequest::Vertex(id)),
            (EditMode::SetPrice, None) => EdgeFinder::new(radius)
                .find(point, editor.graph())
                .map_or(TouchOutcome::Ignored, |edge| {
                    TouchOutcome::PriceRequested(PriceRequest::Edge(edge.from(), edge.to()))
                }),
            (EditMode::SelectStart, Some(id)) => {
                toggle(&mut selection.start, id);
                TouchOutcome::SelectionChanged
            }
            (EditMode::SelectEnd, Some(id)) => {
                toggle(&mut selection.end, id);
                TouchOutcome::SelectionChanged
            }
            (EditMode::SelectStart | EditMode::SelectEnd, None) => TouchOutcome::Ignored,
        };
        Ok(outcome)
    }
}

fn toggle(set: &mut BTreeSet<VertexId>, id: VertexId) {
    if !set.remove(&id) {
        set.insert(id);
    }
}
